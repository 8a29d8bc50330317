//! Stable-ordered in-memory indexes that implement [`SelectorSource`].

mod config;
#[cfg(feature = "fs")]
mod filesystem;
mod inline;
#[cfg(feature = "fs")]
mod probe;

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use frizbee::match_list;

pub use config::config_for_query;
#[cfg(feature = "fs")]
pub use filesystem::{FilePayloads, FilesystemCatalog, ScanOptions};
pub use inline::{InlinePayloads, MemoryCatalog};

use crate::MATCH_CHUNK_SIZE;
use crate::error::SourceError;
use crate::source::SelectorSource;
use crate::types::{ItemId, Payload, ResultItem, ResultPage, SearchCriteria};

/// Produces the payload for a catalog entry.
pub trait PayloadLoader: Send + Sync {
    fn load(&self, item: &ResultItem) -> Result<Option<Payload>, SourceError>;
}

/// An immutable list of results searchable by fuzzy label match.
///
/// Unfiltered searches list items by label; filtered searches rank by match
/// score. Ties always fall back to insertion order so repeated searches page
/// identically.
#[derive(Debug)]
pub struct Catalog<L> {
    items: Vec<ResultItem>,
    positions: HashMap<ItemId, usize>,
    label_order: Arc<[usize]>,
    loader: L,
    last_ranking: Mutex<Option<(SearchCriteria, Arc<[usize]>)>>,
}

impl<L: PayloadLoader> Catalog<L> {
    /// Index `items`. Later entries reusing an earlier id are dropped.
    pub fn new(items: Vec<ResultItem>, loader: L) -> Self {
        let mut positions = HashMap::with_capacity(items.len());
        let mut unique = Vec::with_capacity(items.len());
        for item in items {
            if positions.contains_key(&item.id) {
                tracing::warn!(id = %item.id, "dropping catalog entry with duplicate id");
                continue;
            }
            positions.insert(item.id.clone(), unique.len());
            unique.push(item);
        }

        let mut label_order: Vec<usize> = (0..unique.len()).collect();
        label_order.sort_by(|&a, &b| unique[a].label.cmp(&unique[b].label).then(a.cmp(&b)));

        Self {
            items: unique,
            positions,
            label_order: label_order.into(),
            loader,
            last_ranking: Mutex::new(None),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Entries in insertion order.
    #[must_use]
    pub fn items(&self) -> &[ResultItem] {
        &self.items
    }

    #[must_use]
    pub fn get(&self, id: &ItemId) -> Option<&ResultItem> {
        self.positions.get(id).map(|&index| &self.items[index])
    }

    /// Ranked item positions for `criteria`, reusing the previous ranking when
    /// the criteria repeat (as they do for every "load more").
    fn ranking(&self, criteria: &SearchCriteria) -> Arc<[usize]> {
        if criteria.is_unfiltered() {
            return Arc::clone(&self.label_order);
        }

        let mut cached = match self.last_ranking.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Some((previous, ranking)) = cached.as_ref()
            && previous == criteria
        {
            return Arc::clone(ranking);
        }

        let ranking: Arc<[usize]> = rank_matches(&self.items, criteria.query()).into();
        *cached = Some((criteria.clone(), Arc::clone(&ranking)));
        ranking
    }
}

fn rank_matches(items: &[ResultItem], query: &str) -> Vec<usize> {
    let total = items.len();
    let config = config_for_query(query, total);
    let mut scored: Vec<(usize, u16)> = Vec::new();
    let mut haystacks: Vec<&str> = Vec::with_capacity(MATCH_CHUNK_SIZE);
    let mut offset = 0;
    while offset < total {
        let end = (offset + MATCH_CHUNK_SIZE).min(total);
        haystacks.clear();
        haystacks.extend(items[offset..end].iter().map(|item| item.label.as_str()));
        for entry in match_list(query, &haystacks, &config) {
            if entry.score == 0 {
                continue;
            }
            scored.push((offset + entry.index as usize, entry.score));
        }
        offset = end;
    }

    scored.sort_unstable_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    scored.into_iter().map(|(index, _)| index).collect()
}

impl<L: PayloadLoader> SelectorSource for Catalog<L> {
    fn search(
        &self,
        criteria: &SearchCriteria,
        limit: usize,
        offset: usize,
    ) -> Result<ResultPage, SourceError> {
        if limit == 0 {
            return Err(SourceError::InvalidRequest("page size must be at least 1".into()));
        }
        let ranking = self.ranking(criteria);
        Ok(ResultPage::from_ranked(&ranking[..], offset, limit, |&index| {
            self.items[index].clone()
        }))
    }

    fn fetch_payload(&self, id: &ItemId) -> Result<Option<Payload>, SourceError> {
        match self.get(id) {
            Some(item) => self.loader.load(item),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog(labels: &[&str]) -> MemoryCatalog {
        MemoryCatalog::from_items(
            labels
                .iter()
                .enumerate()
                .map(|(index, label)| ResultItem::new(format!("id-{index}"), *label)),
        )
    }

    #[test]
    fn unfiltered_search_orders_by_label() {
        let catalog = catalog(&["zebra.png", "apple.png", "mango.png"]);
        let page = catalog
            .search(&SearchCriteria::new(""), 10, 0)
            .expect("search");
        let labels: Vec<_> = page.items.iter().map(|item| item.label.as_str()).collect();
        assert_eq!(labels, ["apple.png", "mango.png", "zebra.png"]);
        assert_eq!(page.total, 3);
        assert!(!page.has_more);
    }

    #[test]
    fn filtered_search_drops_non_matches() {
        let catalog = catalog(&["cat.png", "dog.png", "catalog.txt"]);
        let page = catalog
            .search(&SearchCriteria::new("cat"), 10, 0)
            .expect("search");
        assert!(page.items.iter().all(|item| item.label.contains("cat")));
        assert_eq!(page.total, 2);
    }

    #[test]
    fn repeated_searches_page_identically() {
        let labels: Vec<String> = (0..40).map(|index| format!("photo-{index:02}.jpg")).collect();
        let refs: Vec<&str> = labels.iter().map(String::as_str).collect();
        let catalog = catalog(&refs);
        let criteria = SearchCriteria::new("photo");

        let first = catalog.search(&criteria, 12, 0).expect("first page");
        let second = catalog.search(&criteria, 12, 12).expect("second page");
        let again = catalog.search(&criteria, 12, 0).expect("first page again");

        assert_eq!(first, again);
        let mut ids: Vec<_> = first.items.iter().chain(&second.items).map(|i| &i.id).collect();
        let before = ids.len();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), before, "pages must not overlap");
    }

    #[test]
    fn zero_limit_is_rejected() {
        let catalog = catalog(&["a"]);
        let err = catalog
            .search(&SearchCriteria::new(""), 0, 0)
            .expect_err("zero limit");
        assert!(matches!(err, SourceError::InvalidRequest(_)));
    }

    #[test]
    fn duplicate_ids_keep_first_entry() {
        let catalog = MemoryCatalog::from_items([
            ResultItem::new("same", "first"),
            ResultItem::new("same", "second"),
        ]);
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get(&ItemId::from("same")).map(|i| i.label.as_str()), Some("first"));
    }

    #[test]
    fn unknown_payload_is_absent() {
        let catalog = catalog(&["a"]);
        let payload = catalog
            .fetch_payload(&ItemId::from("missing"))
            .expect("fetch");
        assert!(payload.is_none());
    }
}
