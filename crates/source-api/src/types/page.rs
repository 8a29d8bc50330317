use serde::{Deserialize, Serialize};

use super::ResultItem;

/// One page of search results.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultPage {
    pub items: Vec<ResultItem>,
    pub has_more: bool,
    pub total: usize,
}

impl ResultPage {
    /// Build the page starting at `offset` holding at most `limit` entries of
    /// `ranked`, resolving each entry into a [`ResultItem`].
    pub fn from_ranked<T, F>(ranked: &[T], offset: usize, limit: usize, mut resolve: F) -> Self
    where
        F: FnMut(&T) -> ResultItem,
    {
        let total = ranked.len();
        let start = offset.min(total);
        let end = start.saturating_add(limit).min(total);
        Self {
            items: ranked[start..end].iter().map(&mut resolve).collect(),
            has_more: end < total,
            total,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ranked(count: usize) -> Vec<ResultItem> {
        (0..count)
            .map(|index| ResultItem::new(format!("id-{index}"), format!("item {index}")))
            .collect()
    }

    #[test]
    fn pages_report_remaining_items() {
        let items = ranked(20);
        let first = ResultPage::from_ranked(&items, 0, 12, Clone::clone);
        assert_eq!(first.items.len(), 12);
        assert!(first.has_more);
        assert_eq!(first.total, 20);

        let second = ResultPage::from_ranked(&items, 12, 12, Clone::clone);
        assert_eq!(second.items.len(), 8);
        assert!(!second.has_more);
        assert_eq!(second.items[0].id.as_str(), "id-12");
    }

    #[test]
    fn offset_past_the_end_yields_empty_page() {
        let items = ranked(3);
        let page = ResultPage::from_ranked(&items, 10, 5, Clone::clone);
        assert!(page.items.is_empty());
        assert!(!page.has_more);
        assert_eq!(page.total, 3);
    }
}
