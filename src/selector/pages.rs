use lazypick_source_api::{ResultItem, ResultPage, SearchCriteria, SourceError};

/// Whether an outstanding request replaces or extends the results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoadKind {
    Reset,
    More,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Outstanding {
    generation: u64,
    offset: usize,
    kind: LoadKind,
}

/// A search the loader wants dispatched to the backing store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PageRequest {
    pub(crate) generation: u64,
    pub(crate) criteria: SearchCriteria,
    pub(crate) offset: usize,
    pub(crate) limit: usize,
}

/// What applying a response did to the accumulated results.
#[derive(Debug)]
pub(crate) enum PageUpdate {
    /// The response belonged to an older generation or an abandoned request.
    Stale,
    /// A first page replaced the results.
    Replaced,
    /// A follow-up page was appended starting at this index.
    Appended { from: usize },
    /// The request failed; results are untouched.
    Failed(SourceError),
}

/// Accumulates result pages for the current effective query.
///
/// Every effective query gets a fresh generation. Responses are tagged with
/// the generation they were requested under and anything older than the
/// current one is dropped on arrival.
#[derive(Debug)]
pub(crate) struct PageLoader {
    page_size: usize,
    generation: u64,
    query: Option<String>,
    items: Vec<ResultItem>,
    has_more: bool,
    total: usize,
    /// Generation whose responses produced `items`; 0 when nothing loaded yet.
    results_generation: u64,
    outstanding: Option<Outstanding>,
}

impl PageLoader {
    pub(crate) fn new(page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
            generation: 0,
            query: None,
            items: Vec::new(),
            has_more: false,
            total: 0,
            results_generation: 0,
            outstanding: None,
        }
    }

    /// Start loading `query` from offset 0 under a new generation.
    pub(crate) fn begin_query(&mut self, query: String) -> PageRequest {
        self.query = Some(query);
        self.begin_reset()
    }

    /// Reissue the first page of the current query after a failure.
    ///
    /// Returns `None` if nothing was ever queried or a first page is already
    /// on its way.
    pub(crate) fn begin_retry(&mut self) -> Option<PageRequest> {
        if self.query.is_none() || self.outstanding_kind() == Some(LoadKind::Reset) {
            return None;
        }
        Some(self.begin_reset())
    }

    fn begin_reset(&mut self) -> PageRequest {
        self.generation += 1;
        self.outstanding = Some(Outstanding {
            generation: self.generation,
            offset: 0,
            kind: LoadKind::Reset,
        });
        self.request(0)
    }

    /// Request the next page, unless a request is outstanding, there is
    /// nothing more to load, or the displayed results belong to an older query.
    pub(crate) fn begin_more(&mut self) -> Option<PageRequest> {
        if self.outstanding.is_some() || !self.has_more || !self.results_are_current() {
            return None;
        }
        let offset = self.items.len();
        self.outstanding = Some(Outstanding {
            generation: self.generation,
            offset,
            kind: LoadKind::More,
        });
        Some(self.request(offset))
    }

    fn request(&self, offset: usize) -> PageRequest {
        PageRequest {
            generation: self.generation,
            criteria: SearchCriteria::new(self.query.as_deref().unwrap_or_default()),
            offset,
            limit: self.page_size,
        }
    }

    /// Forget an outstanding request that could not be dispatched.
    pub(crate) fn abandon(&mut self, generation: u64) {
        if self
            .outstanding
            .is_some_and(|outstanding| outstanding.generation == generation)
        {
            self.outstanding = None;
        }
    }

    /// Make every in-flight response stale.
    pub(crate) fn cancel_all(&mut self) {
        self.generation += 1;
        self.outstanding = None;
    }

    pub(crate) fn apply(
        &mut self,
        generation: u64,
        offset: usize,
        result: Result<ResultPage, SourceError>,
    ) -> PageUpdate {
        let Some(outstanding) = self.outstanding else {
            return PageUpdate::Stale;
        };
        if generation != self.generation
            || outstanding.generation != generation
            || outstanding.offset != offset
        {
            return PageUpdate::Stale;
        }
        self.outstanding = None;

        let page = match result {
            Ok(page) => page,
            Err(err) => return PageUpdate::Failed(err),
        };

        self.has_more = page.has_more;
        self.total = page.total;
        match outstanding.kind {
            LoadKind::Reset => {
                self.items = page.items;
                self.results_generation = generation;
                PageUpdate::Replaced
            }
            LoadKind::More => {
                let from = self.items.len();
                self.items.extend(page.items);
                PageUpdate::Appended { from }
            }
        }
    }

    pub(crate) fn generation(&self) -> u64 {
        self.generation
    }

    pub(crate) fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    pub(crate) fn items(&self) -> &[ResultItem] {
        &self.items
    }

    pub(crate) fn has_more(&self) -> bool {
        self.has_more
    }

    pub(crate) fn total(&self) -> usize {
        self.total
    }

    pub(crate) fn page_size(&self) -> usize {
        self.page_size
    }

    pub(crate) fn has_started(&self) -> bool {
        self.query.is_some()
    }

    pub(crate) fn outstanding_kind(&self) -> Option<LoadKind> {
        self.outstanding.map(|outstanding| outstanding.kind)
    }

    /// Whether the displayed items were produced by the current effective query.
    pub(crate) fn results_are_current(&self) -> bool {
        self.results_generation == self.generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(ids: std::ops::Range<usize>, total: usize) -> ResultPage {
        let has_more = ids.end < total;
        ResultPage {
            items: ids
                .map(|index| ResultItem::new(format!("id-{index}"), format!("item {index}")))
                .collect(),
            has_more,
            total,
        }
    }

    #[test]
    fn query_change_starts_new_generation() {
        let mut loader = PageLoader::new(12);
        let first = loader.begin_query("cat".into());
        let second = loader.begin_query("dog".into());
        assert!(second.generation > first.generation);
        assert_eq!(second.offset, 0);
        assert_eq!(second.criteria.query(), "dog");
    }

    #[test]
    fn load_more_requires_idle_loader_with_more_results() {
        let mut loader = PageLoader::new(12);
        let request = loader.begin_query(String::new());
        assert!(loader.begin_more().is_none(), "first page still outstanding");

        loader.apply(request.generation, 0, Ok(page(0..12, 20)));
        let more = loader.begin_more().expect("second page");
        assert_eq!(more.offset, 12);
        assert!(loader.begin_more().is_none(), "second page still outstanding");

        loader.apply(more.generation, 12, Ok(page(12..20, 20)));
        assert!(!loader.has_more());
        assert!(loader.begin_more().is_none(), "nothing left to load");
        assert_eq!(loader.items().len(), 20);
    }

    #[test]
    fn responses_for_older_generations_are_stale() {
        let mut loader = PageLoader::new(12);
        let old = loader.begin_query("cat".into());
        let new = loader.begin_query("dog".into());

        let update = loader.apply(old.generation, 0, Ok(page(0..3, 3)));
        assert!(matches!(update, PageUpdate::Stale));
        assert!(loader.items().is_empty());

        let update = loader.apply(new.generation, 0, Ok(page(5..7, 2)));
        assert!(matches!(update, PageUpdate::Replaced));
        assert_eq!(loader.items()[0].id.as_str(), "id-5");
    }

    #[test]
    fn failed_first_page_keeps_old_results_but_blocks_load_more() {
        let mut loader = PageLoader::new(2);
        let first = loader.begin_query("cat".into());
        loader.apply(first.generation, 0, Ok(page(0..2, 5)));

        let second = loader.begin_query("dog".into());
        let update = loader.apply(
            second.generation,
            0,
            Err(SourceError::Unavailable("offline".into())),
        );
        assert!(matches!(update, PageUpdate::Failed(_)));
        assert_eq!(loader.items().len(), 2);
        assert!(!loader.results_are_current());
        assert!(loader.begin_more().is_none());

        let retry = loader.begin_retry().expect("retry");
        assert_eq!(retry.criteria.query(), "dog");
        assert_eq!(retry.offset, 0);
    }

    #[test]
    fn cancel_all_makes_outstanding_responses_stale() {
        let mut loader = PageLoader::new(4);
        let request = loader.begin_query(String::new());
        loader.cancel_all();
        let update = loader.apply(request.generation, 0, Ok(page(0..4, 4)));
        assert!(matches!(update, PageUpdate::Stale));
        assert!(loader.outstanding_kind().is_none());
    }
}
