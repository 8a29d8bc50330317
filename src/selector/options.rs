use std::time::Duration;

use super::debounce::DEFAULT_DEBOUNCE;

/// Default number of results requested per page.
pub const DEFAULT_PAGE_SIZE: usize = 12;
/// Default number of payload worker threads.
pub const DEFAULT_HYDRATION_WORKERS: usize = 4;

/// Tunables for a [`Selector`](super::Selector).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorOptions {
    pub page_size: usize,
    pub debounce: Duration,
    pub hydration_workers: usize,
    /// Query loaded immediately on open, without waiting for the debounce.
    pub initial_query: String,
}

impl Default for SelectorOptions {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            debounce: DEFAULT_DEBOUNCE,
            hydration_workers: DEFAULT_HYDRATION_WORKERS,
            initial_query: String::new(),
        }
    }
}

impl SelectorOptions {
    #[must_use]
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    #[must_use]
    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    #[must_use]
    pub fn with_hydration_workers(mut self, workers: usize) -> Self {
        self.hydration_workers = workers;
        self
    }

    #[must_use]
    pub fn with_initial_query(mut self, query: impl Into<String>) -> Self {
        self.initial_query = query.into();
        self
    }
}
