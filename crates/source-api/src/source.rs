use std::sync::Arc;

use crate::error::SourceError;
use crate::types::{ItemId, Payload, ResultPage, SearchCriteria};

/// A paginated, stable-ordered store the selector searches.
///
/// Implementations are shared with background worker threads, so calls may
/// arrive concurrently from several threads.
pub trait SelectorSource: Send + Sync {
    /// Return up to `limit` results starting at `offset`.
    ///
    /// Repeated calls with the same criteria and offset must return the same
    /// items in the same order so that pages can be appended safely.
    fn search(
        &self,
        criteria: &SearchCriteria,
        limit: usize,
        offset: usize,
    ) -> Result<ResultPage, SourceError>;

    /// Fetch the heavy payload for `id`. `Ok(None)` means no payload exists.
    fn fetch_payload(&self, id: &ItemId) -> Result<Option<Payload>, SourceError>;
}

impl<T> SelectorSource for Arc<T>
where
    T: SelectorSource + ?Sized,
{
    fn search(
        &self,
        criteria: &SearchCriteria,
        limit: usize,
        offset: usize,
    ) -> Result<ResultPage, SourceError> {
        (**self).search(criteria, limit, offset)
    }

    fn fetch_payload(&self, id: &ItemId) -> Result<Option<Payload>, SourceError> {
        (**self).fetch_payload(id)
    }
}
