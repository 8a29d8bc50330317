use lazypick_source_api::ItemId;
use thiserror::Error;

/// Recoverable problems surfaced by a [`Selector`](super::Selector).
///
/// None of these end the selector; they are reported inline and the user can
/// keep interacting.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SelectorError {
    /// A page request failed. Previously displayed results are kept.
    #[error("search for '{query}' failed: {message}")]
    Search { query: String, message: String },

    /// Fetching one item's payload failed. The item is not retried.
    #[error("could not load {id}: {message}")]
    Hydration { id: ItemId, message: String },

    /// `commit` was called without a selected item.
    #[error("nothing is selected")]
    InvalidCommit,

    /// The item is not part of the current result set.
    #[error("{id} is not in the current results")]
    UnknownItem { id: ItemId },

    /// The selector was already committed or closed.
    #[error("the selector has already finished")]
    Finished,
}
