//! A paginated fuzzy picker whose result rows hydrate lazily.
//!
//! The [`selector`] module holds the interaction core: a debounced query, a
//! page loader that discards stale responses, a visibility-driven payload
//! cache and a single annotated selection. [`ui`] puts a terminal front-end
//! on top of it. Stores implement [`SelectorSource`] from
//! `lazypick-source-api`.

pub mod app_dirs;
pub mod logging;
pub mod selector;
pub mod ui;

pub use lazypick_source_api::{
    Catalog, InlinePayloads, ItemId, MediaKind, MemoryCatalog, Payload, PayloadLoader,
    ResultItem, ResultPage, SearchCriteria, SelectorSource, SourceError,
};
#[cfg(feature = "fs")]
pub use lazypick_source_api::{FilePayloads, FilesystemCatalog, ScanOptions};
pub use selector::{
    CommitSelection, HydrationState, Selector, SelectorError, SelectorOptions, SelectorPhase,
};
pub use ui::{App, SelectorOutcome, run};
