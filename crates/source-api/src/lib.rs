//! Shared contract between the lazypick selector and the stores it searches.
//!
//! A store implements [`SelectorSource`]: paginated, stable-ordered search plus
//! per-item payload fetching. The [`catalog`] module ships ready-made stores
//! backed by memory or by a directory tree.

pub mod catalog;
pub mod error;
pub mod source;
pub mod types;

pub use catalog::{Catalog, InlinePayloads, MemoryCatalog, PayloadLoader, config_for_query};
#[cfg(feature = "fs")]
pub use catalog::{FilePayloads, FilesystemCatalog, ScanOptions};
pub use error::SourceError;
pub use source::SelectorSource;
pub use types::{ItemId, MediaKind, Payload, ResultItem, ResultPage, SearchCriteria};

/// Datasets at least this large enable frizbee's prefilter.
pub const PREFILTER_ENABLE_THRESHOLD: usize = 1_000;
/// Number of labels scored per `match_list` call.
const MATCH_CHUNK_SIZE: usize = 512;
