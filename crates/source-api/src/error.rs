use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures reported by a [`SelectorSource`](crate::SelectorSource).
#[derive(Debug, Error)]
pub enum SourceError {
    /// The request itself was malformed, e.g. a zero page size.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Reading from disk failed.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Enumerating a directory tree failed.
    #[cfg(feature = "fs")]
    #[error("failed to walk {}: {source}", root.display())]
    Walk {
        root: PathBuf,
        #[source]
        source: ignore::Error,
    },

    /// The backing store is temporarily unable to answer.
    #[error("source unavailable: {0}")]
    Unavailable(String),
}

impl SourceError {
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
