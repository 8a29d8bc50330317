//! File-backed `tracing` setup.
//!
//! The terminal belongs to the UI while a picker runs, so events are written
//! to a log file without ANSI colouring instead of stderr.

use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock};

use anyhow::{Context, Result, anyhow};
use tracing_subscriber::EnvFilter;

pub const DEFAULT_LEVEL: &str = "info";

static INSTALLED: OnceLock<PathBuf> = OnceLock::new();

/// Install the global subscriber writing to `file`.
///
/// `RUST_LOG` takes precedence over `level`. Calling this again after a
/// successful install is a no-op that returns the original log path.
pub fn initialize(level: &str, file: &Path) -> Result<PathBuf> {
    if let Some(path) = INSTALLED.get() {
        return Ok(path.clone());
    }

    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(level)
            .with_context(|| format!("invalid log level directive '{level}'"))?,
    };
    let writer = open_log_file(file)?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(writer))
        .with_ansi(false)
        .with_target(true)
        .with_thread_names(true)
        .try_init()
        .map_err(|err| anyhow!(err))?;

    let path = INSTALLED.get_or_init(|| file.to_path_buf());
    tracing::debug!(log = %path.display(), "logging initialized");
    Ok(path.clone())
}

fn open_log_file(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create log directory {}", parent.display()))?;
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open log file {}", path.display()))
}
