use std::env;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result, ensure};
use lazypick::logging::DEFAULT_LEVEL;
use lazypick::selector::{
    DEFAULT_DEBOUNCE, DEFAULT_HYDRATION_WORKERS, DEFAULT_PAGE_SIZE, SelectorOptions,
};
use lazypick::{ScanOptions, app_dirs};
use serde::Deserialize;

use crate::cli::CliArgs;

use super::resolved::ResolvedConfig;
use super::util::{default_title_for, sanitize_extensions};

pub(super) const MAX_PAGE_SIZE: usize = 500;
pub(super) const MAX_DEBOUNCE_MS: u64 = 10_000;
pub(super) const MAX_HYDRATION_WORKERS: usize = 32;

/// Mirror of the configuration file representation before CLI overrides and
/// validation are applied.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(super) struct RawConfig {
    selector: SelectorSection,
    catalog: CatalogSection,
    ui: UiSection,
    logging: LoggingSection,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct SelectorSection {
    page_size: Option<usize>,
    debounce_ms: Option<u64>,
    hydration_workers: Option<usize>,
}

/// Which files the picker lists.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct CatalogSection {
    root: Option<PathBuf>,
    include_hidden: Option<bool>,
    respect_ignore_files: Option<bool>,
    max_depth: Option<usize>,
    extensions: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct UiSection {
    title: Option<String>,
    initial_query: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct LoggingSection {
    level: Option<String>,
    file: Option<PathBuf>,
}

impl RawConfig {
    /// Apply CLI overrides on top of the raw configuration values.
    pub(super) fn apply_cli_overrides(&mut self, cli: &CliArgs) {
        if let Some(root) = cli.root.clone() {
            self.catalog.root = Some(root);
        }
        if cli.hidden {
            self.catalog.include_hidden = Some(true);
        }
        if !cli.extensions.is_empty() {
            self.catalog.extensions = Some(cli.extensions.clone());
        }
        if let Some(value) = cli.page_size {
            self.selector.page_size = Some(value);
        }
        if let Some(value) = cli.debounce_ms {
            self.selector.debounce_ms = Some(value);
        }
        if let Some(query) = cli.initial_query.clone() {
            self.ui.initial_query = Some(query);
        }
        if let Some(level) = cli.log_level.clone() {
            self.logging.level = Some(level);
        }
        if let Some(file) = cli.log_file.clone() {
            self.logging.file = Some(file);
        }
    }

    /// Validate the values and fill in defaults.
    pub(super) fn resolve(self) -> Result<ResolvedConfig> {
        let page_size = self.selector.page_size.unwrap_or(DEFAULT_PAGE_SIZE);
        ensure!(
            (1..=MAX_PAGE_SIZE).contains(&page_size),
            "selector.page_size must be between 1 and {MAX_PAGE_SIZE}, got {page_size}"
        );
        let debounce = match self.selector.debounce_ms {
            Some(ms) => {
                ensure!(
                    ms <= MAX_DEBOUNCE_MS,
                    "selector.debounce_ms must be at most {MAX_DEBOUNCE_MS}, got {ms}"
                );
                Duration::from_millis(ms)
            }
            None => DEFAULT_DEBOUNCE,
        };
        let workers = self
            .selector
            .hydration_workers
            .unwrap_or(DEFAULT_HYDRATION_WORKERS);
        ensure!(
            (1..=MAX_HYDRATION_WORKERS).contains(&workers),
            "selector.hydration_workers must be between 1 and {MAX_HYDRATION_WORKERS}, got {workers}"
        );

        let mut root = match self.catalog.root {
            Some(path) => path,
            None => env::current_dir().context("failed to determine working directory")?,
        };
        if root.is_relative() {
            root = env::current_dir()
                .context("failed to resolve current directory for root")?
                .join(root);
        }
        root = fs::canonicalize(&root)
            .with_context(|| format!("failed to canonicalize catalog root {}", root.display()))?;
        let metadata = fs::metadata(&root)
            .with_context(|| format!("failed to inspect catalog root {}", root.display()))?;
        ensure!(metadata.is_dir(), "catalog root must be a directory");

        let defaults = ScanOptions::default();
        let scan = ScanOptions {
            include_hidden: self
                .catalog
                .include_hidden
                .unwrap_or(defaults.include_hidden),
            respect_ignore_files: self
                .catalog
                .respect_ignore_files
                .unwrap_or(defaults.respect_ignore_files),
            max_depth: self.catalog.max_depth,
            ..defaults
        }
        .with_extensions(
            self.catalog
                .extensions
                .map(sanitize_extensions)
                .unwrap_or_default(),
        );

        let selector = SelectorOptions::default()
            .with_page_size(page_size)
            .with_debounce(debounce)
            .with_hydration_workers(workers)
            .with_initial_query(self.ui.initial_query.unwrap_or_default());
        let title = self.ui.title.unwrap_or_else(|| default_title_for(&root));

        let log_level = self
            .logging
            .level
            .filter(|level| !level.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_LEVEL.to_string());
        let log_file = match self.logging.file {
            Some(file) => file,
            None => app_dirs::default_log_file()?,
        };

        Ok(ResolvedConfig {
            root,
            scan,
            selector,
            title,
            log_level,
            log_file,
        })
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    fn rooted(dir: &tempfile::TempDir) -> RawConfig {
        let mut raw = RawConfig::default();
        raw.catalog.root = Some(dir.path().to_path_buf());
        raw.logging.file = Some(dir.path().join("test.log"));
        raw
    }

    #[test]
    fn cli_overrides_take_precedence() {
        let cli = CliArgs::parse_from([
            "lazypick", "--root", "/srv", "-q", "cat", "--page-size", "7", "--debounce-ms",
            "0", "--ext", "png", "--hidden", "--log-level", "debug",
        ]);
        let mut raw = RawConfig::default();
        raw.selector.page_size = Some(99);
        raw.ui.initial_query = Some("dog".into());
        raw.apply_cli_overrides(&cli);

        assert_eq!(raw.catalog.root, Some(PathBuf::from("/srv")));
        assert_eq!(raw.selector.page_size, Some(7));
        assert_eq!(raw.selector.debounce_ms, Some(0));
        assert_eq!(raw.ui.initial_query.as_deref(), Some("cat"));
        assert_eq!(raw.catalog.extensions, Some(vec!["png".to_string()]));
        assert_eq!(raw.catalog.include_hidden, Some(true));
        assert_eq!(raw.logging.level.as_deref(), Some("debug"));
    }

    #[test]
    fn defaults_resolve() {
        let dir = tempfile::tempdir().expect("tempdir");
        let resolved = rooted(&dir).resolve().expect("resolves");

        assert_eq!(resolved.selector.page_size, DEFAULT_PAGE_SIZE);
        assert_eq!(resolved.selector.debounce, DEFAULT_DEBOUNCE);
        assert_eq!(resolved.selector.hydration_workers, DEFAULT_HYDRATION_WORKERS);
        assert!(resolved.selector.initial_query.is_empty());
        assert_eq!(resolved.log_level, DEFAULT_LEVEL);
        assert!(!resolved.scan.include_hidden);
        assert!(resolved.scan.extensions.is_none());
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");

        let mut raw = rooted(&dir);
        raw.selector.page_size = Some(0);
        assert!(raw.resolve().is_err());

        let mut raw = rooted(&dir);
        raw.selector.page_size = Some(MAX_PAGE_SIZE + 1);
        assert!(raw.resolve().is_err());

        let mut raw = rooted(&dir);
        raw.selector.debounce_ms = Some(MAX_DEBOUNCE_MS + 1);
        assert!(raw.resolve().is_err());

        let mut raw = rooted(&dir);
        raw.selector.hydration_workers = Some(0);
        assert!(raw.resolve().is_err());
    }

    #[test]
    fn root_must_be_a_directory() {
        let dir = tempfile::tempdir().expect("tempdir");
        let file = dir.path().join("plain.txt");
        fs::write(&file, "x").expect("write");

        let mut raw = rooted(&dir);
        raw.catalog.root = Some(file);
        assert!(raw.resolve().is_err());

        let mut raw = rooted(&dir);
        raw.catalog.root = Some(dir.path().join("missing"));
        assert!(raw.resolve().is_err());
    }

    #[test]
    fn extensions_are_normalized() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut raw = rooted(&dir);
        raw.catalog.extensions = Some(vec![".PNG".into(), "png".into(), " gif".into()]);

        let resolved = raw.resolve().expect("resolves");
        assert_eq!(
            resolved.scan.extensions,
            Some(vec!["png".to_string(), "gif".to_string()])
        );
    }
}
