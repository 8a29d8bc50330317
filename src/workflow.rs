use std::sync::Arc;

use anyhow::{Context, Result};
use lazypick::selector::Selector;
use lazypick::{App, FilesystemCatalog, SelectorOutcome};

use crate::settings::ResolvedConfig;

/// Builds the catalog and picker described by the configuration and runs it.
pub(crate) struct PickWorkflow {
    app: App,
}

impl PickWorkflow {
    pub(crate) fn from_config(config: ResolvedConfig) -> Result<Self> {
        let ResolvedConfig {
            root,
            scan,
            selector,
            title,
            ..
        } = config;

        let catalog = FilesystemCatalog::scan(&root, &scan)
            .with_context(|| format!("failed to index {}", root.display()))?;
        tracing::info!(root = %root.display(), items = catalog.len(), "catalog ready");

        let selector = Selector::open(Arc::new(catalog), selector);
        Ok(Self {
            app: App::new(selector, title),
        })
    }

    pub(crate) fn run(self) -> Result<SelectorOutcome> {
        lazypick::ui::run(self.app)
    }
}
