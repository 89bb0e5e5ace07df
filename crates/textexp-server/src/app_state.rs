//! Shared application state: the context object every handler receives.
//!
//! Built once at startup; nothing in it changes afterwards.

use std::sync::Arc;

use textexp_core::error::Result;
use textexp_core::{About, EntryOrder, ExportDir};

use crate::config::ExporterConfig;
use crate::ops::info_page::INFO_TEMPLATE;

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    cfg: ExporterConfig,
    about: About,
    export: ExportDir,
    template: String,
}

impl AppState {
    /// Validate the export directory and build state.
    /// Returns Result so main can exit cleanly on a bad path.
    pub fn new(cfg: ExporterConfig, about: About) -> Result<Self> {
        Self::with_template(cfg, about, INFO_TEMPLATE)
    }

    /// Same as [`AppState::new`] with a custom info page template.
    pub fn with_template(cfg: ExporterConfig, about: About, template: &str) -> Result<Self> {
        let export = ExportDir::open(&cfg.export.path)?;
        Ok(Self {
            inner: Arc::new(AppStateInner {
                cfg,
                about,
                export,
                template: template.to_string(),
            }),
        })
    }

    pub fn cfg(&self) -> &ExporterConfig {
        &self.inner.cfg
    }

    pub fn about(&self) -> &About {
        &self.inner.about
    }

    pub fn export(&self) -> &ExportDir {
        &self.inner.export
    }

    pub fn order(&self) -> EntryOrder {
        self.inner.cfg.export.order()
    }

    pub fn template(&self) -> &str {
        &self.inner.template
    }
}
