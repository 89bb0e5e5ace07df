//! Export directory: the watched location producers write metric snapshots into.
//!
//! The path is validated once at startup and never changes afterwards. Listing
//! and streaming happen per scrape, see [`aggregate`].

pub mod aggregate;

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Result, TextExpError};

pub use aggregate::{
    aggregate, AggregateReport, EntryKind, EntryOrder, FileOutcome, FileStatus, Listing,
    MetricFileEntry, Requester, SkipReason,
};

/// Validated export directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportDir {
    path: PathBuf,
}

impl ExportDir {
    /// Validate that `path` exists and is a directory.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let meta = fs::metadata(path).map_err(|e| TextExpError::ExportDir {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        if !meta.is_dir() {
            return Err(TextExpError::ExportDir {
                path: path.display().to_string(),
                reason: "export path is not a directory".into(),
            });
        }
        Ok(Self {
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// List the directory for one scrape.
    pub fn list(&self, order: EntryOrder) -> Result<Listing> {
        Listing::read(&self.path, order)
    }
}
