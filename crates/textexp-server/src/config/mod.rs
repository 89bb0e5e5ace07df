//! Exporter config: strict YAML file, overridden by command-line flags.

pub mod cli;
pub mod schema;

use std::fs;
use std::path::Path;

use textexp_core::error::{Result, TextExpError};

pub use cli::Cli;
pub use schema::{set_address, ExportSection, ExporterConfig, LoggingSection, ServerSection};

pub fn load_from_file(path: impl AsRef<Path>) -> Result<ExporterConfig> {
    let path = path.as_ref();
    let s = fs::read_to_string(path).map_err(|e| {
        TextExpError::BadConfig(format!("read config {} failed: {e}", path.display()))
    })?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<ExporterConfig> {
    let cfg: ExporterConfig = serde_yaml::from_str(s)
        .map_err(|e| TextExpError::BadConfig(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}
