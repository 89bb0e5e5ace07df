use std::path::PathBuf;

use clap::Parser;
use textexp_core::error::Result;

use super::{load_from_file, ExporterConfig};

/// Serve the concatenated contents of a directory of metric text files.
#[derive(Parser, Debug, Default)]
#[command(name = "text-exporter", about, disable_version_flag = true)]
pub struct Cli {
    /// Bind address (all interfaces when empty).
    #[arg(long)]
    pub bind: Option<String>,

    /// Listen port [default: 9101].
    #[arg(long)]
    pub port: Option<u16>,

    /// Log file [default: local.log].
    #[arg(long)]
    pub log: Option<String>,

    /// Text export directory [default: export].
    #[arg(long)]
    pub path: Option<String>,

    /// YAML config file; flags given on the command line win over it.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Serve files sorted by name instead of directory order.
    #[arg(long)]
    pub sort: bool,

    /// Exit if the log file cannot be opened.
    #[arg(long)]
    pub strict_log: bool,

    /// Add source locations to log records.
    #[arg(long)]
    pub debug: bool,

    /// Display the program version and exit.
    #[arg(long)]
    pub version: bool,
}

impl Cli {
    /// Merge the optional config file with the flags and validate the result.
    pub fn resolve(&self) -> Result<ExporterConfig> {
        let mut cfg = match &self.config {
            Some(path) => load_from_file(path)?,
            None => ExporterConfig::default(),
        };

        if let Some(bind) = &self.bind {
            cfg.server.bind = bind.clone();
        }
        if let Some(port) = self.port {
            cfg.server.port = port;
        }
        if let Some(log) = &self.log {
            cfg.logging.file = log.clone();
        }
        if let Some(path) = &self.path {
            cfg.export.path = path.clone();
        }
        cfg.export.sort_by_name |= self.sort;
        cfg.logging.strict |= self.strict_log;
        cfg.logging.debug |= self.debug;

        cfg.validate()?;
        Ok(cfg)
    }
}
