use serde::Deserialize;
use textexp_core::error::{Result, TextExpError};
use textexp_core::EntryOrder;

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ExporterConfig {
    pub version: u32,

    #[serde(default)]
    pub server: ServerSection,

    #[serde(default)]
    pub logging: LoggingSection,

    #[serde(default)]
    pub export: ExportSection,
}

impl Default for ExporterConfig {
    fn default() -> Self {
        Self {
            version: 1,
            server: ServerSection::default(),
            logging: LoggingSection::default(),
            export: ExportSection::default(),
        }
    }
}

impl ExporterConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(TextExpError::BadConfig(format!(
                "unsupported config version {}",
                self.version
            )));
        }
        self.server.validate()?;
        if self.logging.file.trim().is_empty() {
            return Err(TextExpError::BadConfig("logging.file must not be empty".into()));
        }
        if self.export.path.trim().is_empty() {
            return Err(TextExpError::BadConfig("export.path must not be empty".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ServerSection {
    /// Empty means all interfaces.
    #[serde(default)]
    pub bind: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            bind: String::new(),
            port: default_port(),
        }
    }
}

impl ServerSection {
    pub fn validate(&self) -> Result<()> {
        if self.port == 0 {
            return Err(TextExpError::BadConfig(
                "server.port must be between 1 and 65535".into(),
            ));
        }
        Ok(())
    }

    pub fn listen_addr(&self) -> String {
        set_address(&self.bind, self.port)
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct LoggingSection {
    #[serde(default = "default_log_file")]
    pub file: String,

    /// Exit instead of running without a log file when it cannot be opened.
    #[serde(default)]
    pub strict: bool,

    /// Add source file and line to every record.
    #[serde(default)]
    pub debug: bool,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            file: default_log_file(),
            strict: false,
            debug: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ExportSection {
    #[serde(default = "default_export_path")]
    pub path: String,

    #[serde(default)]
    pub sort_by_name: bool,
}

impl Default for ExportSection {
    fn default() -> Self {
        Self {
            path: default_export_path(),
            sort_by_name: false,
        }
    }
}

impl ExportSection {
    pub fn order(&self) -> EntryOrder {
        if self.sort_by_name {
            EntryOrder::ByName
        } else {
            EntryOrder::Listing
        }
    }
}

/// Listen address from a bind host and port. An empty host binds all interfaces.
pub fn set_address(bind: &str, port: u16) -> String {
    let bind = bind.trim();
    if bind.is_empty() {
        return format!("0.0.0.0:{port}");
    }
    if bind.contains(':') && !bind.starts_with('[') {
        return format!("[{bind}]:{port}");
    }
    format!("{bind}:{port}")
}

fn default_port() -> u16 {
    9101
}
fn default_log_file() -> String {
    "local.log".into()
}
fn default_export_path() -> String {
    "export".into()
}
