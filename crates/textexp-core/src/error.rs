//! Shared error type across text exporter crates.

use thiserror::Error;

/// Stable error codes (used in logs and tests).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Invalid configuration value or file.
    BadConfig,
    /// Export directory missing or not a directory.
    ExportDir,
    /// Export directory could not be listed at request time.
    ListDir,
    /// Log destination could not be opened.
    LogFile,
    /// Info page template failed to render.
    Template,
    /// Output sink rejected a write.
    Sink,
    /// Internal server error.
    Internal,
}

impl ErrorCode {
    /// String representation used in log records.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::BadConfig => "BAD_CONFIG",
            ErrorCode::ExportDir => "EXPORT_DIR",
            ErrorCode::ListDir => "LIST_DIR",
            ErrorCode::LogFile => "LOG_FILE",
            ErrorCode::Template => "TEMPLATE",
            ErrorCode::Sink => "SINK",
            ErrorCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, TextExpError>;

/// Unified error type used by core and server.
#[derive(Debug, Error)]
pub enum TextExpError {
    #[error("bad config: {0}")]
    BadConfig(String),
    #[error("export path {path}: {reason}")]
    ExportDir { path: String, reason: String },
    #[error("list {path} failed: {reason}")]
    ListDir { path: String, reason: String },
    #[error("log file {path}: {reason}")]
    LogFile { path: String, reason: String },
    #[error("template: {0}")]
    Template(String),
    #[error("sink write failed: {0}")]
    Sink(String),
    #[error("internal: {0}")]
    Internal(String),
}

impl TextExpError {
    /// Map to a stable code.
    pub fn code(&self) -> ErrorCode {
        match self {
            TextExpError::BadConfig(_) => ErrorCode::BadConfig,
            TextExpError::ExportDir { .. } => ErrorCode::ExportDir,
            TextExpError::ListDir { .. } => ErrorCode::ListDir,
            TextExpError::LogFile { .. } => ErrorCode::LogFile,
            TextExpError::Template(_) => ErrorCode::Template,
            TextExpError::Sink(_) => ErrorCode::Sink,
            TextExpError::Internal(_) => ErrorCode::Internal,
        }
    }

    /// Whether a request hitting this error should answer with a 5xx status.
    /// Config and startup errors never reach a handler.
    pub fn is_server_error(&self) -> bool {
        matches!(
            self.code(),
            ErrorCode::ListDir | ErrorCode::Template | ErrorCode::Sink | ErrorCode::Internal
        )
    }
}
