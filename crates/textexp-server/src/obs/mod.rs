//! Logging: tracing subscriber writing into the rotating log sink.
//!
//! Records are UTC timestamped with microsecond precision. Every record goes
//! through [`LogSink`], so a rotation can never interleave with a write.

pub mod log_sink;
pub mod rotation;

use tracing_subscriber::fmt::time::SystemTime;
use tracing_subscriber::EnvFilter;

use textexp_core::error::{Result, TextExpError};

pub use log_sink::LogSink;
pub use rotation::{LogCommand, RotationHandle};

/// Build the subscriber without installing it (tests use `with_default`).
pub fn subscriber(sink: LogSink, debug: bool) -> impl tracing::Subscriber + Send + Sync {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_timer(SystemTime)
        .with_ansi(false)
        .with_target(debug)
        .with_file(debug)
        .with_line_number(debug)
        .with_writer(sink)
        .finish()
}

/// Install the global subscriber. Fails if one is already set.
pub fn init_logging(sink: &LogSink, debug: bool) -> Result<()> {
    tracing::subscriber::set_global_default(subscriber(sink.clone(), debug))
        .map_err(|e| TextExpError::Internal(format!("install log subscriber: {e}")))
}
