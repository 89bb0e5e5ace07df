//! SIGHUP watcher: turns each hang-up into a log rotation request.
//!
//! Only SIGHUP is intercepted; every other signal keeps its default action.

use textexp_core::error::{Result, TextExpError};

use crate::obs::RotationHandle;

#[cfg(unix)]
pub struct SignalWatcher {
    hangup: tokio::signal::unix::Signal,
}

#[cfg(unix)]
impl SignalWatcher {
    /// Install the SIGHUP handler. Must run inside the tokio runtime; once this
    /// returns, a SIGHUP no longer terminates the process.
    pub fn register() -> Result<Self> {
        use tokio::signal::unix::{signal, SignalKind};

        let hangup = signal(SignalKind::hangup())
            .map_err(|e| TextExpError::Internal(format!("register SIGHUP handler: {e}")))?;
        tracing::debug!("SIGHUP handler registered");
        Ok(Self { hangup })
    }

    /// Forward every SIGHUP until the rotation task goes away.
    pub async fn run(mut self, rotation: RotationHandle) {
        while self.hangup.recv().await.is_some() {
            tracing::debug!("SIGHUP received, rotating log");
            if !rotation.notify().await {
                tracing::warn!("rotation task gone, SIGHUP watcher exiting");
                break;
            }
        }
    }
}

#[cfg(not(unix))]
pub struct SignalWatcher;

#[cfg(not(unix))]
impl SignalWatcher {
    pub fn register() -> Result<Self> {
        Err(TextExpError::Internal(
            "SIGHUP log rotation is only available on unix".into(),
        ))
    }

    pub async fn run(self, _rotation: RotationHandle) {}
}
