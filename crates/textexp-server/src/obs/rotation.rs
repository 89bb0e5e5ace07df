//! Rotation task: the single consumer of rotate requests.
//!
//! The signal watcher (and anything else that wants a fresh log file) sends a
//! [`LogCommand`] instead of touching the sink directly.

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use textexp_core::error::{Result, TextExpError};
use textexp_core::About;

use super::LogSink;

const COMMAND_QUEUE: usize = 8;

#[derive(Debug)]
pub enum LogCommand {
    /// Close and reopen the log file. `ack` receives the outcome when set.
    Rotate {
        ack: Option<oneshot::Sender<Result<()>>>,
    },
}

/// Sending side of the rotation queue.
#[derive(Clone)]
pub struct RotationHandle {
    tx: mpsc::Sender<LogCommand>,
}

impl RotationHandle {
    /// Queue a rotation without waiting for it. Returns false once the
    /// rotation task is gone.
    pub async fn notify(&self) -> bool {
        self.tx.send(LogCommand::Rotate { ack: None }).await.is_ok()
    }

    /// Queue a rotation and wait for its outcome.
    pub async fn rotate(&self) -> Result<()> {
        let (ack, done) = oneshot::channel();
        self.tx
            .send(LogCommand::Rotate { ack: Some(ack) })
            .await
            .map_err(|_| TextExpError::Internal("rotation task stopped".into()))?;
        done.await
            .map_err(|_| TextExpError::Internal("rotation task dropped request".into()))?
    }
}

/// Spawn the rotation task. It runs until every handle is dropped.
pub fn spawn(sink: LogSink, about: About) -> (RotationHandle, JoinHandle<()>) {
    let (tx, rx) = mpsc::channel(COMMAND_QUEUE);
    let task = tokio::spawn(run(sink, about, rx));
    (RotationHandle { tx }, task)
}

async fn run(sink: LogSink, about: About, mut rx: mpsc::Receiver<LogCommand>) {
    while let Some(cmd) = rx.recv().await {
        match cmd {
            LogCommand::Rotate { ack } => {
                let res = sink.rotate(&about);
                if let Err(e) = &res {
                    tracing::error!(error = %e, "log rotation failed, records dropped until next rotation");
                }
                if let Some(ack) = ack {
                    let _ = ack.send(res);
                }
            }
        }
    }
    tracing::debug!("rotation task stopped");
}
