//! The single log destination.
//!
//! `LogSink` owns at most one open, append-mode handle to a fixed path. Log
//! writes and the handle swap in [`LogSink::reopen`] take the same mutex, so a
//! writer sees either the old handle or the new one, never a closed one. While
//! no handle is installed, records are dropped.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use textexp_core::error::{Result, TextExpError};
use textexp_core::About;
use tracing_subscriber::fmt::writer::MakeWriter;

#[derive(Clone)]
pub struct LogSink {
    inner: Arc<Mutex<SinkInner>>,
}

struct SinkInner {
    path: PathBuf,
    file: Option<File>,
}

impl LogSink {
    /// Open `path` (append, create, write-only).
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = open_append(&path)?;
        Ok(Self::with_handle(path, Some(file)))
    }

    /// Sink bound to `path` with no handle installed yet.
    pub fn detached(path: impl AsRef<Path>) -> Self {
        Self::with_handle(path.as_ref().to_path_buf(), None)
    }

    /// Open `path`; on failure report to stderr and continue detached.
    pub fn init(path: impl AsRef<Path>) -> Self {
        match Self::open(path.as_ref()) {
            Ok(sink) => sink,
            Err(e) => {
                eprintln!("{e}");
                Self::detached(path)
            }
        }
    }

    fn with_handle(path: PathBuf, file: Option<File>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(SinkInner { path, file })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, SinkInner> {
        // A writer that panicked mid-record leaves a usable handle behind.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Whether a handle is currently installed.
    pub fn is_active(&self) -> bool {
        self.lock().file.is_some()
    }

    /// Flush and close the current handle, then open a fresh one at the same
    /// path, all under the write lock. On failure the sink is left detached.
    pub fn reopen(&self) -> Result<()> {
        let mut inner = self.lock();
        if let Some(mut old) = inner.file.take() {
            let _ = old.flush();
            drop(old);
        }
        let fresh = open_append(&inner.path)?;
        inner.file = Some(fresh);
        Ok(())
    }

    /// Rotation with markers: `closing log` goes to the old file, `RESTART`
    /// and the build identity to the new one.
    ///
    /// Markers are emitted through `tracing`, so they must be logged outside
    /// the lock that [`reopen`](Self::reopen) holds.
    pub fn rotate(&self, about: &About) -> Result<()> {
        if self.is_active() {
            tracing::info!("closing log");
        }
        if let Err(e) = self.reopen() {
            eprintln!("{e}");
            return Err(e);
        }
        tracing::info!("RESTART");
        tracing::info!("{}", about.banner());
        Ok(())
    }

    fn write_record(&self, buf: &[u8]) -> io::Result<usize> {
        let mut inner = self.lock();
        if let Some(file) = inner.file.as_mut() {
            file.write_all(buf)?;
        }
        Ok(buf.len())
    }

    fn flush_record(&self) -> io::Result<()> {
        let mut inner = self.lock();
        match inner.file.as_mut() {
            Some(file) => file.flush(),
            None => Ok(()),
        }
    }
}

fn open_append(path: &Path) -> Result<File> {
    let mut opts = OpenOptions::new();
    opts.append(true).create(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        opts.mode(0o640);
    }
    opts.open(path).map_err(|e| TextExpError::LogFile {
        path: path.display().to_string(),
        reason: e.to_string(),
    })
}

/// Per-record writer handed out to the fmt layer. Each `write` call appends
/// the whole buffer under the sink lock.
pub struct LogSinkWriter {
    sink: LogSink,
}

impl Write for LogSinkWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.sink.write_record(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.sink.flush_record()
    }
}

impl<'a> MakeWriter<'a> for LogSink {
    type Writer = LogSinkWriter;

    fn make_writer(&'a self) -> Self::Writer {
        LogSinkWriter { sink: self.clone() }
    }
}
