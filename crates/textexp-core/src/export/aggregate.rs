//! File aggregation: list the export directory and stream every regular file,
//! byte for byte and back to back, into an output sink.
//!
//! - Only the listing step can fail the scrape.
//! - Per-file problems become [`SkipReason`]s on the report; the pass continues.
//! - No separators are inserted; producers terminate their own content.

use std::fs::{self, File};
use std::io::{self, ErrorKind, Read, Write};
use std::path::{Path, PathBuf};

use crate::error::{Result, TextExpError};

const COPY_BUF_BYTES: usize = 32 * 1024;

/// Order in which listed entries are streamed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EntryOrder {
    /// Whatever the platform listing yields (not stable across scrapes).
    #[default]
    Listing,
    /// Sorted by file name.
    ByName,
}

/// Who asked for the scrape; only used for log records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Requester {
    pub peer: String,
    pub protocol: String,
}

impl Requester {
    pub fn new(peer: impl Into<String>, protocol: impl Into<String>) -> Self {
        Self {
            peer: peer.into(),
            protocol: protocol.into(),
        }
    }
}

/// What `stat` (following symlinks) said about an entry at listing time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
    /// fifo, socket, device.
    Other,
    /// stat failed, e.g. a dangling symlink.
    Unreadable(String),
}

/// One directory entry as seen at listing time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricFileEntry {
    pub name: String,
    pub path: PathBuf,
    /// Size at listing time; 0 unless `kind` is `File`.
    pub size: u64,
    pub kind: EntryKind,
}

impl MetricFileEntry {
    fn stat(name: String, path: PathBuf) -> Self {
        let (kind, size) = match fs::metadata(&path) {
            Ok(m) if m.is_file() => (EntryKind::File, m.len()),
            Ok(m) if m.is_dir() => (EntryKind::Directory, 0),
            Ok(_) => (EntryKind::Other, 0),
            Err(e) => (EntryKind::Unreadable(e.to_string()), 0),
        };
        Self {
            name,
            path,
            size,
            kind,
        }
    }

    pub fn is_file(&self) -> bool {
        self.kind == EntryKind::File
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    Directory,
    /// fifo, socket, device.
    NotRegular,
    /// stat or open failed (e.g. removed after listing).
    Open(String),
    /// Read failed mid-file; bytes already forwarded stay in the response.
    Read(String),
    /// The sink refused a write; nothing after this entry was attempted.
    SinkClosed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileStatus {
    Copied,
    Skipped(SkipReason),
}

/// Result of one entry in an aggregation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileOutcome {
    pub name: String,
    /// Bytes forwarded to the sink for this entry.
    pub bytes: u64,
    pub status: FileStatus,
}

impl FileOutcome {
    fn skipped(name: &str, reason: SkipReason) -> Self {
        Self {
            name: name.to_string(),
            bytes: 0,
            status: FileStatus::Skipped(reason),
        }
    }

    pub fn is_copied(&self) -> bool {
        self.status == FileStatus::Copied
    }
}

/// Accumulated per-entry outcomes of one pass.
#[derive(Debug, Default)]
pub struct AggregateReport {
    pub outcomes: Vec<FileOutcome>,
    /// `TextExpError::Sink` when the sink rejected a write; the pass stopped there.
    pub interrupted: Option<TextExpError>,
}

impl AggregateReport {
    pub fn bytes_written(&self) -> u64 {
        self.outcomes.iter().map(|o| o.bytes).sum()
    }

    pub fn copied(&self) -> impl Iterator<Item = &FileOutcome> {
        self.outcomes.iter().filter(|o| o.is_copied())
    }

    pub fn skipped(&self) -> impl Iterator<Item = (&str, &SkipReason)> {
        self.outcomes.iter().filter_map(|o| match &o.status {
            FileStatus::Skipped(r) => Some((o.name.as_str(), r)),
            FileStatus::Copied => None,
        })
    }
}

/// Snapshot of the export directory taken at the start of a scrape.
#[derive(Debug, Clone)]
pub struct Listing {
    entries: Vec<MetricFileEntry>,
}

enum CopyError {
    Read(io::Error),
    Write(io::Error),
}

impl Listing {
    /// Enumerate `dir`. This is the only step that fails the whole scrape.
    pub fn read(dir: &Path, order: EntryOrder) -> Result<Self> {
        let list_err = |e: io::Error| TextExpError::ListDir {
            path: dir.display().to_string(),
            reason: e.to_string(),
        };

        let mut entries = Vec::new();
        for entry in fs::read_dir(dir).map_err(list_err)? {
            let entry = entry.map_err(list_err)?;
            entries.push(MetricFileEntry::stat(
                entry.file_name().to_string_lossy().into_owned(),
                entry.path(),
            ));
        }

        if order == EntryOrder::ByName {
            entries.sort_by(|a, b| a.name.cmp(&b.name));
        }

        Ok(Self { entries })
    }

    /// Copy every regular file into `sink`, skipping what cannot be read.
    pub fn stream_to<W: Write>(&self, sink: &mut W, who: &Requester) -> AggregateReport {
        let mut report = AggregateReport::default();
        let mut buf = vec![0u8; COPY_BUF_BYTES];

        for entry in &self.entries {
            let name = entry.name.as_str();

            // Symlinks were followed at listing time: a link to a file is
            // served, a link to a directory is not.
            match &entry.kind {
                EntryKind::File => {}
                EntryKind::Directory => {
                    report.outcomes.push(FileOutcome::skipped(name, SkipReason::Directory));
                    continue;
                }
                EntryKind::Other => {
                    tracing::debug!(file = %name, "not a regular file, skipping");
                    report.outcomes.push(FileOutcome::skipped(name, SkipReason::NotRegular));
                    continue;
                }
                EntryKind::Unreadable(e) => {
                    tracing::warn!(file = %name, error = %e, "stat failed, skipping");
                    report.outcomes.push(FileOutcome::skipped(name, SkipReason::Open(e.clone())));
                    continue;
                }
            }

            let mut fh = match File::open(&entry.path) {
                Ok(fh) => fh,
                Err(e) => {
                    tracing::warn!(file = %name, error = %e, "open failed, skipping");
                    report.outcomes.push(FileOutcome::skipped(name, SkipReason::Open(e.to_string())));
                    continue;
                }
            };

            let mut copied = 0u64;
            let result = copy_into(&mut fh, sink, &mut buf, &mut copied);
            drop(fh);

            match result {
                Ok(()) => {
                    tracing::info!(
                        peer = %who.peer,
                        proto = %who.protocol,
                        size = copied,
                        file = %name,
                        "scrape"
                    );
                    report.outcomes.push(FileOutcome {
                        name: name.to_string(),
                        bytes: copied,
                        status: FileStatus::Copied,
                    });
                }
                Err(CopyError::Read(e)) => {
                    tracing::warn!(file = %name, error = %e, forwarded = copied, "read failed, skipping rest of file");
                    report.outcomes.push(FileOutcome {
                        name: name.to_string(),
                        bytes: copied,
                        status: FileStatus::Skipped(SkipReason::Read(e.to_string())),
                    });
                }
                Err(CopyError::Write(e)) => {
                    tracing::warn!(peer = %who.peer, file = %name, error = %e, "sink closed, aborting scrape");
                    report.outcomes.push(FileOutcome {
                        name: name.to_string(),
                        bytes: copied,
                        status: FileStatus::Skipped(SkipReason::SinkClosed),
                    });
                    report.interrupted = Some(TextExpError::Sink(e.to_string()));
                    return report;
                }
            }
        }

        if let Err(e) = sink.flush() {
            report.interrupted = Some(TextExpError::Sink(e.to_string()));
        }
        report
    }
}

/// Copy until EOF, keeping read and write failures apart. `copied` counts
/// every byte the sink accepted, including a partial chunk before a failure.
fn copy_into<R: Read, W: Write>(
    src: &mut R,
    sink: &mut W,
    buf: &mut [u8],
    copied: &mut u64,
) -> std::result::Result<(), CopyError> {
    loop {
        let n = match src.read(buf) {
            Ok(0) => return Ok(()),
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(CopyError::Read(e)),
        };
        let mut off = 0;
        while off < n {
            match sink.write(&buf[off..n]) {
                Ok(0) => {
                    return Err(CopyError::Write(io::Error::new(
                        ErrorKind::WriteZero,
                        "sink accepted no bytes",
                    )))
                }
                Ok(k) => {
                    off += k;
                    *copied += k as u64;
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(CopyError::Write(e)),
            }
        }
    }
}

/// List `dir` and stream it into `sink` in one call.
pub fn aggregate<W: Write>(
    dir: &Path,
    sink: &mut W,
    who: &Requester,
    order: EntryOrder,
) -> Result<AggregateReport> {
    let listing = Listing::read(dir, order)?;
    Ok(listing.stream_to(sink, who))
}
