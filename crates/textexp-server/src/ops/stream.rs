//! Blocking `Write` adapter feeding an HTTP response body.
//!
//! Aggregation runs on a blocking thread and writes here; bytes are handed to
//! the async side in chunks over a bounded channel, so a slow client applies
//! backpressure to the file reads instead of growing a buffer.

use std::io::{self, Write};

use bytes::{Bytes, BytesMut};
use futures_util::stream::{self, Stream};
use tokio::sync::mpsc;

const CHUNK_BYTES: usize = 16 * 1024;
const QUEUED_CHUNKS: usize = 4;

pub struct ChannelWriter {
    tx: mpsc::Sender<Bytes>,
    buf: BytesMut,
}

impl ChannelWriter {
    fn send_buffered(&mut self) -> io::Result<()> {
        if self.buf.is_empty() {
            return Ok(());
        }
        let chunk = self.buf.split().freeze();
        self.tx
            .blocking_send(chunk)
            .map_err(|_| io::Error::new(io::ErrorKind::BrokenPipe, "response body dropped"))
    }
}

impl Write for ChannelWriter {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(data);
        if self.buf.len() >= CHUNK_BYTES {
            self.send_buffered()?;
        }
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.send_buffered()
    }
}

/// Writer for the blocking side plus the body stream for the async side.
/// The stream ends when the writer is dropped.
pub fn body_channel() -> (
    ChannelWriter,
    impl Stream<Item = io::Result<Bytes>> + Send + 'static,
) {
    let (tx, rx) = mpsc::channel(QUEUED_CHUNKS);
    let writer = ChannelWriter {
        tx,
        buf: BytesMut::with_capacity(CHUNK_BYTES),
    };
    let body = stream::unfold(rx, |mut rx| async move {
        rx.recv().await.map(|chunk| (Ok(chunk), rx))
    });
    (writer, body)
}
