//! Streaming artifact download.
//!
//! The response body is read on a dedicated thread in [`CHUNK_SIZE`] pieces
//! and handed to the writer through a bounded channel of [`CHANNEL_DEPTH`]
//! slots, so at most a few chunks are ever held in memory and a slow disk
//! throttles the network read.
//!
//! The reader thread is detached. A write error ends the download at once,
//! even while the reader is still parked in a read on a stalled connection;
//! the reader exits on its next send or when the connection closes.
//!
//! A download is complete only after the file has been flushed and synced.
//! Partial files left by a failed download are not removed; cleanup is the
//! caller's responsibility.

use reqwest::blocking::{Client, Response};
use std::fs::{self, File};
use std::io::{self, BufWriter, ErrorKind, Read, Write};
use std::path::Path;
use std::sync::mpsc::{sync_channel, SyncSender};
use std::thread;

use crate::checksum::CHUNK_SIZE;
use crate::error::{RegistryError, Result};

/// Chunks buffered between the network reader and the file writer.
pub const CHANNEL_DEPTH: usize = 8;

/// Download `url` into `output`, returning the number of bytes written.
pub(crate) fn download_to_file(
    client: &Client,
    url: &str,
    token: Option<&str>,
    output: &Path,
) -> Result<u64> {
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| RegistryError::download(url, e))?;
    }

    let mut request = client.get(url);
    if let Some(token) = token {
        request = request.bearer_auth(token);
    }

    tracing::debug!("Downloading {} to {}", url, output.display());

    let response = request
        .send()
        .and_then(Response::error_for_status)
        .map_err(|e| RegistryError::download(url, e))?;
    let expected_len = response.content_length();

    let file = File::create(output).map_err(|e| RegistryError::download(url, e))?;
    let written = write_file(response, file).map_err(|e| RegistryError::download(url, e))?;

    if let Some(expected) = expected_len {
        if written != expected {
            return Err(RegistryError::download(
                url,
                io::Error::new(
                    ErrorKind::UnexpectedEof,
                    format!("received {} of {} bytes", written, expected),
                ),
            ));
        }
    }

    tracing::info!("Downloaded {} ({} bytes) to {}", url, written, output.display());
    Ok(written)
}

/// Stream `body` into `file`, then flush and sync.
fn write_file<R: Read + Send + 'static>(body: R, file: File) -> io::Result<u64> {
    let mut writer = BufWriter::new(file);
    let written = stream_body(body, &mut writer)?;
    let file = writer.into_inner().map_err(|e| e.into_error())?;
    file.sync_all()?;
    Ok(written)
}

/// Copy `body` into `out` through a bounded channel.
fn stream_body<R, W>(body: R, out: &mut W) -> io::Result<u64>
where
    R: Read + Send + 'static,
    W: Write,
{
    let (tx, rx) = sync_channel::<io::Result<Vec<u8>>>(CHANNEL_DEPTH);
    let reader = thread::Builder::new()
        .name("craft-download".to_string())
        .spawn(move || read_chunks(body, tx))?;

    let mut written = 0u64;
    // Returning early drops `rx` without joining the reader.
    for chunk in rx {
        let chunk = chunk?;
        out.write_all(&chunk)?;
        written += chunk.len() as u64;
    }

    // The channel only closes once the reader has returned.
    if reader.join().is_err() {
        return Err(io::Error::other("download reader panicked"));
    }
    Ok(written)
}

fn read_chunks<R: Read>(mut body: R, tx: SyncSender<io::Result<Vec<u8>>>) {
    loop {
        let mut buf = vec![0u8; CHUNK_SIZE];
        let msg = match body.read(&mut buf) {
            Ok(0) => return,
            Ok(n) => {
                buf.truncate(n);
                Ok(buf)
            }
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => Err(e),
        };

        let failed = msg.is_err();
        if tx.send(msg).is_err() || failed {
            return;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use std::sync::mpsc;
    use std::time::Duration;
    use tempfile::TempDir;

    /// Yields `good` bytes, then fails.
    struct BrokenBody {
        good: Cursor<Vec<u8>>,
    }

    impl Read for BrokenBody {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            match self.good.read(buf)? {
                0 => Err(io::Error::new(ErrorKind::ConnectionReset, "peer reset")),
                n => Ok(n),
            }
        }
    }

    /// Yields one chunk, then blocks forever like a stalled peer.
    struct StalledBody {
        sent: bool,
    }

    impl Read for StalledBody {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if !self.sent {
                self.sent = true;
                buf.fill(7);
                return Ok(buf.len());
            }
            loop {
                thread::park();
            }
        }
    }

    /// Rejects every write, like a full disk.
    struct FullDisk;

    impl Write for FullDisk {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(ErrorKind::StorageFull, "no space left on device"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn stream_body_writes_everything() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("out.bin");
        let data: Vec<u8> = (0..(CHUNK_SIZE * 2 + 123)).map(|i| (i % 251) as u8).collect();

        let written = write_file(Cursor::new(data.clone()), File::create(&path).unwrap()).unwrap();

        assert_eq!(written, data.len() as u64);
        assert_eq!(fs::read(&path).unwrap(), data);
    }

    #[test]
    fn stream_body_empty_input() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("empty.bin");

        let written = write_file(Cursor::new(Vec::new()), File::create(&path).unwrap()).unwrap();

        assert_eq!(written, 0);
        assert_eq!(fs::metadata(&path).unwrap().len(), 0);
    }

    #[test]
    fn stream_body_surfaces_read_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("partial.bin");
        let body = BrokenBody {
            good: Cursor::new(vec![1u8; 1000]),
        };

        let err = write_file(body, File::create(&path).unwrap()).unwrap_err();

        assert_eq!(err.kind(), ErrorKind::ConnectionReset);
        // Partial output stays on disk for the caller to handle.
        assert!(path.exists());
    }

    #[test]
    fn write_error_does_not_wait_for_stalled_reader() {
        let (done_tx, done_rx) = mpsc::channel();
        thread::spawn(move || {
            let result = stream_body(StalledBody { sent: false }, &mut FullDisk);
            let _ = done_tx.send(result);
        });

        let result = done_rx
            .recv_timeout(Duration::from_secs(10))
            .expect("stream_body blocked after the write failed");
        assert_eq!(result.unwrap_err().kind(), ErrorKind::StorageFull);
    }

    #[test]
    fn reader_stops_when_writer_goes_away() {
        let (tx, rx) = sync_channel(1);
        drop(rx);
        // Must return rather than block on a full channel.
        read_chunks(Cursor::new(vec![0u8; CHUNK_SIZE * 4]), tx);
    }
}
