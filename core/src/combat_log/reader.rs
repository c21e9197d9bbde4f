use std::io::{ErrorKind, Result, SeekFrom};
use std::path::{Path, PathBuf};

use encoding_rs::WINDOWS_1252;
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, AsyncSeekExt, BufReader};
use tokio::time::{Duration, sleep};
use tracing::{debug, warn};

use crate::context::{LogFileError, LogFileInfo, SessionGuard, parse_log_filename};

const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Where a [`LineSource`] begins reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartPosition {
    /// Replay the whole file from byte 0.
    Beginning,
    /// Skip existing content; only lines appended after opening are yielded.
    End,
}

/// Follows a log file as it grows, yielding complete lines in file order.
///
/// Holds the process-wide [`SessionGuard`], so only one source can be open at a time.
#[derive(Debug)]
pub struct LineSource {
    _session: SessionGuard,
    path: PathBuf,
    info: LogFileInfo,
    start: StartPosition,
    reader: BufReader<File>,
    position: u64,
    pending: Vec<u8>,
    poll_interval: Duration,
}

impl LineSource {
    /// Open `path` after checking the naming contract and that the file exists.
    ///
    /// Fails with [`LogFileError::Session`] while another source is alive.
    pub async fn open(path: impl AsRef<Path>, start: StartPosition) -> std::result::Result<Self, LogFileError> {
        let path = path.as_ref().to_path_buf();
        let info = parse_log_filename(&path)?;

        match tokio::fs::metadata(&path).await {
            Ok(meta) if meta.is_file() => {}
            Ok(_) => return Err(LogFileError::NotFound { path }),
            Err(e) if e.kind() == ErrorKind::NotFound => return Err(LogFileError::NotFound { path }),
            Err(source) => return Err(LogFileError::Io { path, source }),
        }

        let session = SessionGuard::acquire()?;

        let io_err = |source| LogFileError::Io {
            path: path.clone(),
            source,
        };
        let file = File::open(&path).await.map_err(io_err)?;
        let mut reader = BufReader::new(file);

        let position = match start {
            StartPosition::Beginning => 0,
            StartPosition::End => reader.seek(SeekFrom::End(0)).await.map_err(io_err)?,
        };

        debug!(path = %path.display(), character = %info.character, position, "opened log file");

        Ok(Self {
            _session: session,
            path,
            info,
            start,
            reader,
            position,
            pending: Vec::new(),
            poll_interval: DEFAULT_POLL_INTERVAL,
        })
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Character and server recovered from the file name.
    pub fn info(&self) -> &LogFileInfo {
        &self.info
    }

    pub fn character(&self) -> &str {
        &self.info.character
    }

    pub fn start_position(&self) -> StartPosition {
        self.start
    }

    /// Byte offset just past the last byte read.
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Wait until the next complete line is available.
    pub async fn next_line(&mut self) -> Result<String> {
        loop {
            if let Some(line) = self.try_next_line().await? {
                return Ok(line);
            }
            sleep(self.poll_interval).await;
        }
    }

    /// Read the next complete line if one is available, without waiting.
    ///
    /// A trailing fragment with no newline yet is held back until the writer
    /// finishes it.
    pub async fn try_next_line(&mut self) -> Result<Option<String>> {
        let read = self.reader.read_until(b'\n', &mut self.pending).await?;
        if read == 0 {
            self.rewind_if_truncated().await?;
            return Ok(None);
        }
        self.position += read as u64;

        if self.pending.last() != Some(&b'\n') {
            return Ok(None);
        }

        let line = decode_line(&self.pending);
        self.pending.clear();
        Ok(Some(line))
    }

    async fn rewind_if_truncated(&mut self) -> Result<()> {
        let len = match tokio::fs::metadata(&self.path).await {
            Ok(meta) => meta.len(),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "log file is missing, waiting for it");
                return Ok(());
            }
            Err(e) => return Err(e),
        };
        if len < self.position {
            warn!(
                path = %self.path.display(),
                position = self.position,
                len,
                "log file shrank, reading from the beginning"
            );
            self.reader.seek(SeekFrom::Start(0)).await?;
            self.position = 0;
            self.pending.clear();
        }
        Ok(())
    }
}

fn decode_line(bytes: &[u8]) -> String {
    let bytes = bytes.strip_suffix(b"\n").unwrap_or(bytes);
    let bytes = bytes.strip_suffix(b"\r").unwrap_or(bytes);
    let (line, _, _) = WINDOWS_1252.decode(bytes);
    line.into_owned()
}
