use crate::ingest::{ProcessError, Processor};
use std::io::SeekFrom;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::fs::{self, File};
use tokio::io::{AsyncBufReadExt, AsyncSeekExt, BufReader};
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Where a freshly opened file is read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StartAt {
    /// Only content appended after attaching; used for the first open.
    End,
    /// A rotated-in replacement is new in its entirety.
    Beginning,
    /// Where a failed read left off. Falls back to the beginning when the
    /// file is now shorter than that.
    Offset(u64),
}

/// Device and inode, when the platform has them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FileIdentity {
    dev: u64,
    ino: u64,
}

#[cfg(unix)]
fn identity(meta: &std::fs::Metadata) -> Option<FileIdentity> {
    use std::os::unix::fs::MetadataExt;
    Some(FileIdentity {
        dev: meta.dev(),
        ino: meta.ino(),
    })
}

#[cfg(not(unix))]
fn identity(_meta: &std::fs::Metadata) -> Option<FileIdentity> {
    None
}

struct OpenFile {
    reader: BufReader<File>,
    position: u64,
    identity: Option<FileIdentity>,
}

impl OpenFile {
    async fn open(path: &Path, start: StartAt) -> std::io::Result<Self> {
        let mut file = File::open(path).await?;
        let meta = file.metadata().await?;

        let position = match start {
            StartAt::End => file.seek(SeekFrom::End(0)).await?,
            StartAt::Beginning => 0,
            StartAt::Offset(offset) if offset <= meta.len() => {
                file.seek(SeekFrom::Start(offset)).await?
            }
            StartAt::Offset(_) => 0,
        };

        Ok(Self {
            reader: BufReader::new(file),
            position,
            identity: identity(&meta),
        })
    }

    /// The path now names a different file, or this one shrank below what we read.
    async fn replaced(&self, path: &Path) -> bool {
        match fs::metadata(path).await {
            Ok(meta) => {
                let moved = matches!(
                    (self.identity, identity(&meta)),
                    (Some(ours), Some(theirs)) if ours != theirs
                );
                moved || meta.len() < self.position
            }
            Err(_) => true,
        }
    }
}

/// Follows one log file until cancelled, feeding each complete line through
/// the live path.
pub(crate) struct Follower {
    path: PathBuf,
    processor: Arc<Processor>,
    poll_interval: Duration,
    cancel: CancellationToken,
    pending: Vec<u8>,
}

impl Follower {
    pub(crate) fn new(
        path: PathBuf,
        processor: Arc<Processor>,
        poll_interval: Duration,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            path,
            processor,
            poll_interval,
            cancel,
            pending: Vec::with_capacity(8 * 1024),
        }
    }

    pub(crate) async fn run(mut self, mut start: StartAt) {
        let mut current: Option<OpenFile> = None;

        loop {
            if self.cancel.is_cancelled() {
                break;
            }

            if current.is_none() {
                match OpenFile::open(&self.path, start).await {
                    Ok(file) => {
                        if matches!(start, StartAt::Offset(offset) if offset != file.position) {
                            self.pending.clear();
                        }
                        info!(path = %self.path.display(), offset = file.position, "tail attached");
                        current = Some(file);
                    }
                    Err(err) => {
                        debug!(path = %self.path.display(), error = %err, "log file unavailable; retrying");
                        // Whatever appears later was written after we attached.
                        start = StartAt::Beginning;
                        self.pending.clear();
                        if self.sleep_or_cancel().await {
                            break;
                        }
                    }
                }
                continue;
            }
            let Some(file) = current.as_mut() else {
                continue;
            };

            match file.reader.read_until(b'\n', &mut self.pending).await {
                Ok(0) => {
                    if self.sleep_or_cancel().await {
                        break;
                    }
                    if file.replaced(&self.path).await {
                        self.drain(file).await;
                        info!(path = %self.path.display(), "log file rotated; reopening");
                        current = None;
                        start = StartAt::Beginning;
                    }
                }
                Ok(n) => {
                    file.position += n as u64;
                    if self.pending.ends_with(b"\n") {
                        self.flush_pending().await;
                    }
                }
                Err(err) => {
                    warn!(path = %self.path.display(), error = %err, "read failed; reopening");
                    start = StartAt::Offset(file.position);
                    current = None;
                    if self.sleep_or_cancel().await {
                        break;
                    }
                }
            }
        }

        info!(path = %self.path.display(), "tail stopped");
    }

    /// Consumes whatever the old file still holds once it has been replaced.
    /// A trailing line that never got its newline is processed as is.
    async fn drain(&mut self, file: &mut OpenFile) {
        loop {
            if self.cancel.is_cancelled() {
                return;
            }

            match file.reader.read_until(b'\n', &mut self.pending).await {
                Ok(0) => break,
                Ok(n) => {
                    file.position += n as u64;
                    if self.pending.ends_with(b"\n") {
                        self.flush_pending().await;
                    }
                }
                Err(err) => {
                    warn!(path = %self.path.display(), error = %err, "failed to drain rotated file");
                    break;
                }
            }
        }

        if !self.pending.is_empty() {
            self.flush_pending().await;
        }
    }

    async fn flush_pending(&mut self) {
        let text = String::from_utf8_lossy(&self.pending).into_owned();
        self.pending.clear();

        let line = text.trim_end_matches(['\n', '\r']);
        if line.trim().is_empty() {
            return;
        }

        match self.processor.process_live(line).await {
            Ok(()) => {}
            Err(ProcessError::Parse(err)) => {
                debug!(path = %self.path.display(), error = %err, "skipping malformed log line");
            }
            Err(ProcessError::Store(err)) => {
                warn!(path = %self.path.display(), error = %err, "failed to store live request");
            }
        }
    }

    /// True when cancelled during the wait.
    async fn sleep_or_cancel(&self) -> bool {
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => true,
            _ = sleep(self.poll_interval) => false,
        }
    }
}
