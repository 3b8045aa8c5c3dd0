use crate::conf::{discover_log_files, is_gzip};
use crate::import::error::ImportError;
use crate::import::plan::ResumePlan;
use crate::import::report::{FileFailure, FileOutcome, FileReport, ImportSummary};
use crate::import::source::{self, FileStat};
use crate::ingest::{ProcessError, Processor};
use crate::store::ImportProgress;
use std::path::Path;
use std::sync::Arc;
use tokio::io::AsyncBufReadExt;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};

pub const DEFAULT_CHECKPOINT_EVERY: u64 = 10_000;

/// Replays backlog files through the historical path of a [`Processor`].
///
/// Files of one logical path are processed strictly one after another so that
/// no two readers ever race on the same checkpoint.
pub struct ImportManager {
    processor: Arc<Processor>,
    checkpoint_every: u64,
}

impl ImportManager {
    pub fn new(processor: Arc<Processor>, checkpoint_every: u64) -> Self {
        Self {
            processor,
            checkpoint_every: checkpoint_every.max(1),
        }
    }

    /// Imports the base file and every rotated or compressed sibling.
    ///
    /// A file that cannot be read is recorded as a failure and the next file
    /// is tried. Only a base path that cannot be turned into a glob fails the
    /// whole call.
    pub async fn import_path(
        &self,
        base: &Path,
        cancel: &CancellationToken,
    ) -> Result<ImportSummary, ImportError> {
        let files = discover_log_files(base)?;
        let mut summary = ImportSummary::new(base);

        info!(path = %base.display(), files = files.len(), "starting historical import");

        for file in files {
            if cancel.is_cancelled() {
                summary.cancelled = true;
                break;
            }

            match self.import_file(&file, cancel).await {
                Ok(report) => {
                    summary.cancelled = report.outcome == FileOutcome::Cancelled;
                    summary.files.push(report);
                }
                Err(err) => {
                    warn!(path = %file.display(), error = %err, "historical import of file failed");
                    summary.failures.push(FileFailure {
                        path: file,
                        error: err.to_string(),
                    });
                }
            }

            if summary.cancelled {
                break;
            }
        }

        info!(
            path = %base.display(),
            imported = summary.imported(),
            skipped = summary.skipped(),
            failed = summary.failures.len(),
            lines = summary.lines(),
            dropped = summary.dropped(),
            cancelled = summary.cancelled,
            "historical import finished"
        );

        Ok(summary)
    }

    /// Imports a single file, honoring and updating its checkpoint.
    pub async fn import_file(
        &self,
        path: &Path,
        cancel: &CancellationToken,
    ) -> Result<FileReport, ImportError> {
        let gzip = is_gzip(path);
        let current = stat(path).await?;
        let stored = self
            .processor
            .store()
            .get_import_progress(path)
            .await
            .map_err(|source| ImportError::Checkpoint {
                path: path.to_path_buf(),
                source,
            })?;

        let start = match ResumePlan::decide(stored.as_ref(), &current, gzip) {
            ResumePlan::Skip => {
                debug!(path = %path.display(), "file already imported; skipping");
                let offset = stored.map_or(0, |p| p.byte_offset);
                return Ok(FileReport::skipped(path, offset));
            }
            ResumePlan::ReadFrom(offset) => offset,
        };

        info!(path = %path.display(), offset = start, gzip, "importing file");

        let mut reader = source::open(path, gzip, start)
            .await
            .map_err(|source| ImportError::Open {
                path: path.to_path_buf(),
                source,
            })?;

        let mut report = FileReport::started(path, start);
        let mut offset = start;
        let mut since_checkpoint = 0u64;
        let mut buf = Vec::with_capacity(8 * 1024);

        loop {
            if cancel.is_cancelled() {
                report.outcome = FileOutcome::Cancelled;
                break;
            }

            buf.clear();
            let n = reader
                .read_until(b'\n', &mut buf)
                .await
                .map_err(|source| ImportError::Read {
                    path: path.to_path_buf(),
                    offset,
                    source,
                })?;
            if n == 0 {
                break;
            }

            offset += n as u64;
            self.replay_line(&buf, &mut report).await;

            since_checkpoint += 1;
            if since_checkpoint >= self.checkpoint_every && !gzip {
                self.save_checkpoint(path, offset).await?;
                since_checkpoint = 0;
            }
        }

        report.end_offset = offset;

        match report.outcome {
            FileOutcome::Cancelled => {
                // Everything up to `offset` has been handed to the store. A
                // decompressed position means nothing to the next pass.
                if !gzip && since_checkpoint > 0 {
                    self.save_checkpoint(path, offset).await?;
                }
                info!(path = %path.display(), offset, "historical import cancelled");
            }
            _ if gzip => self.save_gzip_complete(path).await?,
            _ => self.save_checkpoint(path, offset).await?,
        }

        if report.outcome == FileOutcome::Completed {
            info!(
                path = %path.display(),
                lines = report.lines,
                dropped = report.dropped,
                "file imported"
            );
        }

        Ok(report)
    }

    async fn replay_line(&self, raw: &[u8], report: &mut FileReport) {
        let text = String::from_utf8_lossy(raw);
        let line = text.trim_end_matches(['\n', '\r']);
        if line.trim().is_empty() {
            return;
        }

        match self.processor.process_historical(line).await {
            Ok(()) => report.lines += 1,
            Err(ProcessError::Parse(err)) => {
                report.dropped += 1;
                trace!(path = %report.path.display(), error = %err, "dropping malformed backlog line");
            }
            Err(ProcessError::Store(err)) => {
                report.dropped += 1;
                warn!(path = %report.path.display(), error = %err, "failed to store backlog line");
            }
        }
    }

    /// Size and mtime are taken fresh, describing the file as of this checkpoint.
    async fn save_checkpoint(&self, path: &Path, offset: u64) -> Result<(), ImportError> {
        let current = stat(path).await?;
        self.write_progress(path, offset, current).await
    }

    async fn save_gzip_complete(&self, path: &Path) -> Result<(), ImportError> {
        let current = stat(path).await?;
        self.write_progress(path, current.size, current).await
    }

    async fn write_progress(
        &self,
        path: &Path,
        offset: u64,
        current: FileStat,
    ) -> Result<(), ImportError> {
        let progress = ImportProgress {
            file_path: path.to_path_buf(),
            byte_offset: offset,
            file_size: current.size,
            file_mtime: current.mtime,
        };

        self.processor
            .store()
            .set_import_progress(&progress)
            .await
            .map_err(|source| ImportError::Checkpoint {
                path: path.to_path_buf(),
                source,
            })?;

        trace!(path = %path.display(), offset, "checkpoint saved");
        Ok(())
    }
}

async fn stat(path: &Path) -> Result<FileStat, ImportError> {
    source::stat(path)
        .await
        .map_err(|source| ImportError::Stat {
            path: path.to_path_buf(),
            source,
        })
}
