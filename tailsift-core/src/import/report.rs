use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FileOutcome {
    /// Already fully imported and unchanged.
    Skipped,
    Completed,
    /// Stopped by shutdown; the stored checkpoint marks where to continue.
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileReport {
    pub path: PathBuf,
    pub start_offset: u64,
    /// Bytes consumed when the file was left. Decompressed bytes for gzip.
    pub end_offset: u64,
    pub lines: u64,
    /// Lines that failed to parse or persist.
    pub dropped: u64,
    pub outcome: FileOutcome,
}

impl FileReport {
    pub(crate) fn started(path: &Path, offset: u64) -> Self {
        Self {
            path: path.to_path_buf(),
            start_offset: offset,
            end_offset: offset,
            lines: 0,
            dropped: 0,
            outcome: FileOutcome::Completed,
        }
    }

    pub(crate) fn skipped(path: &Path, offset: u64) -> Self {
        Self {
            outcome: FileOutcome::Skipped,
            ..Self::started(path, offset)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileFailure {
    pub path: PathBuf,
    pub error: String,
}

/// Outcome of importing one logical log path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub base: PathBuf,
    pub files: Vec<FileReport>,
    pub failures: Vec<FileFailure>,
    pub cancelled: bool,
}

impl ImportSummary {
    pub(crate) fn new(base: &Path) -> Self {
        Self {
            base: base.to_path_buf(),
            files: Vec::new(),
            failures: Vec::new(),
            cancelled: false,
        }
    }

    pub fn imported(&self) -> usize {
        self.count(FileOutcome::Completed)
    }

    pub fn skipped(&self) -> usize {
        self.count(FileOutcome::Skipped)
    }

    pub fn lines(&self) -> u64 {
        self.files.iter().map(|f| f.lines).sum()
    }

    pub fn dropped(&self) -> u64 {
        self.files.iter().map(|f| f.dropped).sum()
    }

    fn count(&self, outcome: FileOutcome) -> usize {
        self.files.iter().filter(|f| f.outcome == outcome).count()
    }
}
