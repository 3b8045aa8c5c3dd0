use crate::import::source::FileStat;
use crate::store::ImportProgress;

/// Where to pick a file up, given its stored checkpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ResumePlan {
    Skip,
    ReadFrom(u64),
}

impl ResumePlan {
    /// A checkpoint counts only while size and mtime are unchanged; otherwise
    /// the path holds a different file and reading starts over.
    ///
    /// Compressed streams cannot be seeked, so a gzip file is either skipped
    /// (fully consumed, unchanged) or read again from the beginning.
    pub(crate) fn decide(progress: Option<&ImportProgress>, current: &FileStat, gzip: bool) -> Self {
        let Some(progress) = progress else {
            return ResumePlan::ReadFrom(0);
        };

        let unchanged = progress.describes(current.size, current.mtime);

        if gzip {
            return if unchanged && progress.byte_offset == current.size {
                ResumePlan::Skip
            } else {
                ResumePlan::ReadFrom(0)
            };
        }

        match (unchanged, progress.byte_offset >= current.size) {
            (false, _) => ResumePlan::ReadFrom(0),
            (true, true) => ResumePlan::Skip,
            (true, false) => ResumePlan::ReadFrom(progress.byte_offset),
        }
    }
}
