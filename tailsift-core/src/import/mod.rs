//! Historical import: replays every file of a logical log path exactly once,
//! resuming from the stored checkpoint where the file allows it.

mod error;
mod manager;
mod plan;
mod report;
mod source;

#[cfg(test)]
mod tests;

pub use error::ImportError;
pub use manager::{DEFAULT_CHECKPOINT_EVERY, ImportManager};
pub use report::{FileFailure, FileOutcome, FileReport, ImportSummary};
