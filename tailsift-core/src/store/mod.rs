//! Persistence boundary.
//!
//! The ingestion core only needs three calls: read and write a per-file import
//! checkpoint, and insert one enriched request. Rollups, retention and query
//! APIs live behind the same store but outside this crate's concerns.

mod error;
mod memory;
mod sqlite;


pub use error::StoreError;
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use crate::ingest::RequestRecord;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};

/// Per-file checkpoint written by the historical importer.
///
/// Trusted only while `file_size` and `file_mtime` still describe the file on
/// disk; any difference means the path now holds different content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportProgress {
    pub file_path: PathBuf,
    /// Bytes consumed. For gzip files only 0 or the compressed size are meaningful.
    pub byte_offset: u64,
    pub file_size: u64,
    pub file_mtime: DateTime<Utc>,
}

impl ImportProgress {
    pub fn describes(&self, file_size: u64, file_mtime: DateTime<Utc>) -> bool {
        self.file_size == file_size && self.file_mtime == file_mtime
    }
}

#[async_trait]
pub trait Store: Send + Sync {
    async fn get_import_progress(&self, path: &Path) -> Result<Option<ImportProgress>, StoreError>;

    /// Last write wins per `file_path`.
    async fn set_import_progress(&self, progress: &ImportProgress) -> Result<(), StoreError>;

    async fn insert_request(&self, record: &RequestRecord) -> Result<(), StoreError>;
}
