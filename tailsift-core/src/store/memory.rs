use crate::ingest::RequestRecord;
use crate::store::{ImportProgress, Store, StoreError};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// Process-local store. Used by tests and `--dry-run` style invocations.
#[derive(Debug, Default)]
pub struct MemoryStore {
    progress: Mutex<HashMap<PathBuf, ImportProgress>>,
    requests: Mutex<Vec<RequestRecord>>,
    progress_writes: AtomicUsize,
    fail_inserts: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn requests(&self) -> Vec<RequestRecord> {
        self.requests.lock().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().len()
    }

    pub fn progress(&self, path: &Path) -> Option<ImportProgress> {
        self.progress.lock().get(path).cloned()
    }

    /// Number of checkpoint writes so far.
    pub fn progress_writes(&self) -> usize {
        self.progress_writes.load(Ordering::SeqCst)
    }

    /// Makes every subsequent `insert_request` fail until switched off.
    pub fn set_fail_inserts(&self, fail: bool) {
        self.fail_inserts.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn get_import_progress(&self, path: &Path) -> Result<Option<ImportProgress>, StoreError> {
        Ok(self.progress(path))
    }

    async fn set_import_progress(&self, progress: &ImportProgress) -> Result<(), StoreError> {
        self.progress
            .lock()
            .insert(progress.file_path.clone(), progress.clone());
        self.progress_writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn insert_request(&self, record: &RequestRecord) -> Result<(), StoreError> {
        if self.fail_inserts.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("inserts disabled".to_string()));
        }

        self.requests.lock().push(record.clone());
        Ok(())
    }
}
