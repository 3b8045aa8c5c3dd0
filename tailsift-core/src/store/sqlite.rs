use crate::ingest::RequestRecord;
use crate::store::{ImportProgress, Store, StoreError};
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use parking_lot::Mutex;
use rusqlite::{Connection, OptionalExtension, params};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::task;

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS import_progress (
        file_path TEXT PRIMARY KEY,
        byte_offset INTEGER NOT NULL,
        file_size INTEGER NOT NULL,
        file_mtime TEXT NOT NULL,
        updated_at TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS requests (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        ts TEXT NOT NULL,
        host TEXT NOT NULL,
        method TEXT NOT NULL,
        path TEXT NOT NULL,
        proto TEXT NOT NULL,
        status INTEGER NOT NULL,
        bytes INTEGER NOT NULL,
        client_ip TEXT NOT NULL,
        referrer TEXT NOT NULL,
        user_agent TEXT NOT NULL,
        duration_ms REAL NOT NULL,
        country TEXT NOT NULL,
        region TEXT NOT NULL,
        city TEXT NOT NULL,
        browser TEXT NOT NULL,
        browser_version TEXT NOT NULL,
        os TEXT NOT NULL,
        os_version TEXT NOT NULL,
        device_type TEXT NOT NULL,
        is_bot INTEGER NOT NULL,
        bot_name TEXT NOT NULL,
        bot_intent TEXT NOT NULL
    );

    CREATE INDEX IF NOT EXISTS requests_ts ON requests (ts);
";

/// SQLite-backed store in WAL mode.
///
/// One connection is shared behind a mutex; every statement runs on the
/// blocking pool so callers on the async runtime never stall on disk.
#[derive(Clone)]
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| StoreError::Open {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let conn = Connection::open(path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;
        Self::with_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Rows in `requests`.
    pub async fn request_count(&self) -> Result<u64, StoreError> {
        self.run(|conn| {
            let count: i64 = conn.query_row("SELECT COUNT(*) FROM requests", [], |row| row.get(0))?;
            Ok(count as u64)
        })
        .await
    }

    async fn run<T, F>(&self, f: F) -> Result<T, StoreError>
    where
        F: FnOnce(&Connection) -> Result<T, StoreError> + Send + 'static,
        T: Send + 'static,
    {
        let conn = self.conn.clone();
        task::spawn_blocking(move || {
            let conn = conn.lock();
            f(&conn)
        })
        .await?
    }
}

#[async_trait]
impl Store for SqliteStore {
    async fn get_import_progress(&self, path: &Path) -> Result<Option<ImportProgress>, StoreError> {
        let key = path_key(path);
        self.run(move |conn| {
            let row = conn
                .query_row(
                    "SELECT file_path, byte_offset, file_size, file_mtime
                     FROM import_progress
                     WHERE file_path = ?1",
                    params![key],
                    |row| {
                        Ok((
                            row.get::<_, String>(0)?,
                            row.get::<_, i64>(1)?,
                            row.get::<_, i64>(2)?,
                            row.get::<_, String>(3)?,
                        ))
                    },
                )
                .optional()?;

            let Some((file_path, byte_offset, file_size, file_mtime)) = row else {
                return Ok(None);
            };

            Ok(Some(ImportProgress {
                file_path: PathBuf::from(file_path),
                byte_offset: byte_offset as u64,
                file_size: file_size as u64,
                file_mtime: parse_instant("file_mtime", &file_mtime)?,
            }))
        })
        .await
    }

    async fn set_import_progress(&self, progress: &ImportProgress) -> Result<(), StoreError> {
        let key = path_key(&progress.file_path);
        let byte_offset = progress.byte_offset as i64;
        let file_size = progress.file_size as i64;
        let file_mtime = format_instant(progress.file_mtime);
        let updated_at = format_instant(Utc::now());

        self.run(move |conn| {
            conn.execute(
                "INSERT INTO import_progress (file_path, byte_offset, file_size, file_mtime, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)
                 ON CONFLICT(file_path) DO UPDATE SET
                     byte_offset = excluded.byte_offset,
                     file_size = excluded.file_size,
                     file_mtime = excluded.file_mtime,
                     updated_at = excluded.updated_at",
                params![key, byte_offset, file_size, file_mtime, updated_at],
            )?;
            Ok(())
        })
        .await
    }

    async fn insert_request(&self, record: &RequestRecord) -> Result<(), StoreError> {
        let record = record.clone();
        self.run(move |conn| {
            let RequestRecord { entry, geo, agent } = &record;
            let mut stmt = conn.prepare_cached(
                "INSERT INTO requests (
                     ts, host, method, path, proto, status, bytes, client_ip, referrer,
                     user_agent, duration_ms, country, region, city, browser,
                     browser_version, os, os_version, device_type, is_bot, bot_name, bot_intent
                 )
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15,
                         ?16, ?17, ?18, ?19, ?20, ?21, ?22)",
            )?;
            stmt.execute(params![
                format_instant(entry.timestamp),
                entry.host,
                entry.method,
                entry.path,
                entry.proto,
                i64::from(entry.status),
                entry.bytes as i64,
                entry.client_ip,
                entry.referrer,
                entry.user_agent,
                entry.duration_ms,
                geo.country,
                geo.region,
                geo.city,
                agent.browser,
                agent.browser_version,
                agent.os,
                agent.os_version,
                agent.device_type.as_str(),
                agent.is_bot,
                agent.bot_name,
                agent.bot_intent,
            ])?;
            Ok(())
        })
        .await
    }
}

fn path_key(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

// Nanosecond RFC 3339 round-trips a file mtime exactly, so a stored
// checkpoint compares equal to a fresh stat of an untouched file.
fn format_instant(value: DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

fn parse_instant(column: &'static str, value: &str) -> Result<DateTime<Utc>, StoreError> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| StoreError::Corrupt {
            column,
            value: value.to_string(),
        })
}
