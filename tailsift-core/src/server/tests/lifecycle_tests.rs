use crate::conf::TailsiftConfig;
use crate::server::{run, run_import};
use crate::store::{MemoryStore, Store};
use crate::test_support::{access_line, access_lines};
use std::io::Write;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

fn config_for(log: &Path) -> TailsiftConfig {
    let raw = format!(
        r#"
        [ingest]
        log_paths = ['{}']
        poll_interval_ms = 20
        shutdown_timeout_ms = 2000
        "#,
        log.display()
    );
    TailsiftConfig::from_str(&raw).unwrap()
}

async fn wait_for_count(store: &MemoryStore, count: usize) -> bool {
    for _ in 0..250 {
        if store.request_count() == count {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    false
}

#[tokio::test]
async fn run_imports_backlog_then_tails_until_shutdown() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();
    let log = dir.path().join("access.log");
    std::fs::write(&log, access_lines(3)).unwrap();
    let store = Arc::new(MemoryStore::new());
    let shutdown = CancellationToken::new();
    let task = tokio::spawn(run(config_for(&log), store.clone(), shutdown.clone()));
    assert!(wait_for_count(&store, 3).await);
    tokio::time::sleep(Duration::from_millis(200)).await;

    // Act
    let mut file = std::fs::OpenOptions::new().append(true).open(&log).unwrap();
    writeln!(file, "{}", access_line("/live", 200)).unwrap();
    file.flush().unwrap();

    // Assert
    assert!(wait_for_count(&store, 4).await);
    shutdown.cancel();
    tokio::time::timeout(Duration::from_secs(5), task)
        .await
        .unwrap()
        .unwrap()
        .unwrap();
    assert!(store.get_import_progress(&log).await.unwrap().is_some());
}

#[tokio::test]
async fn run_import_reports_per_path() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();
    let log = dir.path().join("access.log");
    std::fs::write(&log, access_lines(2)).unwrap();
    std::fs::write(dir.path().join("access.log.1"), access_lines(5)).unwrap();
    let store = Arc::new(MemoryStore::new());

    // Act
    let summaries = run_import(config_for(&log), store.clone(), CancellationToken::new())
        .await
        .unwrap();

    // Assert
    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0].imported(), 2);
    assert_eq!(summaries[0].lines(), 7);
    assert_eq!(store.request_count(), 7);
}
