use super::eventually;
use crate::tail::TailManager;
use crate::test_support::{access_line, harness};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

#[tokio::test]
async fn watches_each_path_concurrently() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();
    let a = dir.path().join("a.log");
    let b = dir.path().join("b.log");
    let h = harness();
    let shutdown = CancellationToken::new();
    let manager = TailManager::new(h.processor.clone(), Duration::from_millis(20), &shutdown);

    // Act
    manager.watch(a.clone());
    manager.watch(b.clone());
    tokio::time::sleep(Duration::from_millis(100)).await;
    std::fs::write(&a, format!("{}\n", access_line("/a", 200))).unwrap();
    std::fs::write(&b, format!("{}\n", access_line("/b", 200))).unwrap();

    // Assert
    assert_eq!(manager.active(), 2);
    assert!(eventually(Duration::from_secs(5), || h.store.request_count() == 2).await);
    assert!(manager.stop_within(Duration::from_secs(5)).await);
    assert_eq!(manager.active(), 0);
}

#[tokio::test]
async fn stop_waits_for_every_follower() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();
    let h = harness();
    let shutdown = CancellationToken::new();
    let manager = TailManager::new(h.processor.clone(), Duration::from_millis(20), &shutdown);
    for i in 0..4 {
        manager.watch(dir.path().join(format!("{i}.log")));
    }

    // Act
    manager.stop().await;

    // Assert
    assert_eq!(manager.active(), 0);
}

#[tokio::test]
async fn process_shutdown_cancels_followers() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();
    let h = harness();
    let shutdown = CancellationToken::new();
    let manager = TailManager::new(h.processor.clone(), Duration::from_millis(20), &shutdown);
    manager.watch(dir.path().join("x.log"));

    // Act
    shutdown.cancel();

    // Assert
    assert!(eventually(Duration::from_secs(5), || manager.active() == 0).await);
}

#[tokio::test]
async fn no_new_watches_after_stop() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();
    let h = harness();
    let manager = TailManager::new(h.processor.clone(), Duration::from_millis(20), &CancellationToken::new());
    manager.stop().await;

    // Act
    manager.watch(dir.path().join("late.log"));

    // Assert
    assert_eq!(manager.active(), 0);
}
