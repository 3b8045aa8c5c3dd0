//! Live tailing: one follower task per configured log path.

mod follower;

#[cfg(test)]
mod tests;

use crate::ingest::Processor;
use follower::{Follower, StartAt};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{info, warn};

pub struct TailManager {
    processor: Arc<Processor>,
    poll_interval: Duration,
    cancel: CancellationToken,
    tracker: TaskTracker,
}

impl TailManager {
    /// Followers stop when `shutdown` is cancelled or when [`TailManager::stop`] is called.
    pub fn new(processor: Arc<Processor>, poll_interval: Duration, shutdown: &CancellationToken) -> Self {
        Self {
            processor,
            poll_interval,
            cancel: shutdown.child_token(),
            tracker: TaskTracker::new(),
        }
    }

    /// Starts following `path` from its current end.
    pub fn watch(&self, path: PathBuf) {
        if self.cancel.is_cancelled() {
            warn!(path = %path.display(), "tail manager is stopping; not watching");
            return;
        }

        let follower = Follower::new(
            path,
            self.processor.clone(),
            self.poll_interval,
            self.cancel.clone(),
        );
        self.tracker.spawn(follower.run(StartAt::End));
    }

    /// Followers still running.
    pub fn active(&self) -> usize {
        self.tracker.len()
    }

    /// Cancels every follower and waits until all of them have exited.
    pub async fn stop(&self) {
        self.cancel.cancel();
        self.tracker.close();
        self.tracker.wait().await;
        info!("all tails stopped");
    }

    /// [`TailManager::stop`], giving up after `timeout`. Returns false if some
    /// follower was still running.
    pub async fn stop_within(&self, timeout: Duration) -> bool {
        tokio::time::timeout(timeout, self.stop()).await.is_ok()
    }
}
