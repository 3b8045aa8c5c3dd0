use std::future::Future;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tailsift_core::broadcast::ChannelBroadcaster;
use tailsift_core::import::{ImportManager, ImportSummary};
use tailsift_core::ingest::{Enrichment, LiveOutputs, Processor};
use tailsift_core::metrics::IngestMetrics;
use tailsift_core::store::Store;
use tailsift_core::tail::TailManager;
use tokio_util::sync::CancellationToken;

pub const POLL: Duration = Duration::from_millis(20);

/// The ingest stack over a caller-chosen store, wired the way `tailsift run` does it.
pub struct TestPipeline {
    pub processor: Arc<Processor>,
    pub broadcaster: Arc<ChannelBroadcaster>,
    pub metrics: Arc<IngestMetrics>,
}

impl TestPipeline {
    pub fn new(store: Arc<dyn Store>) -> Self {
        let broadcaster = Arc::new(ChannelBroadcaster::new(256));
        let metrics = Arc::new(IngestMetrics::new().unwrap());

        let processor = Processor::new(
            store,
            Enrichment::default(),
            LiveOutputs {
                broadcaster: broadcaster.clone(),
                metrics: metrics.clone(),
                summary_window: Duration::from_secs(60),
                summary_interval: Duration::from_secs(3600),
            },
        );

        Self {
            processor: Arc::new(processor),
            broadcaster,
            metrics,
        }
    }

    pub fn importer(&self, checkpoint_every: u64) -> ImportManager {
        ImportManager::new(self.processor.clone(), checkpoint_every)
    }

    pub fn tails(&self, shutdown: &CancellationToken) -> TailManager {
        TailManager::new(self.processor.clone(), POLL, shutdown)
    }

    pub async fn import(&self, base: &Path) -> ImportSummary {
        self.importer(1_000)
            .import_path(base, &CancellationToken::new())
            .await
            .unwrap()
    }
}

/// Polls `check` every [`POLL`] for up to five seconds.
pub async fn eventually<F>(mut check: F) -> bool
where
    F: FnMut() -> bool,
{
    for _ in 0..250 {
        if check() {
            return true;
        }
        tokio::time::sleep(POLL).await;
    }
    check()
}

/// [`eventually`] for checks that have to await the store.
pub async fn eventually_async<F, Fut>(mut check: F) -> bool
where
    F: FnMut() -> Fut,
    Fut: Future<Output = bool>,
{
    for _ in 0..250 {
        if check().await {
            return true;
        }
        tokio::time::sleep(POLL).await;
    }
    check().await
}
