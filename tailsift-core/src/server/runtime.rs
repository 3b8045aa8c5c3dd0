use crate::broadcast::ChannelBroadcaster;
use crate::conf::{StoreConfig, TailsiftConfig};
use crate::enrichment::geoip::GeoLookup;
use crate::enrichment::user_agent::BotClassifier;
use crate::ingest::{Enrichment, LiveOutputs, PrivacyPolicy, Processor};
use crate::metrics::IngestMetrics;
use crate::store::{SqliteStore, Store};
use anyhow::{Context, Result};
use std::sync::Arc;

/// Long-lived pieces shared by import, tailing and reload.
pub struct Components {
    pub processor: Arc<Processor>,
    pub classifier: Arc<BotClassifier>,
    pub geo: GeoLookup,
    pub broadcaster: Arc<ChannelBroadcaster>,
    pub metrics: Arc<IngestMetrics>,
}

pub fn open_store(cfg: &StoreConfig) -> Result<Arc<dyn Store>> {
    let store = SqliteStore::open(&cfg.path)
        .with_context(|| format!("failed to open store at {}", cfg.path.display()))?;
    tracing::info!(path = %cfg.path.display(), "store opened");
    Ok(Arc::new(store))
}

pub fn build_components(cfg: &TailsiftConfig, store: Arc<dyn Store>) -> Result<Components> {
    let classifier = Arc::new(BotClassifier::new());
    let count = classifier
        .load_files(&cfg.bots.signature_files)
        .context("failed to load bot signature files")?;
    tracing::info!(signatures = count, files = cfg.bots.signature_files.len(), "bot signatures loaded");

    let geo = GeoLookup::from_config(&cfg.geoip);
    let broadcaster = Arc::new(ChannelBroadcaster::new(cfg.broadcast.capacity));
    let metrics = Arc::new(IngestMetrics::new().context("failed to register ingest metrics")?);

    let privacy = PrivacyPolicy::from_config(&cfg.privacy);
    if !privacy.is_noop() {
        tracing::info!(
            hash = cfg.privacy.hash_ips,
            anonymize = cfg.privacy.anonymize_ips,
            "client IP privacy enabled"
        );
    }

    let processor = Processor::new(
        store,
        Enrichment {
            privacy,
            geo: geo.clone(),
            classifier: classifier.clone(),
        },
        LiveOutputs {
            broadcaster: broadcaster.clone(),
            metrics: metrics.clone(),
            summary_window: cfg.ingest.summary_window(),
            summary_interval: cfg.ingest.summary_interval(),
        },
    );

    Ok(Components {
        processor: Arc::new(processor),
        classifier,
        geo,
        broadcaster,
        metrics,
    })
}
