use crate::broadcast::Broadcaster;
use crate::enrichment::geoip::GeoLookup;
use crate::enrichment::user_agent::BotClassifier;
use crate::ingest::client_ip::normalize_ip;
use crate::ingest::parse::{ParseError, parse_line};
use crate::ingest::privacy::PrivacyPolicy;
use crate::ingest::summary::SummaryAggregator;
use crate::ingest::{ParsedEntry, RequestRecord};
use crate::metrics::IngestMetrics;
use crate::store::{Store, StoreError};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProcessError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("failed to store request: {0}")]
    Store(#[from] StoreError),
}

/// Everything that derives fields from a parsed entry.
#[derive(Clone)]
pub struct Enrichment {
    pub privacy: PrivacyPolicy,
    pub geo: GeoLookup,
    pub classifier: Arc<BotClassifier>,
}

impl Default for Enrichment {
    fn default() -> Self {
        Self {
            privacy: PrivacyPolicy::default(),
            geo: GeoLookup::disabled(),
            classifier: Arc::new(BotClassifier::new()),
        }
    }
}

/// Side effects only the live path produces.
pub struct LiveOutputs {
    pub broadcaster: Arc<dyn Broadcaster>,
    pub metrics: Arc<IngestMetrics>,
    pub summary_window: Duration,
    pub summary_interval: Duration,
}

struct SummaryState {
    aggregator: SummaryAggregator,
    last_published: Option<Instant>,
}

/// The shared parse, enrich and persist path.
///
/// One instance serves the importer and every tail task.
pub struct Processor {
    enrichment: Enrichment,
    store: Arc<dyn Store>,
    live: LiveOutputs,
    summary: Mutex<SummaryState>,
}

impl Processor {
    pub fn new(store: Arc<dyn Store>, enrichment: Enrichment, live: LiveOutputs) -> Self {
        let summary = SummaryState {
            aggregator: SummaryAggregator::new(live.summary_window),
            last_published: None,
        };

        Self {
            enrichment,
            store,
            live,
            summary: Mutex::new(summary),
        }
    }

    pub fn store(&self) -> &Arc<dyn Store> {
        &self.store
    }

    pub fn enrichment(&self) -> &Enrichment {
        &self.enrichment
    }

    /// Geo lookups use the normalized address; the stored address is the
    /// privacy-transformed one, since a hash cannot be geolocated.
    pub fn enrich(&self, mut entry: ParsedEntry) -> RequestRecord {
        let ip = normalize_ip(&entry.client_ip);
        let geo = self.enrichment.geo.lookup(&ip);
        let agent = self.enrichment.classifier.classify(&entry.user_agent);
        entry.client_ip = self.enrichment.privacy.apply(&ip);

        RequestRecord { entry, geo, agent }
    }

    /// Backlog replay: parse, enrich, persist. No broadcast, no metrics.
    pub async fn process_historical(&self, line: &str) -> Result<(), ProcessError> {
        let record = self.enrich(parse_line(line)?);
        self.store.insert_request(&record).await?;
        Ok(())
    }

    /// Live path: as historical, plus metrics, the event broadcast and a
    /// throttled summary broadcast.
    pub async fn process_live(&self, line: &str) -> Result<(), ProcessError> {
        let entry = match parse_line(line) {
            Ok(entry) => entry,
            Err(err) => {
                self.live.metrics.record_error();
                return Err(err.into());
            }
        };

        let record = self.enrich(entry);
        if let Err(err) = self.store.insert_request(&record).await {
            self.live.metrics.record_error();
            return Err(err.into());
        }

        let metrics = &self.live.metrics;
        metrics.record_success(record.entry.duration_ms, record.entry.bytes);
        metrics.set_last_ingested(record.entry.timestamp);

        self.live.broadcaster.publish_event(&record);
        self.publish_summary_if_due(&record, Instant::now());

        Ok(())
    }

    fn publish_summary_if_due(&self, record: &RequestRecord, now: Instant) {
        let snapshot = {
            let mut state = self.summary.lock();
            state.aggregator.push_at(record, now);

            let due = state
                .last_published
                .is_none_or(|at| now.duration_since(at) >= self.live.summary_interval);
            if !due {
                return;
            }

            state.last_published = Some(now);
            state.aggregator.snapshot_at(now)
        };

        self.live.broadcaster.publish_summary(&snapshot);
    }
}
