//! Live ingest metrics.
//!
//! Counters live on a private registry owned by the process rather than the
//! prometheus default registry, so tests can build as many instances as they
//! like. Only the live path records here; backlog replay would skew rates.

use chrono::{DateTime, Utc};
use prometheus::{Encoder, Gauge, Histogram, HistogramOpts, IntCounter, Registry, TextEncoder};

const DURATION_BUCKETS: &[f64] = &[
    0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
];

pub struct IngestMetrics {
    registry: Registry,
    ingest_duration: Histogram,
    ingested_bytes: IntCounter,
    ingested_lines: IntCounter,
    ingest_errors: IntCounter,
    last_ingested: Gauge,
}

impl IngestMetrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let ingest_duration = Histogram::with_opts(
            HistogramOpts::new(
                "tailsift_ingest_duration_seconds",
                "Upstream request duration of ingested live requests",
            )
            .buckets(DURATION_BUCKETS.to_vec()),
        )?;
        let ingested_bytes = IntCounter::new(
            "tailsift_ingested_bytes_total",
            "Response bytes of ingested live requests",
        )?;
        let ingested_lines = IntCounter::new(
            "tailsift_ingested_lines_total",
            "Live log lines ingested successfully",
        )?;
        let ingest_errors = IntCounter::new(
            "tailsift_ingest_errors_total",
            "Live log lines that failed to parse or persist",
        )?;
        let last_ingested = Gauge::new(
            "tailsift_last_ingested_timestamp_seconds",
            "Event timestamp of the most recent live request",
        )?;

        registry.register(Box::new(ingest_duration.clone()))?;
        registry.register(Box::new(ingested_bytes.clone()))?;
        registry.register(Box::new(ingested_lines.clone()))?;
        registry.register(Box::new(ingest_errors.clone()))?;
        registry.register(Box::new(last_ingested.clone()))?;

        Ok(Self {
            registry,
            ingest_duration,
            ingested_bytes,
            ingested_lines,
            ingest_errors,
            last_ingested,
        })
    }

    pub fn record_success(&self, duration_ms: f64, bytes: u64) {
        self.ingest_duration.observe(duration_ms.max(0.0) / 1000.0);
        self.ingested_bytes.inc_by(bytes);
        self.ingested_lines.inc();
    }

    pub fn record_error(&self) {
        self.ingest_errors.inc();
    }

    pub fn set_last_ingested(&self, timestamp: DateTime<Utc>) {
        self.last_ingested
            .set(timestamp.timestamp_micros() as f64 / 1_000_000.0);
    }

    pub fn lines(&self) -> u64 {
        self.ingested_lines.get()
    }

    pub fn errors(&self) -> u64 {
        self.ingest_errors.get()
    }

    pub fn bytes(&self) -> u64 {
        self.ingested_bytes.get()
    }

    pub fn last_ingested_seconds(&self) -> f64 {
        self.last_ingested.get()
    }

    /// Text exposition of every metric in the registry.
    pub fn encode(&self) -> Result<String, prometheus::Error> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn success_updates_counters_and_histogram() {
        // Arrange
        let metrics = IngestMetrics::new().unwrap();

        // Act
        metrics.record_success(120.0, 512);
        metrics.record_success(30.0, 88);

        // Assert
        assert_eq!(metrics.lines(), 2);
        assert_eq!(metrics.bytes(), 600);
        assert_eq!(metrics.errors(), 0);
        assert!(metrics.encode().unwrap().contains("tailsift_ingest_duration_seconds_count 2"));
    }

    #[test]
    fn errors_count_separately() {
        // Arrange
        let metrics = IngestMetrics::new().unwrap();

        // Act
        metrics.record_error();

        // Assert
        assert_eq!(metrics.errors(), 1);
        assert_eq!(metrics.lines(), 0);
    }

    #[test]
    fn last_ingested_is_epoch_seconds() {
        // Arrange
        let metrics = IngestMetrics::new().unwrap();
        let ts = Utc.timestamp_opt(1_700_000_000, 500_000_000).unwrap();

        // Act
        metrics.set_last_ingested(ts);

        // Assert
        assert_eq!(metrics.last_ingested_seconds(), 1_700_000_000.5);
    }

    #[test]
    fn instances_do_not_share_a_registry() {
        // Arrange
        let first = IngestMetrics::new().unwrap();
        let second = IngestMetrics::new().unwrap();

        // Act
        first.record_error();

        // Assert
        assert_eq!(second.errors(), 0);
    }
}
