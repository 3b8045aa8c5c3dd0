//! Shared fixtures for unit tests.

use crate::broadcast::ChannelBroadcaster;
use crate::ingest::{Enrichment, LiveOutputs, Processor};
use crate::metrics::IngestMetrics;
use crate::store::MemoryStore;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

pub(crate) struct Harness {
    pub processor: Arc<Processor>,
    pub store: Arc<MemoryStore>,
    pub broadcaster: Arc<ChannelBroadcaster>,
    pub metrics: Arc<IngestMetrics>,
}

pub(crate) fn harness() -> Harness {
    harness_with(Enrichment::default(), Duration::from_secs(3600))
}

pub(crate) fn harness_with(enrichment: Enrichment, summary_interval: Duration) -> Harness {
    let store = Arc::new(MemoryStore::new());
    let broadcaster = Arc::new(ChannelBroadcaster::new(64));
    let metrics = Arc::new(IngestMetrics::new().unwrap());

    let processor = Processor::new(
        store.clone(),
        enrichment,
        LiveOutputs {
            broadcaster: broadcaster.clone(),
            metrics: metrics.clone(),
            summary_window: Duration::from_secs(60),
            summary_interval,
        },
    );

    Harness {
        processor: Arc::new(processor),
        store,
        broadcaster,
        metrics,
    }
}

/// One Caddy-style access log line, without the trailing newline.
pub(crate) fn access_line(path: &str, status: u16) -> String {
    json!({
        "ts": 1700000000.25,
        "request": {
            "remote_ip": "203.0.113.9",
            "method": "GET",
            "host": "example.com",
            "uri": path,
            "proto": "HTTP/1.1",
            "headers": {"User-Agent": ["curl/8.4.0"]}
        },
        "duration": 0.004,
        "size": 128,
        "status": status
    })
    .to_string()
}

/// `count` lines for `/p/0`, `/p/1`, ... each terminated by a newline.
pub(crate) fn access_lines(count: usize) -> String {
    (0..count)
        .map(|i| format!("{}\n", access_line(&format!("/p/{i}"), 200)))
        .collect()
}
