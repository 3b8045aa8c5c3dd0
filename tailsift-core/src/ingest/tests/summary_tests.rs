use crate::enrichment::user_agent::DeviceType;
use crate::ingest::{Counted, ParsedEntry, RequestRecord, SummaryAggregator};
use pretty_assertions::assert_eq;
use std::time::{Duration, Instant};

fn record(path: &str, status: u16, duration_ms: f64, is_bot: bool) -> RequestRecord {
    let mut record = RequestRecord {
        entry: ParsedEntry {
            path: path.to_string(),
            status,
            duration_ms,
            ..ParsedEntry::default()
        },
        geo: Default::default(),
        agent: Default::default(),
    };
    record.agent.is_bot = is_bot;
    record.agent.device_type = if is_bot {
        DeviceType::Bot
    } else {
        DeviceType::Desktop
    };
    record.geo.country = "DE".to_string();
    record
}

#[test]
fn counts_status_classes_and_identities() {
    // Arrange
    let mut agg = SummaryAggregator::new(Duration::from_secs(60));
    let t0 = Instant::now();

    // Act
    agg.push_at(&record("/", 200, 3.0, false), t0);
    agg.push_at(&record("/", 304, 3.0, false), t0);
    agg.push_at(&record("/missing", 404, 3.0, true), t0);
    agg.push_at(&record("/boom", 502, 3.0, false), t0);
    let snap = agg.snapshot_at(t0 + Duration::from_secs(1));

    // Assert
    assert_eq!(snap.window_events, 4);
    assert_eq!(
        (snap.status_2xx, snap.status_3xx, snap.status_4xx, snap.status_5xx),
        (1, 1, 1, 1)
    );
    assert_eq!((snap.bot_count, snap.human_count), (1, 3));
    assert_eq!(snap.device_counts.get("desktop"), Some(&3));
    assert_eq!(snap.device_counts.get("bot"), Some(&1));
    assert_eq!(
        snap.top_paths.first(),
        Some(&Counted {
            value: "/".to_string(),
            count: 2
        })
    );
    assert_eq!(snap.top_countries[0].count, 4);
}

#[test]
fn evicts_events_older_than_the_window() {
    // Arrange
    let mut agg = SummaryAggregator::new(Duration::from_secs(10));
    let t0 = Instant::now();
    agg.push_at(&record("/old", 200, 1.0, false), t0);
    agg.push_at(&record("/new", 200, 1.0, false), t0 + Duration::from_secs(8));

    // Act
    let snap = agg.snapshot_at(t0 + Duration::from_secs(12));

    // Assert
    assert_eq!(snap.window_events, 1);
    assert_eq!(snap.top_paths[0].value, "/new");
}

#[test]
fn percentiles_come_from_latency_buckets() {
    // Arrange
    let mut agg = SummaryAggregator::new(Duration::from_secs(60));
    let t0 = Instant::now();
    for _ in 0..98 {
        agg.push_at(&record("/", 200, 4.0, false), t0);
    }
    agg.push_at(&record("/", 200, 300.0, false), t0);
    agg.push_at(&record("/", 200, 5_000.0, false), t0);

    // Act
    let snap = agg.snapshot_at(t0);

    // Assert
    assert_eq!(snap.p95_ms, 5);
    assert_eq!(snap.p99_ms, 500);
    assert_eq!(snap.latency.last().map(|b| (b.label.as_str(), b.count)), Some((">1000ms", 1)));
}

#[test]
fn rps_uses_observed_span() {
    // Arrange
    let mut agg = SummaryAggregator::new(Duration::from_secs(60));
    let t0 = Instant::now();
    for i in 0..=10 {
        agg.push_at(&record("/", 200, 1.0, false), t0 + Duration::from_secs(i));
    }

    // Act
    let snap = agg.snapshot_at(t0 + Duration::from_secs(10));

    // Assert
    assert!((snap.rps - 1.1).abs() < 1e-9, "rps was {}", snap.rps);
}

#[test]
fn empty_window_reports_zeroes() {
    // Act
    let snap = SummaryAggregator::new(Duration::from_secs(60)).snapshot();

    // Assert
    assert_eq!(snap.window_events, 0);
    assert_eq!(snap.rps, 0.0);
    assert_eq!(snap.p99_ms, 0);
    assert!(snap.top_paths.is_empty());
}
