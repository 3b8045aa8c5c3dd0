use crate::enrichment::user_agent::DeviceType;
use crate::ingest::RequestRecord;
use crate::ingest::histogram::{Histogram, LatencyBucket};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::time::{Duration, Instant};

const LATENCY_BUCKETS_MS: &[u64] = &[1, 5, 10, 25, 50, 100, 250, 500, 1000];
const TOP_N: usize = 5;

struct WindowEvent {
    inserted_at: Instant,
    latency_ms: u64,
    status: u16,
    is_bot: bool,
    device: DeviceType,
    path: String,
    country: String,
}

/// Rolling window over recently ingested live requests.
pub struct SummaryAggregator {
    window: Duration,
    events: VecDeque<WindowEvent>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummarySnapshot {
    pub window_seconds: u64,
    pub rps: f64,
    pub window_events: u64,
    pub status_2xx: u64,
    pub status_3xx: u64,
    pub status_4xx: u64,
    pub status_5xx: u64,
    pub latency: Vec<LatencyBucket>,
    pub p95_ms: u64,
    pub p99_ms: u64,
    pub bot_count: u64,
    pub human_count: u64,
    pub device_counts: BTreeMap<String, u64>,
    pub top_paths: Vec<Counted>,
    pub top_countries: Vec<Counted>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Counted {
    pub value: String,
    pub count: u64,
}

impl SummaryAggregator {
    pub fn new(window: Duration) -> Self {
        Self {
            window: window.max(Duration::from_secs(1)),
            events: VecDeque::new(),
        }
    }

    pub fn push(&mut self, record: &RequestRecord) {
        self.push_at(record, Instant::now());
    }

    pub(crate) fn push_at(&mut self, record: &RequestRecord, now: Instant) {
        self.events.push_back(WindowEvent {
            inserted_at: now,
            latency_ms: record.entry.duration_ms.max(0.0).round() as u64,
            status: record.entry.status,
            is_bot: record.agent.is_bot,
            device: record.agent.device_type,
            path: record.entry.path.clone(),
            country: record.geo.country.clone(),
        });
        self.evict(now);
    }

    pub fn snapshot(&mut self) -> SummarySnapshot {
        self.snapshot_at(Instant::now())
    }

    pub(crate) fn snapshot_at(&mut self, now: Instant) -> SummarySnapshot {
        self.evict(now);

        let mut latency = Histogram::new(LATENCY_BUCKETS_MS);
        let mut status = [0u64; 4];
        let mut bot_count = 0;
        let mut human_count = 0;
        let mut device_counts = BTreeMap::new();
        let mut paths: HashMap<&str, u64> = HashMap::new();
        let mut countries: HashMap<&str, u64> = HashMap::new();

        for ev in &self.events {
            latency.record(ev.latency_ms);

            if let Some(slot) = match ev.status {
                200..=299 => Some(0),
                300..=399 => Some(1),
                400..=499 => Some(2),
                500..=599 => Some(3),
                _ => None,
            } {
                status[slot] += 1;
            }

            if ev.is_bot {
                bot_count += 1;
            } else {
                human_count += 1;
            }

            *device_counts.entry(ev.device.as_str().to_string()).or_insert(0) += 1;
            *paths.entry(ev.path.as_str()).or_insert(0) += 1;
            if !ev.country.is_empty() {
                *countries.entry(ev.country.as_str()).or_insert(0) += 1;
            }
        }

        // Observed span, clamped so a burst inside 100ms doesn't report absurd rates.
        let span = self
            .events
            .back()
            .zip(self.events.front())
            .map(|(last, first)| last.inserted_at.duration_since(first.inserted_at))
            .unwrap_or(self.window);
        let denom = span.as_secs_f64().clamp(0.1, self.window.as_secs_f64());

        SummarySnapshot {
            window_seconds: self.window.as_secs(),
            rps: self.events.len() as f64 / denom,
            window_events: self.events.len() as u64,
            status_2xx: status[0],
            status_3xx: status[1],
            status_4xx: status[2],
            status_5xx: status[3],
            p95_ms: latency.percentile(0.95),
            p99_ms: latency.percentile(0.99),
            latency: latency.buckets(),
            bot_count,
            human_count,
            device_counts,
            top_paths: top_n(paths),
            top_countries: top_n(countries),
        }
    }

    fn evict(&mut self, now: Instant) {
        while let Some(ev) = self.events.front() {
            if now.duration_since(ev.inserted_at) > self.window {
                self.events.pop_front();
            } else {
                break;
            }
        }
    }
}

fn top_n(counts: HashMap<&str, u64>) -> Vec<Counted> {
    let mut ranked: Vec<_> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    ranked
        .into_iter()
        .take(TOP_N)
        .map(|(value, count)| Counted {
            value: value.to_string(),
            count,
        })
        .collect()
}
