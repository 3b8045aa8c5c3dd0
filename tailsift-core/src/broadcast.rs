//! Fan-out of live events to whoever is listening.

use crate::ingest::{RequestRecord, SummarySnapshot};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::warn;

/// Best-effort delivery; implementations never block the caller.
pub trait Broadcaster: Send + Sync {
    fn publish_event(&self, record: &RequestRecord);
    fn publish_summary(&self, summary: &SummarySnapshot);
}

#[derive(Serialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
enum Message<'a> {
    Event(&'a RequestRecord),
    Summary(&'a SummarySnapshot),
}

/// Publishes JSON text frames on a tokio broadcast channel.
///
/// Slow subscribers lag and lose the oldest frames; having no subscribers at
/// all is normal.
pub struct ChannelBroadcaster {
    tx: broadcast::Sender<Arc<str>>,
}

impl ChannelBroadcaster {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Arc<str>> {
        self.tx.subscribe()
    }

    fn send(&self, message: Message<'_>) {
        match serde_json::to_string(&message) {
            // Err only means nobody is subscribed.
            Ok(json) => {
                let _ = self.tx.send(Arc::from(json));
            }
            Err(err) => warn!(error = %err, "failed to serialize broadcast message"),
        }
    }
}

impl Broadcaster for ChannelBroadcaster {
    fn publish_event(&self, record: &RequestRecord) {
        self.send(Message::Event(record));
    }

    fn publish_summary(&self, summary: &SummarySnapshot) {
        self.send(Message::Summary(summary));
    }
}
