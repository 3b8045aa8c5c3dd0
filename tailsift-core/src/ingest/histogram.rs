use serde::Serialize;

/// Fixed-bucket latency histogram; the last slot counts values past the final bound.
#[derive(Debug, Clone)]
pub(crate) struct Histogram {
    bounds: &'static [u64],
    counts: Vec<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LatencyBucket {
    pub label: String,
    pub count: u64,
}

impl Histogram {
    pub(crate) fn new(bounds: &'static [u64]) -> Self {
        Self {
            bounds,
            counts: vec![0; bounds.len() + 1],
        }
    }

    pub(crate) fn record(&mut self, value_ms: u64) {
        let slot = self
            .bounds
            .iter()
            .position(|bound| value_ms <= *bound)
            .unwrap_or(self.bounds.len());
        self.counts[slot] += 1;
    }

    pub(crate) fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    pub(crate) fn buckets(&self) -> Vec<LatencyBucket> {
        self.counts
            .iter()
            .enumerate()
            .map(|(i, count)| LatencyBucket {
                label: self.label(i),
                count: *count,
            })
            .collect()
    }

    fn label(&self, slot: usize) -> String {
        match (slot.checked_sub(1).map(|i| self.bounds[i]), self.bounds.get(slot)) {
            (None, Some(upper)) => format!("0-{upper}ms"),
            (Some(lower), Some(upper)) => format!("{}-{upper}ms", lower + 1),
            (Some(lower), None) => format!(">{lower}ms"),
            (None, None) => "all".to_string(),
        }
    }

    /// Upper bound of the bucket holding the `pct` quantile. Values in the
    /// overflow slot report one past the last bound.
    pub(crate) fn percentile(&self, pct: f64) -> u64 {
        let total = self.total();
        if total == 0 {
            return 0;
        }

        let target = (total as f64 * pct).ceil() as u64;
        let mut running = 0;
        for (slot, count) in self.counts.iter().enumerate() {
            running += count;
            if running >= target {
                return match self.bounds.get(slot) {
                    Some(upper) => *upper,
                    None => self.bounds.last().map_or(0, |b| b.saturating_add(1)),
                };
            }
        }

        0
    }
}
