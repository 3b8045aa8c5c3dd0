use crate::enrichment::geoip::GeoInfo;
use lru::LruCache;
use parking_lot::Mutex;
use serde::Serialize;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};

/// Bounded address -> location cache with strict LRU eviction.
///
/// Empty results are cached too, so an address the database does not know
/// (or that does not parse) is only looked up once per process lifetime.
/// Entries never expire.
#[derive(Debug)]
pub struct GeoCache {
    entries: Mutex<LruCache<String, GeoInfo>>,
    capacity: NonZeroUsize,
    hits: AtomicU64,
    misses: AtomicU64,
    evictions: AtomicU64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub len: usize,
    pub capacity: usize,
}

impl GeoCache {
    /// A capacity of zero is raised to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);

        Self {
            entries: Mutex::new(LruCache::new(capacity)),
            capacity,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            evictions: AtomicU64::new(0),
        }
    }

    /// Returns the cached value and marks it most recently used.
    pub fn get(&self, ip: &str) -> Option<GeoInfo> {
        let found = self.entries.lock().get(ip).cloned();

        match found {
            Some(_) => self.hits.fetch_add(1, Ordering::Relaxed),
            None => self.misses.fetch_add(1, Ordering::Relaxed),
        };

        found
    }

    pub fn insert(&self, ip: String, info: GeoInfo) {
        let mut entries = self.entries.lock();

        // `push` hands back the displaced pair: either the previous value for
        // this key or the least recently used entry that made room.
        if let Some((displaced, _)) = entries.push(ip.clone(), info) {
            if displaced != ip {
                self.evictions.fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    pub fn contains(&self, ip: &str) -> bool {
        self.entries.lock().contains(ip)
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
            len: self.entries.lock().len(),
            capacity: self.capacity.get(),
        }
    }
}
