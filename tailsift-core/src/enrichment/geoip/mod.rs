mod cache;
mod maxmind;

#[cfg(test)]
mod tests;

pub use cache::{CacheStats, GeoCache};
pub use maxmind::MaxMindReader;

use crate::conf::GeoIpConfig;
use serde::Serialize;
use std::net::IpAddr;
use std::sync::Arc;

/// Resolved location. All-empty means "unknown" and is a valid cached value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GeoInfo {
    /// ISO 3166-1 alpha-2, e.g. "US"
    pub country: String,
    /// First subdivision, localized name
    pub region: String,
    /// Localized city name
    pub city: String,
}

impl GeoInfo {
    pub fn is_empty(&self) -> bool {
        self.country.is_empty() && self.region.is_empty() && self.city.is_empty()
    }
}

/// A geolocation database.
pub trait GeoReader: Send + Sync {
    /// `None` when the database has no record for the address.
    fn locate(&self, ip: IpAddr) -> Option<GeoInfo>;
}

/// Cached geolocation, safe to share between any number of tasks.
#[derive(Clone)]
pub struct GeoLookup {
    reader: Option<Arc<dyn GeoReader>>,
    cache: Arc<GeoCache>,
}

impl GeoLookup {
    pub fn new(reader: Arc<dyn GeoReader>, cache: Arc<GeoCache>) -> Self {
        Self {
            reader: Some(reader),
            cache,
        }
    }

    pub fn disabled() -> Self {
        Self {
            reader: None,
            cache: Arc::new(GeoCache::new(1)),
        }
    }

    /// A missing or unreadable database disables geo enrichment; it never fails startup.
    pub fn from_config(cfg: &GeoIpConfig) -> Self {
        let Some(path) = &cfg.db_path else {
            tracing::info!("no geoip database configured; geo enrichment disabled");
            return Self::disabled();
        };

        match MaxMindReader::open(path) {
            Ok(reader) => {
                tracing::info!(
                    path = %path.display(),
                    cache_capacity = cfg.cache_capacity,
                    "geoip database opened"
                );
                Self::new(
                    Arc::new(reader),
                    Arc::new(GeoCache::new(cfg.cache_capacity)),
                )
            }
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "failed to open geoip database; geo enrichment disabled"
                );
                Self::disabled()
            }
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.reader.is_some()
    }

    pub fn lookup(&self, ip: &str) -> GeoInfo {
        let Some(reader) = &self.reader else {
            return GeoInfo::default();
        };

        if let Some(hit) = self.cache.get(ip) {
            return hit;
        }

        let info = ip
            .parse::<IpAddr>()
            .ok()
            .and_then(|addr| reader.locate(addr))
            .unwrap_or_default();

        self.cache.insert(ip.to_string(), info.clone());
        info
    }

    pub fn stats(&self) -> CacheStats {
        self.cache.stats()
    }
}
