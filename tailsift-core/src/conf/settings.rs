use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TailsiftConfig {
    pub ingest: IngestConfig,

    #[serde(default)]
    pub privacy: PrivacyConfig,

    #[serde(default)]
    pub geoip: GeoIpConfig,

    #[serde(default)]
    pub bots: BotConfig,

    #[serde(default)]
    pub store: StoreConfig,

    #[serde(default)]
    pub broadcast: BroadcastConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IngestConfig {
    /// Base paths of the live log files, e.g. "/var/log/caddy/access.log".
    /// Rotated and compressed siblings are discovered from these.
    pub log_paths: Vec<PathBuf>,

    /// Lines between two checkpoint writes during historical import.
    #[serde(default = "default_checkpoint_every")]
    pub checkpoint_every: u64,

    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    #[serde(default = "default_shutdown_timeout_ms")]
    pub shutdown_timeout_ms: u64,

    #[serde(default = "default_summary_window_secs")]
    pub summary_window_secs: u64,

    #[serde(default = "default_summary_interval_ms")]
    pub summary_interval_ms: u64,
}

impl IngestConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_millis(self.shutdown_timeout_ms)
    }

    pub fn summary_window(&self) -> Duration {
        Duration::from_secs(self.summary_window_secs)
    }

    pub fn summary_interval(&self) -> Duration {
        Duration::from_millis(self.summary_interval_ms)
    }
}

fn default_checkpoint_every() -> u64 {
    10_000
}

fn default_poll_interval_ms() -> u64 {
    250
}

fn default_shutdown_timeout_ms() -> u64 {
    5_000
}

fn default_summary_window_secs() -> u64 {
    60
}

fn default_summary_interval_ms() -> u64 {
    1_000
}

/// Client IP privacy. Addresses are anonymized before hashing when both are set.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PrivacyConfig {
    #[serde(default)]
    pub hash_ips: bool,

    #[serde(default)]
    pub salt: String,

    #[serde(default)]
    pub anonymize_ips: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GeoIpConfig {
    /// MaxMind City database. Geo enrichment is disabled when unset.
    #[serde(default)]
    pub db_path: Option<PathBuf>,

    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,
}

impl Default for GeoIpConfig {
    fn default() -> Self {
        Self {
            db_path: None,
            cache_capacity: default_cache_capacity(),
        }
    }
}

fn default_cache_capacity() -> usize {
    10_000
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BotConfig {
    /// JSON signature sets merged over the built-in defaults, in order.
    #[serde(default)]
    pub signature_files: Vec<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StoreConfig {
    #[serde(default = "default_store_path")]
    pub path: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_store_path(),
        }
    }
}

fn default_store_path() -> PathBuf {
    PathBuf::from("tailsift.db")
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BroadcastConfig {
    #[serde(default = "default_broadcast_capacity")]
    pub capacity: usize,
}

impl Default for BroadcastConfig {
    fn default() -> Self {
        Self {
            capacity: default_broadcast_capacity(),
        }
    }
}

fn default_broadcast_capacity() -> usize {
    1_024
}
