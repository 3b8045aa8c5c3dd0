use crate::conf::error::ConfigError;
use crate::conf::settings::TailsiftConfig;
use std::collections::HashSet;

/// Checks semantic constraints that serde cannot express.
///
/// All problems are collected so the operator can fix them in one pass.
pub fn validate_config(cfg: &TailsiftConfig) -> Result<(), ConfigError> {
    let mut issues = Vec::new();

    if cfg.ingest.log_paths.is_empty() {
        issues.push("ingest.log_paths must name at least one log file".to_string());
    }

    let mut seen = HashSet::new();
    for path in &cfg.ingest.log_paths {
        if path.as_os_str().is_empty() {
            issues.push("ingest.log_paths contains an empty path".to_string());
        } else if !seen.insert(path) {
            issues.push(format!(
                "ingest.log_paths lists {} more than once",
                path.display()
            ));
        }
    }

    if cfg.ingest.checkpoint_every == 0 {
        issues.push("ingest.checkpoint_every must be greater than zero".to_string());
    }

    if cfg.ingest.poll_interval_ms == 0 {
        issues.push("ingest.poll_interval_ms must be greater than zero".to_string());
    }

    if cfg.ingest.summary_window_secs == 0 {
        issues.push("ingest.summary_window_secs must be greater than zero".to_string());
    }

    if cfg.geoip.cache_capacity == 0 {
        issues.push("geoip.cache_capacity must be greater than zero".to_string());
    }

    if cfg.privacy.hash_ips && cfg.privacy.salt.is_empty() {
        issues.push("privacy.hash_ips requires a non-empty privacy.salt".to_string());
    }

    if cfg.broadcast.capacity == 0 {
        issues.push("broadcast.capacity must be greater than zero".to_string());
    }

    if issues.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::Validation { issues })
    }
}
