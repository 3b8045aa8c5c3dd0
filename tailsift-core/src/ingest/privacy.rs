use crate::conf::PrivacyConfig;
use sha2::{Digest, Sha256};

/// How client addresses are transformed before they are stored.
#[derive(Debug, Clone, Default)]
pub struct PrivacyPolicy {
    anonymize: bool,
    hash_salt: Option<String>,
}

impl PrivacyPolicy {
    pub fn from_config(cfg: &PrivacyConfig) -> Self {
        Self {
            anonymize: cfg.anonymize_ips,
            hash_salt: cfg.hash_ips.then(|| cfg.salt.clone()),
        }
    }

    pub fn is_noop(&self) -> bool {
        !self.anonymize && self.hash_salt.is_none()
    }

    /// Anonymize first, then hash, so a salted digest never depends on the last segment.
    pub fn apply(&self, ip: &str) -> String {
        if ip.is_empty() {
            return String::new();
        }

        let ip = if self.anonymize {
            anonymize_ip(ip)
        } else {
            ip.to_string()
        };

        match &self.hash_salt {
            Some(salt) => hash_ip(&ip, salt),
            None => ip,
        }
    }
}

/// Zeroes the final segment of an address: the last octet of IPv4, the last
/// colon-separated group of IPv6.
pub fn anonymize_ip(ip: &str) -> String {
    let separator = if ip.contains(':') { ':' } else { '.' };

    match ip.rsplit_once(separator) {
        Some((head, _)) => format!("{head}{separator}0"),
        None => ip.to_string(),
    }
}

/// Salted SHA-256 of the address, hex encoded (64 characters).
pub fn hash_ip(ip: &str, salt: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(ip.as_bytes());
    hex::encode(hasher.finalize())
}
