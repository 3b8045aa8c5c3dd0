use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const UNKNOWN_INTENT: &str = "unknown";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BotSignature {
    /// Substring matched against the lower-cased user agent.
    pub signature: String,
    /// Display name, e.g. "Googlebot".
    pub name: String,
    /// Category such as "search", "ai", "seo", "social", "monitoring".
    #[serde(default = "default_intent")]
    pub intent: String,
}

fn default_intent() -> String {
    UNKNOWN_INTENT.to_string()
}

impl BotSignature {
    pub fn new(signature: &str, name: &str, intent: &str) -> Self {
        Self {
            signature: signature.to_lowercase(),
            name: name.to_string(),
            intent: intent.to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum SignatureError {
    #[error("failed to read signature file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse signature file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Immutable, ordered signature set. Replaced wholesale, never edited in place.
#[derive(Debug, Clone, Default)]
pub struct SignatureTable {
    /// Sorted by descending signature length, ties broken alphabetically.
    signatures: Vec<BotSignature>,
}

impl SignatureTable {
    /// Merges signature sets in order. A later set replaces an earlier entry
    /// with the same (case-insensitive) signature string.
    pub fn merge<I>(sources: I) -> Self
    where
        I: IntoIterator<Item = Vec<BotSignature>>,
    {
        let mut by_key: HashMap<String, BotSignature> = HashMap::new();

        for source in sources {
            for mut sig in source {
                sig.signature = sig.signature.trim().to_lowercase();
                if sig.signature.is_empty() {
                    continue;
                }
                by_key.insert(sig.signature.clone(), sig);
            }
        }

        Self::from_unsorted(by_key.into_values().collect())
    }

    fn from_unsorted(mut signatures: Vec<BotSignature>) -> Self {
        signatures.sort_by(|a, b| {
            b.signature
                .len()
                .cmp(&a.signature.len())
                .then_with(|| a.signature.cmp(&b.signature))
        });
        Self { signatures }
    }

    /// Returns this table with `source` layered on top.
    pub fn with_overrides(&self, source: Vec<BotSignature>) -> Self {
        Self::merge([self.signatures.clone(), source])
    }

    /// Longest matching signature. `ua_lower` must already be lower-cased.
    pub fn find(&self, ua_lower: &str) -> Option<&BotSignature> {
        self.signatures
            .iter()
            .find(|sig| ua_lower.contains(sig.signature.as_str()))
    }

    pub fn len(&self) -> usize {
        self.signatures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signatures.is_empty()
    }

    pub fn signatures(&self) -> &[BotSignature] {
        &self.signatures
    }
}

/// Reads a JSON array of signatures.
pub fn read_signature_file(path: &Path) -> Result<Vec<BotSignature>, SignatureError> {
    let raw = fs::read_to_string(path).map_err(|source| SignatureError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_str(&raw).map_err(|source| SignatureError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
