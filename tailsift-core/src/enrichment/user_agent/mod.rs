mod defaults;
mod heuristics;
mod signatures;
mod woothee_engine;

#[cfg(test)]
mod tests;

pub use defaults::default_signatures;
pub use signatures::{
    BotSignature, SignatureError, SignatureTable, UNKNOWN_INTENT, read_signature_file,
};

use crate::enrichment::user_agent::heuristics::{UNKNOWN, detect_browser, detect_device, detect_os};
use crate::enrichment::user_agent::woothee_engine::WootheeEngine;
use arc_swap::ArcSwap;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

/// Tokens that mark a user agent as automated on their own.
const GENERIC_BOT_TOKENS: &[&str] = &["bot", "crawler", "spider", "slurp", "archiver"];

/// Bots without a known signature that link to an info page.
pub const UNKNOWN_BOT_NAME: &str = "Unknown Bot";
/// Bots without a known signature or info link.
pub const GENERIC_BOT_NAME: &str = "Generic Bot";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserAgentInfo {
    pub browser: String,
    pub browser_version: String,
    pub os: String,
    pub os_version: String,
    pub device_type: DeviceType,
    pub is_bot: bool,
    pub bot_name: String,
    pub bot_intent: String,
}

impl Default for UserAgentInfo {
    fn default() -> Self {
        Self {
            browser: UNKNOWN.to_string(),
            browser_version: String::new(),
            os: UNKNOWN.to_string(),
            os_version: String::new(),
            device_type: DeviceType::Unknown,
            is_bot: false,
            bot_name: String::new(),
            bot_intent: String::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceType {
    Desktop,
    Mobile,
    Tablet,
    Bot,
    Unknown,
}

impl DeviceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceType::Desktop => "desktop",
            DeviceType::Mobile => "mobile",
            DeviceType::Tablet => "tablet",
            DeviceType::Bot => "bot",
            DeviceType::Unknown => "unknown",
        }
    }
}

/// User-agent classifier over a hot-swappable signature table.
///
/// Classification loads the current table once per call, so a concurrent
/// reload is observed either entirely or not at all.
pub struct BotClassifier {
    table: ArcSwap<SignatureTable>,
    woothee: WootheeEngine,
}

impl Default for BotClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl BotClassifier {
    /// Classifier over the built-in signatures only.
    pub fn new() -> Self {
        Self {
            table: ArcSwap::from_pointee(SignatureTable::merge([default_signatures()])),
            woothee: WootheeEngine::new(),
        }
    }

    /// Replaces the table with the defaults overlaid by `sources`, in order.
    pub fn load(&self, sources: Vec<Vec<BotSignature>>) {
        let table = SignatureTable::merge(std::iter::once(default_signatures()).chain(sources));
        self.swap(table);
    }

    /// Layers one more set over the current table.
    pub fn merge(&self, source: Vec<BotSignature>) {
        let old = self
            .table
            .rcu(|table| Arc::new(table.with_overrides(source.clone())));
        tracing::debug!(
            old_signatures = old.len(),
            new_signatures = self.signature_count(),
            "bot signature table extended"
        );
    }

    /// Reads every file before touching the table; one bad file leaves the
    /// current table in place.
    pub fn load_files(&self, paths: &[PathBuf]) -> Result<usize, SignatureError> {
        let sources = paths
            .iter()
            .map(|path| read_signature_file(path))
            .collect::<Result<Vec<_>, _>>()?;

        self.load(sources);
        Ok(self.signature_count())
    }

    pub fn signature_count(&self) -> usize {
        self.table.load().len()
    }

    pub fn table(&self) -> Arc<SignatureTable> {
        self.table.load_full()
    }

    fn swap(&self, table: SignatureTable) {
        let old = self.table.swap(Arc::new(table));
        tracing::debug!(
            old_signatures = old.len(),
            new_signatures = self.signature_count(),
            "bot signature table replaced"
        );
    }

    pub fn classify(&self, ua: &str) -> UserAgentInfo {
        if ua.trim().is_empty() {
            return UserAgentInfo::default();
        }

        let lower = ua.to_lowercase();
        let table = self.table.load();
        let signature = table.find(&lower);

        if signature.is_some() || self.is_bot(ua, &lower) {
            return classify_bot(&lower, signature);
        }

        let (browser, browser_version) = detect_browser(&lower);
        let (os, os_version) = detect_os(&lower);

        UserAgentInfo {
            browser,
            browser_version,
            os,
            os_version,
            device_type: detect_device(&lower),
            is_bot: false,
            bot_name: String::new(),
            bot_intent: String::new(),
        }
    }

    fn is_bot(&self, ua: &str, lower: &str) -> bool {
        GENERIC_BOT_TOKENS.iter().any(|t| lower.contains(t)) || self.woothee.is_crawler(ua)
    }
}

/// A signature hit names the bot; otherwise the fallback depends on whether
/// the agent advertises a URL.
fn classify_bot(lower: &str, signature: Option<&BotSignature>) -> UserAgentInfo {
    let (bot_name, bot_intent) = match signature {
        Some(sig) => (sig.name.clone(), sig.intent.clone()),
        None if lower.contains("http://") || lower.contains("https://") => {
            (UNKNOWN_BOT_NAME.to_string(), UNKNOWN_INTENT.to_string())
        }
        None => (GENERIC_BOT_NAME.to_string(), UNKNOWN_INTENT.to_string()),
    };

    UserAgentInfo {
        browser: String::new(),
        browser_version: String::new(),
        os: String::new(),
        os_version: String::new(),
        device_type: DeviceType::Bot,
        is_bot: true,
        bot_name,
        bot_intent,
    }
}
