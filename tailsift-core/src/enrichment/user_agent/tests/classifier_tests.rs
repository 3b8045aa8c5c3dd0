use crate::enrichment::user_agent::{
    BotClassifier, BotSignature, DeviceType, GENERIC_BOT_NAME, UNKNOWN_BOT_NAME,
};
use std::fs;
use std::sync::Arc;
use std::thread;
use tempfile::tempdir;

const GOOGLEBOT: &str =
    "Mozilla/5.0 (compatible; Googlebot/2.1; +http://www.google.com/bot.html)";

#[test]
fn known_bot_is_named() {
    let classifier = BotClassifier::new();

    let info = classifier.classify(GOOGLEBOT);

    assert!(info.is_bot);
    assert_eq!(info.bot_name, "Googlebot");
    assert_eq!(info.bot_intent, "search");
    assert_eq!(info.device_type, DeviceType::Bot);
}

#[test]
fn specific_signature_beats_generic_one() {
    // Arrange
    let classifier = BotClassifier::new();
    classifier.merge(vec![BotSignature::new("bot", "Any Bot", "unknown")]);

    // Act
    let info = classifier.classify(GOOGLEBOT);

    // Assert
    assert_eq!(info.bot_name, "Googlebot");
}

#[test]
fn signature_hit_alone_marks_a_bot() {
    let classifier = BotClassifier::new();

    for (ua, name) in [
        ("Mastodon/4.1.2 (http.rb/5.1.1; +https://mastodon.social/)", "Mastodon"),
        ("Mozilla/5.0 (compatible; Google-InspectionTool/1.0)", "Google Inspection Tool"),
        ("Mozilla/5.0 (compatible; StatusCake)", "StatusCake"),
        ("Site24x7", "Site24x7"),
    ] {
        let info = classifier.classify(ua);

        assert!(info.is_bot, "{ua}");
        assert_eq!(info.bot_name, name);
        assert_eq!(info.device_type, DeviceType::Bot);
        assert_eq!(info.browser, "");
    }
}

#[test]
fn loaded_signature_names_agent_without_bot_tokens() {
    // Arrange
    let classifier = BotClassifier::new();
    classifier.load(vec![vec![BotSignature::new("acme-fetch", "Acme Fetcher", "monitoring")]]);

    // Act
    let info = classifier.classify("Acme-Fetch/3.2");

    // Assert
    assert!(info.is_bot);
    assert_eq!(info.bot_name, "Acme Fetcher");
    assert_eq!(info.bot_intent, "monitoring");
}

#[test]
fn unmatched_bot_with_url_is_unknown_bot() {
    let classifier = BotClassifier::new();

    let info = classifier.classify("NewCrawler/0.1 (+https://example.com/crawler)");

    assert!(info.is_bot);
    assert_eq!(info.bot_name, UNKNOWN_BOT_NAME);
    assert_eq!(info.bot_intent, "unknown");
}

#[test]
fn unmatched_bot_without_url_is_generic() {
    let classifier = BotClassifier::new();

    let info = classifier.classify("my-little-spider/2.0");

    assert!(info.is_bot);
    assert_eq!(info.bot_name, GENERIC_BOT_NAME);
}

#[test]
fn browsers_are_not_bots() {
    let classifier = BotClassifier::new();

    let info = classifier.classify(
        "Mozilla/5.0 (iPhone; CPU iPhone OS 17_1_2 like Mac OS X) AppleWebKit/605.1.15 \
         (KHTML, like Gecko) Version/17.1.2 Mobile/15E148 Safari/604.1",
    );

    assert!(!info.is_bot);
    assert_eq!(info.browser, "Safari");
    assert_eq!(info.os, "iOS");
    assert_eq!(info.os_version, "17.1.2");
    assert_eq!(info.device_type, DeviceType::Mobile);
    assert!(info.bot_name.is_empty());
}

#[test]
fn empty_user_agent_is_unknown() {
    let classifier = BotClassifier::new();

    let info = classifier.classify("   ");

    assert!(!info.is_bot);
    assert_eq!(info.device_type, DeviceType::Unknown);
}

#[test]
fn load_replaces_overrides_but_keeps_defaults() {
    // Arrange
    let classifier = BotClassifier::new();
    let baseline = classifier.signature_count();
    classifier.merge(vec![BotSignature::new("acmebot", "Acme", "seo")]);
    assert_eq!(classifier.signature_count(), baseline + 1);

    // Act
    classifier.load(vec![vec![BotSignature::new("zetabot", "Zeta", "ai")]]);

    // Assert
    assert_eq!(classifier.signature_count(), baseline + 1);
    assert_eq!(classifier.classify("zetabot/1.0").bot_name, "Zeta");
    assert_eq!(classifier.classify("acmebot/1.0").bot_name, GENERIC_BOT_NAME);
}

#[test]
fn load_files_applies_in_order_and_rejects_bad_files() {
    // Arrange
    let dir = tempdir().unwrap();
    let first = dir.path().join("first.json");
    let second = dir.path().join("second.json");
    let broken = dir.path().join("broken.json");
    fs::write(&first, r#"[{"signature": "acmebot", "name": "Acme v1"}]"#).unwrap();
    fs::write(&second, r#"[{"signature": "acmebot", "name": "Acme v2"}]"#).unwrap();
    fs::write(&broken, "[").unwrap();
    let classifier = BotClassifier::new();

    // Act
    classifier
        .load_files(&[first.clone(), second.clone()])
        .unwrap();
    let before = classifier.signature_count();
    let err = classifier.load_files(&[broken]);

    // Assert
    assert!(err.is_err());
    assert_eq!(classifier.signature_count(), before);
    assert_eq!(classifier.classify("acmebot/1.0").bot_name, "Acme v2");
}

#[test]
fn readers_see_whole_tables_during_reloads() {
    // Arrange
    let classifier = Arc::new(BotClassifier::new());
    let writer = {
        let classifier = classifier.clone();
        thread::spawn(move || {
            for i in 0..200 {
                let name = if i % 2 == 0 { "Even" } else { "Odd" };
                classifier.load(vec![vec![
                    BotSignature::new("pairbot-a", name, "test"),
                    BotSignature::new("pairbot-b", name, "test"),
                ]]);
            }
        })
    };

    // Act / Assert
    for _ in 0..2_000 {
        let table = classifier.table();
        let a = table.find("pairbot-a").map(|s| s.name.clone());
        let b = table.find("pairbot-b").map(|s| s.name.clone());
        assert_eq!(a, b);
    }

    writer.join().unwrap();
}

#[test]
fn concurrent_merges_keep_every_overlay() {
    // Arrange
    let classifier = Arc::new(BotClassifier::new());
    let base = classifier.signature_count();

    // Act
    let writers: Vec<_> = (0..8)
        .map(|i| {
            let classifier = classifier.clone();
            thread::spawn(move || {
                for j in 0..25 {
                    let signature = format!("mergebot-{i}-{j}");
                    classifier.merge(vec![BotSignature::new(&signature, &signature, "test")]);
                }
            })
        })
        .collect();
    for writer in writers {
        writer.join().unwrap();
    }

    // Assert
    assert_eq!(classifier.signature_count(), base + 8 * 25);
    assert_eq!(classifier.classify("mergebot-7-24").bot_name, "mergebot-7-24");
}
