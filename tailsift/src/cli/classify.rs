use anyhow::{Context, Result};
use std::path::PathBuf;
use tailsift_core::enrichment::user_agent::BotClassifier;

pub fn classify(user_agent: &str, signature_files: &[PathBuf]) -> Result<()> {
    let classifier = BotClassifier::new();
    classifier
        .load_files(signature_files)
        .context("failed to load signature files")?;

    let info = classifier.classify(user_agent);
    println!("{}", serde_json::to_string_pretty(&info)?);
    Ok(())
}
