use anyhow::Result;
use std::path::PathBuf;
use std::sync::Arc;
use tailsift_core::conf::TailsiftConfig;
use tailsift_core::server::{open_store, run_import, shutdown_signal};
use tailsift_core::store::{MemoryStore, Store};
use tokio_util::sync::CancellationToken;

pub async fn import(config: PathBuf, dry_run: bool, json: bool) -> Result<()> {
    let cfg = TailsiftConfig::from_file(&config)?;

    let store: Arc<dyn Store> = if dry_run {
        tracing::info!("dry run; nothing will be persisted");
        Arc::new(MemoryStore::new())
    } else {
        open_store(&cfg.store)?
    };

    let cancel = CancellationToken::new();
    tokio::spawn({
        let cancel = cancel.clone();
        async move {
            shutdown_signal().await;
            tracing::info!("shutdown requested; stopping import");
            cancel.cancel();
        }
    });

    let summaries = run_import(cfg, store, cancel).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&summaries)?);
        return Ok(());
    }

    for summary in &summaries {
        println!(
            "{}: {} imported, {} skipped, {} failed, {} lines, {} dropped{}",
            summary.base.display(),
            summary.imported(),
            summary.skipped(),
            summary.failures.len(),
            summary.lines(),
            summary.dropped(),
            if summary.cancelled { " (cancelled)" } else { "" },
        );
        for failure in &summary.failures {
            println!("  ✘ {}: {}", failure.path.display(), failure.error);
        }
    }

    Ok(())
}
