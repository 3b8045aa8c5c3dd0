use anyhow::Result;
use std::path::PathBuf;
use tailsift_core::conf::TailsiftConfig;
use tailsift_core::server::{open_store, run as run_server, shutdown_signal};
use tokio_util::sync::CancellationToken;

pub async fn run(config: PathBuf) -> Result<()> {
    let cfg = TailsiftConfig::from_file(&config)?;
    tracing::info!(config = %config.display(), paths = cfg.ingest.log_paths.len(), "starting tailsift");

    let store = open_store(&cfg.store)?;

    let shutdown = CancellationToken::new();
    tokio::spawn({
        let shutdown = shutdown.clone();
        async move {
            shutdown_signal().await;
            shutdown.cancel();
        }
    });

    run_server(cfg, store, shutdown).await?;
    tracing::info!("tailsift stopped");
    Ok(())
}
