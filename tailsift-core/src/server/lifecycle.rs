use crate::conf::TailsiftConfig;
use crate::enrichment::geoip::GeoLookup;
use crate::import::{ImportManager, ImportSummary};
use crate::metrics::IngestMetrics;
use crate::server::reload::{ReloadHandle, run_reload_loop};
use crate::server::runtime::build_components;
use crate::store::Store;
use crate::tail::TailManager;
use anyhow::Result;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Imports each log path's backlog, then tails it, until `shutdown` fires.
///
/// A path's tail starts only once its backlog is drained, so no line falls
/// between the last imported byte and the tail's end-of-file start.
pub async fn run(config: TailsiftConfig, store: Arc<dyn Store>, shutdown: CancellationToken) -> Result<()> {
    let components = build_components(&config, store)?;

    let reload = ReloadHandle::new();
    #[cfg(unix)]
    tokio::spawn({
        let reload = reload.clone();
        async move {
            if let Err(err) = reload.install_signal_handler().await {
                tracing::warn!(error = %err, "failed to install SIGHUP handler; reload disabled");
            }
        }
    });
    let reload_task = tokio::spawn(run_reload_loop(
        reload,
        components.classifier.clone(),
        config.bots.signature_files.clone(),
        shutdown.clone(),
    ));

    let importer = ImportManager::new(components.processor.clone(), config.ingest.checkpoint_every);
    let tails = TailManager::new(
        components.processor.clone(),
        config.ingest.poll_interval(),
        &shutdown,
    );

    for path in &config.ingest.log_paths {
        if shutdown.is_cancelled() {
            break;
        }

        if let Err(err) = importer.import_path(path, &shutdown).await {
            tracing::warn!(path = %path.display(), error = %err, "historical import failed");
        }

        if shutdown.is_cancelled() {
            break;
        }
        tails.watch(path.clone());
    }

    tracing::info!(tails = tails.active(), "ingest running");
    shutdown.cancelled().await;
    tracing::info!("shutdown requested; stopping tails");

    let timeout = config.ingest.shutdown_timeout();
    if !tails.stop_within(timeout).await {
        tracing::warn!(
            timeout_ms = timeout.as_millis() as u64,
            remaining = tails.active(),
            "tails did not stop in time"
        );
    }
    let _ = reload_task.await;

    log_cache_stats(&components.geo);
    log_ingest_metrics(&components.metrics);
    Ok(())
}

/// Imports every configured path's backlog and returns one summary per path.
pub async fn run_import(
    config: TailsiftConfig,
    store: Arc<dyn Store>,
    cancel: CancellationToken,
) -> Result<Vec<ImportSummary>> {
    let components = build_components(&config, store)?;
    let importer = ImportManager::new(components.processor.clone(), config.ingest.checkpoint_every);

    let mut summaries = Vec::with_capacity(config.ingest.log_paths.len());
    for path in &config.ingest.log_paths {
        if cancel.is_cancelled() {
            break;
        }

        match importer.import_path(path, &cancel).await {
            Ok(summary) => summaries.push(summary),
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "historical import failed")
            }
        }
    }

    log_cache_stats(&components.geo);
    Ok(summaries)
}

/// Resolves on Ctrl-C or, on unix, SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %err, "failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                tracing::warn!(error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

fn log_cache_stats(geo: &GeoLookup) {
    if !geo.is_enabled() {
        return;
    }

    let stats = geo.stats();
    tracing::info!(
        hits = stats.hits,
        misses = stats.misses,
        evictions = stats.evictions,
        len = stats.len,
        capacity = stats.capacity,
        "geo cache statistics"
    );
}

/// Live-path totals, plus the full registry in exposition format at debug.
fn log_ingest_metrics(metrics: &IngestMetrics) {
    tracing::info!(
        lines = metrics.lines(),
        bytes = metrics.bytes(),
        errors = metrics.errors(),
        last_ingested = metrics.last_ingested_seconds(),
        "ingest totals"
    );

    match metrics.encode() {
        Ok(text) => tracing::debug!(metrics = %text, "ingest metrics"),
        Err(err) => tracing::warn!(error = %err, "failed to encode ingest metrics"),
    }
}
