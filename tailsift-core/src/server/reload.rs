use crate::enrichment::user_agent::BotClassifier;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReloadEvent {
    pub epoch: u64,
}

/// Broadcasts "reload now" to whoever subscribed.
#[derive(Clone)]
pub struct ReloadHandle {
    tx: watch::Sender<ReloadEvent>,
}

impl Default for ReloadHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl ReloadHandle {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(ReloadEvent { epoch: 0 });
        Self { tx }
    }

    pub fn subscribe(&self) -> watch::Receiver<ReloadEvent> {
        self.tx.subscribe()
    }

    pub fn notify_reload(&self) {
        self.tx.send_modify(|event| event.epoch += 1);
        let epoch = self.tx.borrow().epoch;
        tracing::info!(epoch, "reload signaled");
    }

    #[cfg(unix)]
    pub async fn install_signal_handler(&self) -> anyhow::Result<()> {
        let mut hup = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::hangup())?;

        while hup.recv().await.is_some() {
            tracing::info!("SIGHUP received");
            self.notify_reload();
        }
        Ok(())
    }
}

/// Swaps in a freshly built signature table. A file that fails to load leaves
/// the current table in place.
pub fn reload_signatures(classifier: &BotClassifier, files: &[PathBuf]) {
    let before = classifier.signature_count();

    match classifier.load_files(files) {
        Ok(after) => tracing::info!(
            old_signatures = before,
            new_signatures = after,
            files = files.len(),
            "bot signatures reloaded"
        ),
        Err(err) => tracing::error!(error = %err, "signature reload failed; keeping previous table"),
    }
}

/// Reloads signatures on every reload event until `shutdown` fires.
pub async fn run_reload_loop(
    reload: ReloadHandle,
    classifier: Arc<BotClassifier>,
    files: Vec<PathBuf>,
    shutdown: CancellationToken,
) {
    let mut rx = reload.subscribe();
    tracing::debug!("reload loop started");

    loop {
        tokio::select! {
            biased;
            _ = shutdown.cancelled() => break,
            changed = rx.changed() => {
                if changed.is_err() {
                    break;
                }
                reload_signatures(&classifier, &files);
            }
        }
    }
}
