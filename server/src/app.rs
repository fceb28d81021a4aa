//! Server lifecycle: load, serve, autosave, final save.

use crate::config::Config;
use metrics_exporter_prometheus::PrometheusHandle;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use ticket_reservation_core::{SnapshotFile, TicketService};
use ticket_reservation_web::{AppState, build_router};
use tokio::net::TcpListener;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// The ticket service wired to its snapshot file and HTTP router.
pub struct TicketServer {
    service: Arc<TicketService>,
    snapshot: SnapshotFile,
    snapshot_interval: Option<Duration>,
    metrics: Option<PrometheusHandle>,
}

impl TicketServer {
    /// Build a server over a fresh [`TicketService`].
    #[must_use]
    pub fn new(config: &Config, metrics: Option<PrometheusHandle>) -> Self {
        Self::with_service(config, Arc::new(TicketService::default()), metrics)
    }

    /// Build a server over an existing service.
    #[must_use]
    pub fn with_service(
        config: &Config,
        service: Arc<TicketService>,
        metrics: Option<PrometheusHandle>,
    ) -> Self {
        Self {
            service,
            snapshot: SnapshotFile::new(&config.snapshot_path),
            snapshot_interval: config.snapshot_interval,
            metrics,
        }
    }

    /// The service behind the router
    #[must_use]
    pub fn service(&self) -> Arc<TicketService> {
        Arc::clone(&self.service)
    }

    /// Serve on `listener` until `shutdown` resolves, then save the snapshot.
    ///
    /// The snapshot is loaded before the first request is accepted.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP server fails or the final save cannot be written.
    pub async fn run<F>(self, listener: TcpListener, shutdown: F) -> anyhow::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let loaded = self.service.initialize(&self.snapshot);

        let mut state = AppState::new(Arc::clone(&self.service));
        if let Some(handle) = self.metrics.clone() {
            state = state.with_metrics(handle);
        }

        let (stop_tx, stop_rx) = watch::channel(false);
        let autosave = self.snapshot_interval.map(|period| {
            spawn_autosave(Arc::clone(&self.service), self.snapshot.clone(), period, stop_rx)
        });

        tracing::info!(
            address = %listener.local_addr()?,
            events = loaded,
            snapshot = %self.snapshot.path().display(),
            "🎫 Ticket server listening"
        );

        let served = axum::serve(listener, build_router(state))
            .with_graceful_shutdown(shutdown)
            .await;

        tracing::info!("Shutting down gracefully...");
        let _ = stop_tx.send(true);
        if let Some(task) = autosave {
            if let Err(error) = task.await {
                tracing::warn!(error = %error, "Autosave task ended abnormally");
            }
        }

        let service = Arc::clone(&self.service);
        let snapshot = self.snapshot.clone();
        let saved = tokio::task::spawn_blocking(move || service.shutdown(&snapshot)).await?;

        served?;
        saved?;
        tracing::info!("✓ Snapshot saved, server stopped");
        Ok(())
    }
}

impl std::fmt::Debug for TicketServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TicketServer")
            .field("service", &self.service)
            .field("snapshot", &self.snapshot)
            .field("snapshot_interval", &self.snapshot_interval)
            .field("metrics", &self.metrics.is_some())
            .finish()
    }
}

/// Save `service` to `snapshot` every `period` until `stop` flips to true.
fn spawn_autosave(
    service: Arc<TicketService>,
    snapshot: SnapshotFile,
    period: Duration,
    mut stop: watch::Receiver<bool>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        // The first tick fires immediately; the store was just loaded.
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let service = Arc::clone(&service);
                    let snapshot = snapshot.clone();
                    match tokio::task::spawn_blocking(move || service.save(&snapshot)).await {
                        Ok(Ok(events)) => tracing::debug!(events, "Autosave complete"),
                        Ok(Err(error)) => tracing::error!(error = %error, "Autosave failed"),
                        Err(error) => tracing::error!(error = %error, "Autosave task panicked"),
                    }
                }
                changed = stop.changed() => {
                    if changed.is_err() || *stop.borrow() {
                        break;
                    }
                }
            }
        }
    })
}

/// Resolves on Ctrl+C, or SIGTERM on Unix.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(error) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %error, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(error) => {
                tracing::error!(error = %error, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("Received Ctrl+C"),
        () = terminate => tracing::info!("Received SIGTERM"),
    }
}
