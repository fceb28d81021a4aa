//! Tracing and metrics setup for the server process.

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Install the global `tracing` subscriber.
///
/// `RUST_LOG` syntax; an unparsable directive falls back to `info`.
pub fn init_tracing(filter: &str) {
    let filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Install the global Prometheus recorder and describe the business metrics.
///
/// # Errors
///
/// Fails if a recorder is already installed in this process.
pub fn install_metrics() -> Result<PrometheusHandle, BuildError> {
    let handle = PrometheusBuilder::new().install_recorder()?;
    ticket_reservation_core::metrics::register_business_metrics();
    tracing::info!("Prometheus recorder installed");
    Ok(handle)
}
