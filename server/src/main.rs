//! Ticket Reservation Server
//!
//! # Usage
//!
//! ```bash
//! PORT=8080 SNAPSHOT_PATH=database/events.json cargo run --bin server
//! ```

use ticket_reservation_server::{Config, TicketServer, shutdown_signal, telemetry};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    let _ = dotenvy::dotenv();

    let config = Config::from_env()?;
    telemetry::init_tracing(&config.log_filter);

    tracing::info!("🎫 Starting Ticket Reservation Server...");
    tracing::info!(
        address = %config.bind_address(),
        snapshot = %config.snapshot_path.display(),
        autosave = ?config.snapshot_interval,
        metrics = config.metrics_enabled,
        "Configuration loaded"
    );

    let metrics = if config.metrics_enabled {
        Some(telemetry::install_metrics()?)
    } else {
        None
    };

    let listener = tokio::net::TcpListener::bind(config.bind_address()).await?;
    TicketServer::new(&config, metrics)
        .run(listener, shutdown_signal())
        .await
        .inspect_err(|error| tracing::error!(error = %error, "Server stopped with an error"))
}
