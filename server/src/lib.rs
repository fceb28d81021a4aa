//! Server process for the ticket reservation service.
//!
//! The binary in `main.rs` is a thin wrapper: it reads [`Config`], sets up
//! tracing and metrics, and hands a listener to [`TicketServer::run`].
//!
//! # Lifecycle
//!
//! 1. Load the snapshot (missing or corrupt file: start empty)
//! 2. Serve HTTP, optionally saving every `SNAPSHOT_INTERVAL_SECS`
//! 3. On Ctrl+C / SIGTERM, drain connections and write a final snapshot

#![forbid(unsafe_code)]
#![warn(missing_docs, clippy::pedantic)]

pub mod app;
pub mod config;
pub mod telemetry;

pub use app::{TicketServer, shutdown_signal};
pub use config::{Config, ConfigError};
