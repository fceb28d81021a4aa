//! Client for the ticket reservation server.
//!
//! - [`TicketClient`]: typed async calls over HTTP
//! - [`shell`]: the `ticket-shell` command language

#![forbid(unsafe_code)]
#![warn(missing_docs, clippy::pedantic)]

pub mod client;
pub mod error;
pub mod shell;

pub use client::TicketClient;
pub use error::{ClientError, Result};
pub use shell::{Command, Flow, ShellParseError};

/// Server used when `TICKET_SERVER_URL` is not set.
pub const DEFAULT_SERVER_URL: &str = "http://localhost:8080";
