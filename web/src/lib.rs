//! HTTP adapter for the ticket reservation service.
//!
//! Maps JSON requests onto [`TicketService`](ticket_reservation_core::TicketService)
//! calls and domain errors onto status codes:
//!
//! | Error                  | Status |
//! |------------------------|--------|
//! | `NotFound`             | 404    |
//! | `InsufficientCapacity` | 409    |
//! | `InvalidArgument`      | 400    |
//! | anything else          | 500    |
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use ticket_reservation_core::TicketService;
//! use ticket_reservation_web::{AppState, build_router};
//!
//! # async fn run() -> std::io::Result<()> {
//! let state = AppState::new(Arc::new(TicketService::default()));
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
//! axum::serve(listener, build_router(state)).await
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod state;

pub use error::{AppError, ErrorResponse};
pub use extractors::CorrelationId;
pub use middleware::{CORRELATION_ID_HEADER, correlation_id_layer};
pub use routes::build_router;
pub use state::AppState;
