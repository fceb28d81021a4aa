//! Router configuration.

use crate::handlers::{self, events};
use crate::middleware::correlation_id_layer;
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

/// Build the complete Axum router.
///
/// Routes:
/// - `GET  /health`
/// - `GET  /metrics`
/// - `GET  /events`
/// - `GET  /events/:id`
/// - `POST /events/create`
/// - `POST /events/book`
///
/// Every response carries an `X-Correlation-ID` header.
pub fn build_router(state: AppState) -> Router {
    let event_routes = Router::new()
        .route("/", get(events::list_events))
        .route("/create", post(events::create_event))
        .route("/book", post(events::book_tickets))
        .route("/:id", get(events::get_event));

    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/metrics", get(handlers::metrics::metrics))
        .nest("/events", event_routes)
        .layer(TraceLayer::new_for_http())
        .layer(correlation_id_layer())
        .with_state(state)
}
