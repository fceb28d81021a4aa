//! Prometheus scrape endpoint.

use crate::error::AppError;
use crate::state::AppState;
use axum::{extract::State, http::header, response::IntoResponse};

/// Render every recorded metric in Prometheus text format.
///
/// # Errors
///
/// 404 when the server runs without a metrics recorder.
#[allow(clippy::unused_async)]
pub async fn metrics(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let handle = state
        .metrics
        .as_ref()
        .ok_or_else(|| AppError::not_found("Metrics are disabled"))?;

    Ok((
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        handle.render(),
    ))
}
