//! Application state for Axum handlers.

use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use ticket_reservation_core::TicketService;

/// Application state shared across all HTTP handlers.
///
/// Cloned per request; both fields are cheap handles.
#[derive(Clone)]
pub struct AppState {
    /// Ticket operations
    pub service: Arc<TicketService>,
    /// Prometheus render handle, absent when metrics are disabled
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// State without a metrics endpoint.
    #[must_use]
    pub const fn new(service: Arc<TicketService>) -> Self {
        Self {
            service,
            metrics: None,
        }
    }

    /// Expose `handle` on `GET /metrics`.
    #[must_use]
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("service", &self.service)
            .field("metrics", &self.metrics.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_is_clone() {
        fn assert_clone<T: Clone + Send + Sync + 'static>() {}
        assert_clone::<AppState>();
    }

    #[test]
    fn test_metrics_disabled_by_default() {
        let state = AppState::new(Arc::new(TicketService::default()));
        assert!(state.metrics.is_none());
    }
}
