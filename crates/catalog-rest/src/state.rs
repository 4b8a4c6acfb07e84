//! Application state for Axum handlers.

use catalog_service::ProductService;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub product_service: Arc<dyn ProductService>,
    /// Prometheus exporter handle, set when metrics are enabled.
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// Creates a new application state without metrics exposition.
    pub fn new(product_service: Arc<dyn ProductService>) -> Self {
        Self {
            product_service,
            metrics: None,
        }
    }

    /// Attaches a Prometheus handle for the metrics endpoint.
    #[must_use]
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}
