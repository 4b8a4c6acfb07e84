//! Server startup utilities.

use catalog_config::AppConfig;
use catalog_core::{CatalogError, CatalogResult};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tracing::info;

/// Prints the startup banner.
pub fn print_banner() {
    info!(r#"
   ______      __        __
  / ____/___ _/ /_____ _/ /___  ____ _
 / /   / __ `/ __/ __ `/ / __ \/ __ `/
/ /___/ /_/ / /_/ /_/ / / /_/ / /_/ /
\____/\__,_/\__/\__,_/_/\____/\__, /
                             /____/   Cloud
    "#);
}

/// Prints server startup information.
pub fn print_startup_info(config: &AppConfig) {
    let separator = "=".repeat(60);
    let base = format!("http://{}", config.server.rest_addr());
    info!("{}", separator);
    info!("REST API:  {}/products", base);
    info!("Health:    {}/health", base);
    info!("API Docs:  {}/swagger-ui", base);
    if config.observability.metrics_enabled {
        info!("Metrics:   {}{}", base, config.observability.metrics_path);
    }
    info!("Store:     {}", config.database.backend);
    info!("Cache:     {}", config.cache.backend);
    info!("{}", separator);
}

/// Installs the global Prometheus recorder and describes the cache metrics.
///
/// # Errors
///
/// Returns [`CatalogError::Internal`] if a recorder is already installed.
pub fn install_metrics_recorder() -> CatalogResult<PrometheusHandle> {
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| CatalogError::Internal(format!("Failed to install metrics recorder: {e}")))?;

    catalog_service::metrics::register_metrics();
    Ok(handle)
}
