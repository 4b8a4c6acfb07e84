//! # Catalog Cloud Server
//!
//! Main entry point for the Catalog Cloud application: loads configuration,
//! initializes logging and metrics, wires the product service, and serves the
//! REST API until Ctrl+C or SIGTERM.

use catalog_config::ConfigLoader;
use catalog_core::telemetry::{init_telemetry, shutdown_telemetry};
use catalog_core::{CatalogError, CatalogResult};
use catalog_rest::{create_router, AppState};
use catalog_server::{di::AppModuleBuilder, startup};
use tokio::signal;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        // logging may not be initialized yet
        eprintln!("Application error: {e}");
        error!("Application error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> CatalogResult<()> {
    // Load configuration
    let config_loader = ConfigLoader::from_default_location()?;
    let config = config_loader.get().await;

    init_telemetry(&config.observability.telemetry_config(&config.app.name))?;

    startup::print_banner();
    info!("Starting Catalog Cloud Server...");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));
    info!("Environment: {}", config.app.environment);

    let metrics_handle = if config.observability.metrics_enabled {
        Some(startup::install_metrics_recorder()?)
    } else {
        None
    };

    let module = AppModuleBuilder::new(&config).build().await?;

    let mut app_state = AppState::new(module.product_service());
    if let Some(handle) = metrics_handle {
        app_state = app_state.with_metrics(handle);
    }
    let router = create_router(app_state, &config);

    let rest_addr = config.server.rest_addr();
    let listener = tokio::net::TcpListener::bind(&rest_addr)
        .await
        .map_err(|e| CatalogError::Internal(format!("Failed to bind REST: {e}")))?;

    startup::print_startup_info(&config);

    let served = axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| CatalogError::Internal(format!("REST server error: {e}")));

    module.shutdown().await;
    shutdown_telemetry();
    served?;

    info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown...");
        }
        () = terminate => {
            info!("Received terminate signal, initiating graceful shutdown...");
        }
    }
}
