//! signalhook strategy catalog server
//!
//! CRUD endpoints for strategies and the alerts filed under them.

use std::sync::Arc;

use dotenvy::dotenv;
use signalhook::catalog::{create_router, CatalogState, SERVICE_NAME};
use signalhook::config::{self, CatalogConfig};
use signalhook::logging;
use signalhook::metrics::Metrics;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    logging::init_logging(SERVICE_NAME);

    let config = CatalogConfig::from_env().map_err(|e| {
        error!(error = %e, "Invalid catalog configuration");
        e
    })?;

    info!("Starting signalhook catalog server");
    info!(environment = %config::get_environment(), "Environment");

    let metrics = Arc::new(Metrics::new()?);
    let state = CatalogState::from_config(&config, metrics)
        .await
        .map_err(|e| {
            error!(error = %e, "Catalog backend unavailable");
            e
        })?;
    let app = create_router(state);

    signalhook::core::serve(config.server.addr(), app).await?;
    info!("Catalog server stopped");
    Ok(())
}
