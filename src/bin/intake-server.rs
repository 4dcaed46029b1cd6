//! signalhook alert intake server
//!
//! Receives webhook alerts, appends them to the alert store, and forwards
//! a summary to the messaging API. Refuses to start without
//! `LINE_NOTIFY_TOKEN`.

use std::sync::Arc;

use dotenvy::dotenv;
use signalhook::config::{self, IntakeConfig};
use signalhook::intake::{create_router, IntakeState, SERVICE_NAME};
use signalhook::logging;
use signalhook::metrics::Metrics;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    logging::init_logging(SERVICE_NAME);

    let config = IntakeConfig::from_env().map_err(|e| {
        error!(error = %e, "Invalid intake configuration");
        e
    })?;

    info!("Starting signalhook intake server");
    info!(environment = %config::get_environment(), "Environment");
    info!(endpoint = %config.notify.endpoint, "Notification endpoint");

    let metrics = Arc::new(Metrics::new()?);
    let state = IntakeState::from_config(&config, metrics)?;
    let app = create_router(state);

    signalhook::core::serve(config.server.addr(), app).await?;
    info!("Intake server stopped");
    Ok(())
}
