//! Bike price server - used-motorcycle resale price prediction
//!
//! Loads the exported regression model once at startup and serves the form
//! page, JSON prediction API and health endpoints. A missing or broken model
//! does not stop the server; it runs degraded and reports why.

use anyhow::Result;
use bike_price_server::{api, config::ServerConfig};
use pricing_lib::{InputValidator, ModelProvider, PricingMetrics, PricingService, StructuredLogger};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const SERVICE_NAME: &str = "bike-price-server";
const SERVICE_VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing with JSON output and env filter
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer().json())
        .init();

    info!("Starting bike-price-server");

    let config = ServerConfig::load()?;
    info!(model_path = %config.model_path, addr = %config.listen_addr(), "Server configured");

    let logger = StructuredLogger::new(SERVICE_NAME);
    let metrics = PricingMetrics::new();

    // Loaded once; never retried for the lifetime of the process
    let provider = ModelProvider::load(&config.model_path, config.model_checksum());
    match provider.load_error() {
        None => logger.log_model_loaded(provider.model_path()),
        Some(err) => logger.log_model_load_failed(provider.model_path(), err),
    }
    metrics.set_model_loaded(provider.is_loaded());
    logger.log_startup(SERVICE_VERSION, provider.model_path(), provider.is_loaded());

    let service = PricingService::new(
        InputValidator::new(),
        Arc::new(provider),
        metrics,
        logger.clone(),
    );
    let app_state = Arc::new(api::AppState::new(service, config.enable_cors));

    let addr = config.listen_addr();
    tokio::select! {
        result = api::serve(&addr, app_state) => result?,
        signal = tokio::signal::ctrl_c() => {
            signal?;
            logger.log_shutdown("SIGINT received");
            info!("Shutting down");
        }
    }

    Ok(())
}
