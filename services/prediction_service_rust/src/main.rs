//! Prediction Service
//!
//! Watches finished rounds from the game state gateway, predicts the next
//! odds threshold from the recent rounds and verifies it over the following
//! rounds.

use anyhow::{Context, Result};
use dotenv::dotenv;
use prediction_service_rust::{PredictionMonitor, ServiceConfig};
use predictor_core::clients::CrashGatewayClient;
use predictor_core::PredictionService;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    info!("Starting Prediction Service...");

    let config = ServiceConfig::from_env().context("Invalid configuration")?;
    config.log_config();

    let client = CrashGatewayClient::from_env().context("Failed to initialize gateway client")?;
    let service = Arc::new(PredictionService::new(config.predictor.clone()));

    let mut monitor = PredictionMonitor::new(
        client,
        service,
        config.settings.clone(),
        config.window_size,
    );
    monitor
        .run(config.poll_interval, config.report_interval)
        .await
}
