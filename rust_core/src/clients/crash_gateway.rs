//! Crash game state gateway client
//!
//! Reads the stop coefficient of the last finished round from the game
//! state endpoint. Authentication is by `customer-id` / `session-id`
//! headers.

use super::source::CoefficientSource;
use crate::config::parse_u64;
use crate::utils::round2;
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::env;
use std::time::Duration;
use tracing::debug;

/// A round that stopped at exactly 1.00 is reported as this value
pub const MIN_REPORTED_COEFFICIENT: f64 = 1.01;

#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub state_url: String,
    pub customer_id: Option<String>,
    pub session_id: Option<String>,
    pub timeout: Duration,
}

impl GatewayConfig {
    pub fn from_env() -> Result<Self> {
        let state_url =
            env::var("GATEWAY_STATE_URL").map_err(|_| anyhow!("GATEWAY_STATE_URL must be set"))?;
        let timeout_secs = parse_u64("GATEWAY_TIMEOUT_SECS", 10)?;
        if timeout_secs == 0 {
            return Err(anyhow!("GATEWAY_TIMEOUT_SECS must be positive"));
        }

        Ok(Self {
            state_url,
            customer_id: env::var("GATEWAY_CUSTOMER_ID").ok(),
            session_id: env::var("GATEWAY_SESSION_ID").ok(),
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}

/// Subset of the game state payload we read
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayState {
    #[serde(default)]
    pub stop_coefficients: Vec<f64>,
}

impl GatewayState {
    /// Most recent stop coefficient, adjusted and rounded
    pub fn latest_coefficient(&self) -> Option<f64> {
        self.stop_coefficients.first().copied().map(adjust_coefficient)
    }
}

/// Map an exact 1.00 stop to 1.01 and round to two decimals
pub fn adjust_coefficient(raw: f64) -> f64 {
    let adjusted = if raw == 1.0 { MIN_REPORTED_COEFFICIENT } else { raw };
    round2(adjusted)
}

pub struct CrashGatewayClient {
    client: Client,
    config: GatewayConfig,
}

impl CrashGatewayClient {
    pub fn new(config: GatewayConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent("CoefficientPredictor/1.0")
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client, config })
    }

    pub fn from_env() -> Result<Self> {
        Self::new(GatewayConfig::from_env()?)
    }

    /// Fetch and decode the current game state
    pub async fn fetch_state(&self) -> Result<GatewayState> {
        let mut request = self
            .client
            .get(&self.config.state_url)
            .header("accept", "application/json");
        if let Some(customer_id) = &self.config.customer_id {
            request = request.header("customer-id", customer_id);
        }
        if let Some(session_id) = &self.config.session_id {
            request = request.header("session-id", session_id);
        }

        let response = request
            .send()
            .await
            .context("Failed to fetch game state")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow!("Gateway API error: {} - {}", status, body));
        }

        response
            .json::<GatewayState>()
            .await
            .context("Failed to parse game state")
    }
}

#[async_trait]
impl CoefficientSource for CrashGatewayClient {
    async fn latest_coefficient(&self) -> Result<Option<f64>> {
        let state = self.fetch_state().await?;
        let coefficient = state.latest_coefficient();
        debug!("Gateway latest coefficient: {:?}", coefficient);
        Ok(coefficient)
    }

    fn source_name(&self) -> &str {
        "crash_gateway"
    }
}
