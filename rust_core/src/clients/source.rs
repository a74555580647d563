//! Coefficient Source Trait
//!
//! Common interface for upstream providers of observed round coefficients.

use anyhow::Result;
use async_trait::async_trait;

#[async_trait]
pub trait CoefficientSource: Send + Sync {
    /// Coefficient of the most recently finished round, `None` when the
    /// upstream has not published one yet
    async fn latest_coefficient(&self) -> Result<Option<f64>>;

    /// Provider name for logging
    fn source_name(&self) -> &str;
}
