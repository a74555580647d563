//! Prediction thresholds and retention settings
//!
//! Loaded from environment variables with the defaults below. Invalid values
//! are rejected at startup instead of silently falling back.

use crate::types::AnalysisMode;
use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::env;
use tracing::info;

/// Minimum predicted average odds accepted by the quality gate
pub const DEFAULT_MIN_ODDS: f64 = 1.50;

/// Minimum main probability (percent) accepted by the quality gate
pub const DEFAULT_MIN_PROBABILITY: f64 = 70.0;

/// Main probability (percent) at or above which a prediction is "safe"
pub const DEFAULT_SAFE_PROBABILITY: f64 = 90.0;

/// Rounds a pending prediction may wait before it fails
pub const DEFAULT_MAX_VERIFICATION_ROUNDS: u32 = 5;

/// Valid coefficients required before a prediction can be made
pub const DEFAULT_REQUIRED_COEFFICIENTS: usize = 5;

/// Number of most recent predictions kept in history
pub const DEFAULT_HISTORY_CAPACITY: usize = 50;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictorConfig {
    pub min_odds: f64,
    pub min_probability: f64,
    pub safe_probability: f64,
    pub max_verification_rounds: u32,
    pub required_coefficients: usize,
    pub history_capacity: usize,
    /// When false, predictions that miss the thresholds are still stored,
    /// flagged with `meetsFilters = false`
    pub quality_gate_enabled: bool,
}

impl Default for PredictorConfig {
    fn default() -> Self {
        Self {
            min_odds: DEFAULT_MIN_ODDS,
            min_probability: DEFAULT_MIN_PROBABILITY,
            safe_probability: DEFAULT_SAFE_PROBABILITY,
            max_verification_rounds: DEFAULT_MAX_VERIFICATION_ROUNDS,
            required_coefficients: DEFAULT_REQUIRED_COEFFICIENTS,
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            quality_gate_enabled: true,
        }
    }
}

impl PredictorConfig {
    /// Load configuration from environment variables with defaults
    pub fn from_env() -> Result<Self> {
        let config = Self {
            min_odds: parse_f64("MIN_ODDS", DEFAULT_MIN_ODDS)?,
            min_probability: parse_f64("MIN_PROBABILITY", DEFAULT_MIN_PROBABILITY)?,
            safe_probability: parse_f64("SAFE_PROBABILITY", DEFAULT_SAFE_PROBABILITY)?,
            max_verification_rounds: parse_u32(
                "MAX_VERIFICATION_ROUNDS",
                DEFAULT_MAX_VERIFICATION_ROUNDS,
            )?,
            required_coefficients: parse_usize(
                "REQUIRED_COEFFICIENTS",
                DEFAULT_REQUIRED_COEFFICIENTS,
            )?,
            history_capacity: parse_usize("HISTORY_CAPACITY", DEFAULT_HISTORY_CAPACITY)?,
            quality_gate_enabled: parse_bool("QUALITY_GATE_ENABLED", true)?,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.min_odds.is_finite() && self.min_odds >= 1.0) {
            return Err(anyhow!("MIN_ODDS must be >= 1.0"));
        }
        if !(0.0..=100.0).contains(&self.min_probability) {
            return Err(anyhow!("MIN_PROBABILITY must be between 0 and 100"));
        }
        if !(0.0..=100.0).contains(&self.safe_probability) {
            return Err(anyhow!("SAFE_PROBABILITY must be between 0 and 100"));
        }
        if self.max_verification_rounds == 0 {
            return Err(anyhow!("MAX_VERIFICATION_ROUNDS must be > 0"));
        }
        if self.required_coefficients == 0 {
            return Err(anyhow!("REQUIRED_COEFFICIENTS must be > 0"));
        }
        if self.history_capacity == 0 {
            return Err(anyhow!("HISTORY_CAPACITY must be > 0"));
        }
        Ok(())
    }

    /// Log current configuration (useful at startup)
    pub fn log_config(&self) {
        info!("PredictorConfig loaded:");
        info!("  min_odds: {:.2}", self.min_odds);
        info!("  min_probability: {:.1}%", self.min_probability);
        info!("  safe_probability: {:.1}%", self.safe_probability);
        info!("  max_verification_rounds: {}", self.max_verification_rounds);
        info!("  required_coefficients: {}", self.required_coefficients);
        info!("  history_capacity: {}", self.history_capacity);
        info!("  quality_gate_enabled: {}", self.quality_gate_enabled);
    }
}

/// Snapshot returned by the config query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigSnapshot {
    #[serde(flatten)]
    pub thresholds: PredictorConfig,
    pub default_mode: AnalysisMode,
    pub analysis_modes: Vec<AnalysisMode>,
}

impl From<&PredictorConfig> for ConfigSnapshot {
    fn from(config: &PredictorConfig) -> Self {
        Self {
            thresholds: config.clone(),
            default_mode: AnalysisMode::default(),
            analysis_modes: AnalysisMode::ALL.to_vec(),
        }
    }
}

/// Parse environment variable as f64 with default fallback
pub fn parse_f64(var_name: &str, default: f64) -> Result<f64> {
    match env::var(var_name) {
        Ok(val) => val
            .trim()
            .parse()
            .map_err(|_| anyhow!("{} must be a valid f64", var_name)),
        Err(_) => Ok(default),
    }
}

/// Parse environment variable as u32 with default fallback
pub fn parse_u32(var_name: &str, default: u32) -> Result<u32> {
    match env::var(var_name) {
        Ok(val) => val
            .trim()
            .parse()
            .map_err(|_| anyhow!("{} must be a valid u32", var_name)),
        Err(_) => Ok(default),
    }
}

/// Parse environment variable as u64 with default fallback
pub fn parse_u64(var_name: &str, default: u64) -> Result<u64> {
    match env::var(var_name) {
        Ok(val) => val
            .trim()
            .parse()
            .map_err(|_| anyhow!("{} must be a valid u64", var_name)),
        Err(_) => Ok(default),
    }
}

/// Parse environment variable as usize with default fallback
pub fn parse_usize(var_name: &str, default: usize) -> Result<usize> {
    match env::var(var_name) {
        Ok(val) => val
            .trim()
            .parse()
            .map_err(|_| anyhow!("{} must be a valid usize", var_name)),
        Err(_) => Ok(default),
    }
}

/// Parse environment variable as bool ("true"/"false"/"1"/"0") with default fallback
pub fn parse_bool(var_name: &str, default: bool) -> Result<bool> {
    match env::var(var_name) {
        Ok(val) => match val.trim().to_lowercase().as_str() {
            "true" | "1" | "yes" => Ok(true),
            "false" | "0" | "no" => Ok(false),
            _ => Err(anyhow!("{} must be true or false", var_name)),
        },
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Tests avoid setting environment variables; parallel tests share the process env.

    #[test]
    fn test_default_config() {
        let config = PredictorConfig::default();
        assert_eq!(config.min_odds, 1.50);
        assert_eq!(config.min_probability, 70.0);
        assert_eq!(config.safe_probability, 90.0);
        assert_eq!(config.max_verification_rounds, 5);
        assert_eq!(config.required_coefficients, 5);
        assert_eq!(config.history_capacity, 50);
        assert!(config.quality_gate_enabled);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = PredictorConfig::default();
        config.history_capacity = 0;
        assert!(config.validate().is_err());

        let mut config = PredictorConfig::default();
        config.min_probability = 120.0;
        assert!(config.validate().is_err());

        let mut config = PredictorConfig::default();
        config.min_odds = f64::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_parse_helpers_fall_back_to_default() {
        assert_eq!(parse_f64("NON_EXISTENT_VAR_PREDICTOR_F64", 42.5).unwrap(), 42.5);
        assert_eq!(parse_u32("NON_EXISTENT_VAR_PREDICTOR_U32", 7).unwrap(), 7);
        assert_eq!(parse_usize("NON_EXISTENT_VAR_PREDICTOR_USIZE", 9).unwrap(), 9);
        assert!(parse_bool("NON_EXISTENT_VAR_PREDICTOR_BOOL", true).unwrap());
    }

    #[test]
    fn test_snapshot_flattens_thresholds() {
        let snapshot = ConfigSnapshot::from(&PredictorConfig::default());
        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["minOdds"], 1.5);
        assert_eq!(json["maxVerificationRounds"], 5);
        assert_eq!(json["defaultMode"], "standard");
        assert_eq!(json["analysisModes"].as_array().unwrap().len(), 3);
    }
}
