//! Configuration for the prediction service
//!
//! This module manages all runtime configuration:
//! - Prediction thresholds and history retention (see `PredictorConfig`)
//! - Analysis settings applied to every automatic prediction
//! - Rolling window size
//! - Polling and reporting intervals

use anyhow::{anyhow, Result};
use predictor_core::config::{parse_bool, parse_f64, parse_u64, parse_usize};
use predictor_core::{AnalysisMode, AnalysisSettings, PredictorConfig};
use std::env;
use std::time::Duration;
use tracing::info;

/// Default number of most recent rounds fed to the engine
pub const DEFAULT_WINDOW_SIZE: usize = 10;

/// Default polling interval in seconds
pub const DEFAULT_POLL_INTERVAL_SECS: f64 = 1.0;

/// Default interval between stats/analysis reports in seconds
pub const DEFAULT_REPORT_INTERVAL_SECS: u64 = 60;

#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub predictor: PredictorConfig,
    pub settings: AnalysisSettings,
    pub window_size: usize,
    pub poll_interval: Duration,
    pub report_interval: Duration,
}

impl ServiceConfig {
    pub fn from_env() -> Result<Self> {
        let predictor = PredictorConfig::from_env()?;

        let analysis_mode = match env::var("ANALYSIS_MODE") {
            Ok(val) => val.parse::<AnalysisMode>().map_err(|e| anyhow!(e))?,
            Err(_) => AnalysisMode::default(),
        };
        let settings = AnalysisSettings {
            analysis_mode,
            exclude_extremes: parse_bool("EXCLUDE_EXTREMES", false)?,
            trend_analysis: parse_bool("TREND_ANALYSIS", false)?,
            min_odds: None,
            min_probability: None,
        };

        let poll_interval_secs =
            parse_f64("POLL_INTERVAL_SECS", DEFAULT_POLL_INTERVAL_SECS)?.clamp(0.2, 60.0);

        let config = Self {
            predictor,
            settings,
            window_size: parse_usize("WINDOW_SIZE", DEFAULT_WINDOW_SIZE)?,
            poll_interval: Duration::from_secs_f64(poll_interval_secs),
            report_interval: Duration::from_secs(parse_u64(
                "REPORT_INTERVAL_SECS",
                DEFAULT_REPORT_INTERVAL_SECS,
            )?),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.window_size < self.predictor.required_coefficients {
            return Err(anyhow!(
                "WINDOW_SIZE ({}) must be >= REQUIRED_COEFFICIENTS ({})",
                self.window_size,
                self.predictor.required_coefficients
            ));
        }
        if self.report_interval.is_zero() {
            return Err(anyhow!("REPORT_INTERVAL_SECS must be > 0"));
        }
        Ok(())
    }

    pub fn log_config(&self) {
        self.predictor.log_config();
        info!("ServiceConfig loaded:");
        info!("  analysis_mode: {}", self.settings.analysis_mode);
        info!("  exclude_extremes: {}", self.settings.exclude_extremes);
        info!("  trend_analysis: {}", self.settings.trend_analysis);
        info!("  window_size: {}", self.window_size);
        info!("  poll_interval: {:?}", self.poll_interval);
        info!("  report_interval: {:?}", self.report_interval);
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            predictor: PredictorConfig::default(),
            settings: AnalysisSettings::default(),
            window_size: DEFAULT_WINDOW_SIZE,
            poll_interval: Duration::from_secs_f64(DEFAULT_POLL_INTERVAL_SECS),
            report_interval: Duration::from_secs(DEFAULT_REPORT_INTERVAL_SECS),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ServiceConfig::default();
        assert_eq!(config.window_size, 10);
        assert_eq!(config.settings.analysis_mode, AnalysisMode::Standard);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_window_smaller_than_required_is_rejected() {
        let config = ServiceConfig {
            window_size: 3,
            ..ServiceConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
