use super::normalizer::normalize;
use super::trend::trend_factor;
use crate::config::PredictorConfig;
use crate::error::PredictionError;
use crate::types::{AnalysisMode, AnalysisSettings, PredictionResult};
use crate::utils::{implied_probability, round2};
use tracing::debug;

/// Unrounded average for the selected analysis mode.
///
/// `odds` must be non-empty; callers pass the output of `normalize`.
pub fn average_odds(odds: &[f64], settings: &AnalysisSettings) -> f64 {
    let mean = odds.iter().sum::<f64>() / odds.len() as f64;

    match settings.analysis_mode {
        AnalysisMode::Standard => mean,
        AnalysisMode::Advanced => {
            let (weighted_sum, weight_sum) = odds
                .iter()
                .enumerate()
                .fold((0.0, 0.0), |(sum, weights), (i, odd)| {
                    let weight = 1.0 + i as f64 * 0.1;
                    (sum + odd * weight, weights + weight)
                });
            weighted_sum / weight_sum
        }
        AnalysisMode::Pro => {
            if settings.trend_analysis {
                mean * trend_factor(odds)
            } else {
                mean
            }
        }
    }
}

/// Stateless prediction engine parameterized by the configured thresholds
#[derive(Debug, Clone)]
pub struct PredictionEngine {
    config: PredictorConfig,
}

impl PredictionEngine {
    pub fn new(config: PredictorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PredictorConfig {
        &self.config
    }

    /// Compute a prediction from raw coefficients.
    ///
    /// Fails with `InsufficientData` when too few valid coefficients remain
    /// and with `FilteredPrediction` when the quality gate rejects the result
    /// or the average is not a usable odds value: non-finite, <= 1, or below
    /// the smallest coefficient it was computed from.
    pub fn predict(
        &self,
        coefficients: &[f64],
        settings: &AnalysisSettings,
    ) -> Result<PredictionResult, PredictionError> {
        let odds = normalize(
            coefficients,
            self.config.required_coefficients,
            settings.exclude_extremes,
        )?;

        let average = round2(average_odds(&odds, settings));
        let probabilities: Vec<f64> = odds.iter().map(|odd| implied_probability(*odd)).collect();
        let main_probability = probabilities[0];

        let min_odds = settings.min_odds.unwrap_or(self.config.min_odds);
        let min_probability = settings
            .min_probability
            .unwrap_or(self.config.min_probability);
        let meets_filters = average >= min_odds && main_probability >= min_probability;
        let lowest = odds.iter().copied().fold(f64::INFINITY, f64::min);
        let degenerate = !average.is_finite() || average <= 1.0 || average < round2(lowest);

        if degenerate || (self.config.quality_gate_enabled && !meets_filters) {
            debug!(
                "Prediction filtered: mode={} avg={:.2} (min {:.2}) prob={:.2}% (min {:.2}%)",
                settings.analysis_mode, average, min_odds, main_probability, min_probability
            );
            return Err(PredictionError::FilteredPrediction {
                average_odds: average,
                main_probability,
                min_odds,
                min_probability,
            });
        }

        Ok(PredictionResult {
            average_odds: average,
            probabilities,
            original_odds: odds,
            analysis_mode: settings.analysis_mode,
            meets_filters,
            is_safe_prediction: main_probability >= self.config.safe_probability,
        })
    }
}

impl Default for PredictionEngine {
    fn default() -> Self {
        Self::new(PredictorConfig::default())
    }
}
