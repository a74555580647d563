//! Prediction service: single owner of the prediction history.
//!
//! Exposes the logical operations callers use (create, verify, history,
//! stats, analysis, config). The history sits behind one `RwLock`; the two
//! mutating operations (append-with-trim and verification) take the write
//! lock for their whole read-modify-write.

use crate::analytics::{self, HistoryAnalysis};
use crate::config::{ConfigSnapshot, PredictorConfig};
use crate::error::PredictionError;
use crate::history::PredictionHistory;
use crate::prediction::PredictionEngine;
use crate::types::{
    AnalysisSettings, PredictionRecord, PredictionStatus, StatusCounts, VerificationOutcome,
};
use crate::utils::{percentage, round1};
use crate::verification;
use chrono::Utc;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Verification result together with the updated record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationReport {
    pub result: VerificationOutcome,
    pub prediction: PredictionRecord,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryReport {
    pub history: Vec<PredictionRecord>,
    pub stats: StatusCounts,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryStats {
    pub total_predictions: usize,
    pub success_count: usize,
    pub failed_count: usize,
    pub pending_count: usize,
    /// Successes over all predictions, percent with one decimal
    pub prediction_accuracy: f64,
    pub safe_predictions: usize,
    /// Successes over safe predictions, percent with one decimal
    pub safe_prediction_accuracy: f64,
}

pub struct PredictionService {
    engine: PredictionEngine,
    history: RwLock<PredictionHistory>,
}

impl PredictionService {
    pub fn new(config: PredictorConfig) -> Self {
        let history = PredictionHistory::new(config.history_capacity);
        Self {
            engine: PredictionEngine::new(config),
            history: RwLock::new(history),
        }
    }

    pub fn config(&self) -> &PredictorConfig {
        self.engine.config()
    }

    /// Run the engine and store the accepted prediction at the head of history
    pub fn create_prediction(
        &self,
        coefficients: &[f64],
        settings: Option<AnalysisSettings>,
    ) -> Result<PredictionRecord, PredictionError> {
        if coefficients.is_empty() {
            return Err(PredictionError::MissingCoefficients);
        }

        let settings = settings.unwrap_or_default();
        let result = self.engine.predict(coefficients, &settings)?;

        let now = Utc::now();
        let mut history = self.history.write();
        let id = history.next_id(now.timestamp_millis());
        let record = PredictionRecord::new(id, now, result, coefficients.to_vec());
        let evicted = history.append(record.clone());

        info!(
            "Prediction {} created: mode={} avg={:.2} prob={:.2}% safe={} (history {}, evicted {})",
            record.id,
            record.analysis_mode,
            record.average_odds,
            record.main_probability(),
            record.is_safe_prediction,
            history.len(),
            evicted
        );
        Ok(record)
    }

    /// Apply one observed round to a stored prediction
    pub fn verify_prediction(
        &self,
        prediction_id: i64,
        observed_coefficient: f64,
        current_round: u32,
    ) -> Result<VerificationReport, PredictionError> {
        let max_rounds = self.config().max_verification_rounds;
        let mut history = self.history.write();
        let record = history
            .find_by_id_mut(prediction_id)
            .ok_or(PredictionError::RecordNotFound(prediction_id))?;

        let was_pending = record.is_pending();
        let result = verification::advance(record, observed_coefficient, current_round, max_rounds);

        if was_pending && result.status.is_terminal() {
            info!(
                "Prediction {} resolved {} at round {} (observed {:.2}, predicted {:.2})",
                prediction_id, result.status, current_round, observed_coefficient, record.average_odds
            );
        } else {
            debug!(
                "Prediction {} round {}: {}",
                prediction_id, current_round, result.status
            );
        }

        Ok(VerificationReport {
            result,
            prediction: record.clone(),
        })
    }

    pub fn get_prediction(&self, prediction_id: i64) -> Option<PredictionRecord> {
        self.history.read().find_by_id(prediction_id).cloned()
    }

    pub fn get_history(&self) -> HistoryReport {
        let history = self.history.read();
        HistoryReport {
            history: history.to_vec(),
            stats: history.status_counts(),
        }
    }

    pub fn get_stats(&self) -> HistoryStats {
        let history = self.history.read();
        let counts = history.status_counts();

        let (safe_total, safe_success) = history
            .iter()
            .filter(|r| r.is_safe_prediction)
            .fold((0, 0), |(total, success), r| {
                let won = usize::from(r.status == PredictionStatus::Success);
                (total + 1, success + won)
            });

        HistoryStats {
            total_predictions: counts.total,
            success_count: counts.success,
            failed_count: counts.failed,
            pending_count: counts.pending,
            prediction_accuracy: round1(percentage(counts.success, counts.total)),
            safe_predictions: safe_total,
            safe_prediction_accuracy: round1(percentage(safe_success, safe_total)),
        }
    }

    pub fn get_analysis(&self) -> HistoryAnalysis {
        analytics::analyze(&self.history.read())
    }

    pub fn get_config(&self) -> ConfigSnapshot {
        ConfigSnapshot::from(self.config())
    }
}

impl Default for PredictionService {
    fn default() -> Self {
        Self::new(PredictorConfig::default())
    }
}
