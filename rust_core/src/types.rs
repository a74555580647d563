//! Prediction records, analysis settings and verification outcomes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Averaging strategy used to derive the predicted odds
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisMode {
    /// Unweighted arithmetic mean
    #[default]
    Standard,
    /// Weighted mean, later coefficients weigh more (1 + 0.1·i)
    Advanced,
    /// Arithmetic mean, optionally scaled by the trend factor
    Pro,
}

impl AnalysisMode {
    pub const ALL: [AnalysisMode; 3] = [
        AnalysisMode::Standard,
        AnalysisMode::Advanced,
        AnalysisMode::Pro,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisMode::Standard => "standard",
            AnalysisMode::Advanced => "advanced",
            AnalysisMode::Pro => "pro",
        }
    }
}

impl fmt::Display for AnalysisMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AnalysisMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "standard" => Ok(AnalysisMode::Standard),
            "advanced" => Ok(AnalysisMode::Advanced),
            "pro" => Ok(AnalysisMode::Pro),
            other => Err(format!("unknown analysis mode: {}", other)),
        }
    }
}

/// Per-request analysis options
///
/// Every field is optional on the wire; a missing settings object behaves
/// like `AnalysisSettings::default()` (standard mode, no extremes exclusion,
/// no trend analysis, configured thresholds).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnalysisSettings {
    pub analysis_mode: AnalysisMode,
    /// Drop the single lowest and highest coefficient before averaging
    pub exclude_extremes: bool,
    /// Scale the pro-mode average by the first/second half trend
    pub trend_analysis: bool,
    /// Override of the configured minimum average odds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_odds: Option<f64>,
    /// Override of the configured minimum main probability (percent)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_probability: Option<f64>,
}

impl AnalysisSettings {
    pub fn with_mode(analysis_mode: AnalysisMode) -> Self {
        Self {
            analysis_mode,
            ..Self::default()
        }
    }
}

/// Verification state of a prediction
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PredictionStatus {
    #[default]
    Pending,
    Success,
    Failed,
}

impl PredictionStatus {
    /// Success and failed are final; nothing moves a record out of them
    pub fn is_terminal(&self) -> bool {
        !matches!(self, PredictionStatus::Pending)
    }
}

impl fmt::Display for PredictionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PredictionStatus::Pending => "pending",
            PredictionStatus::Success => "success",
            PredictionStatus::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// Output of the prediction engine, before it becomes a history record
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionResult {
    /// Predicted odds threshold, two decimals
    pub average_odds: f64,
    /// Implied probability (percent) of each coefficient in `original_odds`
    pub probabilities: Vec<f64>,
    /// Coefficients the prediction was computed from
    pub original_odds: Vec<f64>,
    pub analysis_mode: AnalysisMode,
    pub meets_filters: bool,
    pub is_safe_prediction: bool,
}

impl PredictionResult {
    /// Probability of the first coefficient, used for gating and bucketing
    pub fn main_probability(&self) -> f64 {
        self.probabilities.first().copied().unwrap_or(0.0)
    }
}

/// A prediction stored in history
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionRecord {
    pub id: i64,
    pub created_at: DateTime<Utc>,
    pub average_odds: f64,
    pub probabilities: Vec<f64>,
    pub original_odds: Vec<f64>,
    /// Caller input exactly as received
    pub raw_coefficients: Vec<f64>,
    pub analysis_mode: AnalysisMode,
    pub meets_filters: bool,
    pub is_safe_prediction: bool,
    pub status: PredictionStatus,
    /// Mirror of `status`, kept for clients that read the older field name
    pub verification_status: PredictionStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verified_round: Option<u32>,
}

impl PredictionRecord {
    pub fn new(
        id: i64,
        created_at: DateTime<Utc>,
        result: PredictionResult,
        raw_coefficients: Vec<f64>,
    ) -> Self {
        Self {
            id,
            created_at,
            average_odds: result.average_odds,
            probabilities: result.probabilities,
            original_odds: result.original_odds,
            raw_coefficients,
            analysis_mode: result.analysis_mode,
            meets_filters: result.meets_filters,
            is_safe_prediction: result.is_safe_prediction,
            status: PredictionStatus::Pending,
            verification_status: PredictionStatus::Pending,
            verified_round: None,
        }
    }

    pub fn main_probability(&self) -> f64 {
        self.probabilities.first().copied().unwrap_or(0.0)
    }

    pub fn is_pending(&self) -> bool {
        self.status == PredictionStatus::Pending
    }

    /// Terminal write. Returns false (and leaves the record untouched) when
    /// the record is already resolved or `status` is not terminal.
    pub(crate) fn resolve(&mut self, status: PredictionStatus, round: u32) -> bool {
        if !self.is_pending() || !status.is_terminal() {
            return false;
        }
        self.status = status;
        self.verification_status = status;
        self.verified_round = Some(round);
        true
    }
}

/// Result of a single verification step
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationOutcome {
    pub verified: bool,
    pub status: PredictionStatus,
    /// Round at which the prediction resolved
    #[serde(skip_serializing_if = "Option::is_none")]
    pub round: Option<u32>,
    /// Round the caller should submit next while still pending
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_round: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Record counts per verification status
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusCounts {
    pub total: usize,
    pub success: usize,
    pub failed: usize,
    pub pending: usize,
}

impl StatusCounts {
    pub fn record(&mut self, status: PredictionStatus) {
        self.total += 1;
        match status {
            PredictionStatus::Pending => self.pending += 1,
            PredictionStatus::Success => self.success += 1,
            PredictionStatus::Failed => self.failed += 1,
        }
    }
}
