//! Prediction error taxonomy.
//!
//! All variants are business-rule rejections, recoverable by the caller.
//! Each carries a machine-readable code and an HTTP-equivalent status so a
//! transport layer can frame it without inspecting the message.

use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PredictionError {
    #[error("Coefficients are required")]
    MissingCoefficients,

    #[error("At least {required} valid coefficients are required (got {found})")]
    InsufficientData { required: usize, found: usize },

    #[error(
        "Prediction filtered: average odds {average_odds:.2} (min {min_odds:.2}), \
         main probability {main_probability:.2}% (min {min_probability:.2}%)"
    )]
    FilteredPrediction {
        average_odds: f64,
        main_probability: f64,
        min_odds: f64,
        min_probability: f64,
    },

    #[error("Prediction {0} not found")]
    RecordNotFound(i64),
}

impl PredictionError {
    pub fn code(&self) -> &'static str {
        match self {
            PredictionError::MissingCoefficients => "MISSING_COEFFICIENTS",
            PredictionError::InsufficientData { .. } => "INSUFFICIENT_DATA",
            PredictionError::FilteredPrediction { .. } => "FILTERED_PREDICTION",
            PredictionError::RecordNotFound(_) => "RECORD_NOT_FOUND",
        }
    }

    pub fn status_code(&self) -> u16 {
        match self {
            PredictionError::RecordNotFound(_) => 404,
            _ => 400,
        }
    }

    /// Diagnostic values attached to the error response
    pub fn details(&self) -> Option<serde_json::Value> {
        match self {
            PredictionError::InsufficientData { required, found } => Some(json!({
                "required": required,
                "found": found,
            })),
            PredictionError::FilteredPrediction {
                average_odds,
                main_probability,
                min_odds,
                min_probability,
            } => Some(json!({
                "averageOdds": average_odds,
                "mainProbability": main_probability,
                "minOdds": min_odds,
                "minProbability": min_probability,
            })),
            PredictionError::RecordNotFound(id) => Some(json!({ "predictionId": id })),
            PredictionError::MissingCoefficients => None,
        }
    }
}

/// Structured error body for callers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub success: bool,
    pub code: String,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl From<&PredictionError> for ErrorResponse {
    fn from(err: &PredictionError) -> Self {
        Self {
            success: false,
            code: err.code().to_string(),
            error: err.to_string(),
            details: err.details(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_and_status() {
        let filtered = PredictionError::FilteredPrediction {
            average_odds: 1.3,
            main_probability: 60.0,
            min_odds: 1.5,
            min_probability: 70.0,
        };
        assert_eq!(filtered.code(), "FILTERED_PREDICTION");
        assert_eq!(filtered.status_code(), 400);
        assert_eq!(PredictionError::RecordNotFound(3).status_code(), 404);
        assert_eq!(
            PredictionError::InsufficientData { required: 5, found: 2 }.code(),
            "INSUFFICIENT_DATA"
        );
    }

    #[test]
    fn test_error_response_carries_diagnostics() {
        let err = PredictionError::FilteredPrediction {
            average_odds: 1.3,
            main_probability: 60.0,
            min_odds: 1.5,
            min_probability: 70.0,
        };
        let response = ErrorResponse::from(&err);
        assert!(!response.success);
        assert_eq!(response.code, "FILTERED_PREDICTION");
        let details = response.details.unwrap();
        assert_eq!(details["averageOdds"], 1.3);
        assert_eq!(details["minProbability"], 70.0);
    }

    #[test]
    fn test_missing_coefficients_has_no_details() {
        let response = ErrorResponse::from(&PredictionError::MissingCoefficients);
        assert!(response.details.is_none());
        assert_eq!(response.error, "Coefficients are required");
    }
}
