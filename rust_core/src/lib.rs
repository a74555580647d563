//! Predictor Core - odds threshold prediction and verification.
//!
//! This module provides:
//! - Coefficient normalization and extremes exclusion
//! - Averaging by analysis mode (standard, advanced weighted, pro with trend)
//! - Implied probabilities, quality gate and safe-prediction flag
//! - Round-by-round verification of pending predictions
//! - Bounded prediction history and success analytics
//! - Upstream coefficient source client

mod types;

pub mod analytics;
pub mod clients;
pub mod config;
pub mod error;
pub mod history;
pub mod prediction;
pub mod service;
pub mod utils;
pub mod verification;

pub use analytics::HistoryAnalysis;
pub use config::{ConfigSnapshot, PredictorConfig};
pub use error::{ErrorResponse, PredictionError};
pub use history::PredictionHistory;
pub use prediction::PredictionEngine;
pub use service::{HistoryReport, HistoryStats, PredictionService, VerificationReport};
pub use types::*;
