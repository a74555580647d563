//! Prediction engine
//!
//! Turns a raw coefficient array into a predicted odds threshold:
//! - Normalization (valid values, optional extremes exclusion)
//! - Averaging by analysis mode (standard / advanced / pro)
//! - Implied probabilities per coefficient
//! - Quality gate and safe-prediction flag

pub mod engine;
pub mod normalizer;
pub mod trend;

pub use engine::{average_odds, PredictionEngine};
pub use normalizer::{normalize, valid_coefficients};
pub use trend::trend_factor;
