//! Prediction Service Library
//!
//! Exposes the round monitor and its configuration for testing purposes.

pub mod config;
pub mod monitor;
pub mod tracker;

pub use config::ServiceConfig;
pub use monitor::{PredictionMonitor, RoundOutcome, ServiceReport};
pub use tracker::{PendingPrediction, RoundTracker};
