//! Integration tests for the round monitor
//!
//! A scripted coefficient source replaces the gateway, so these run without
//! network access.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use parking_lot::Mutex;
use prediction_service_rust::PredictionMonitor;
use predictor_core::clients::CoefficientSource;
use predictor_core::{AnalysisSettings, PredictionService, PredictionStatus, PredictorConfig};
use std::collections::VecDeque;
use std::sync::Arc;

/// Replays a fixed sequence of poll results
struct ScriptedSource {
    polls: Mutex<VecDeque<Result<Option<f64>, String>>>,
}

impl ScriptedSource {
    fn new(values: &[f64]) -> Self {
        Self {
            polls: Mutex::new(values.iter().map(|v| Ok(Some(*v))).collect()),
        }
    }

    fn with_polls(polls: Vec<Result<Option<f64>, String>>) -> Self {
        Self {
            polls: Mutex::new(polls.into()),
        }
    }
}

#[async_trait]
impl CoefficientSource for ScriptedSource {
    async fn latest_coefficient(&self) -> Result<Option<f64>> {
        match self.polls.lock().pop_front() {
            Some(Ok(value)) => Ok(value),
            Some(Err(message)) => Err(anyhow!(message)),
            None => Ok(None),
        }
    }

    fn source_name(&self) -> &str {
        "scripted"
    }
}

fn ungated_service(max_rounds: u32) -> Arc<PredictionService> {
    Arc::new(PredictionService::new(PredictorConfig {
        quality_gate_enabled: false,
        max_verification_rounds: max_rounds,
        ..PredictorConfig::default()
    }))
}

async fn drain<S: CoefficientSource>(monitor: &mut PredictionMonitor<S>, polls: usize) {
    for _ in 0..polls {
        let _ = monitor.poll_once().await;
    }
}

#[tokio::test]
async fn test_prediction_created_once_window_is_full() {
    let source = ScriptedSource::new(&[1.8, 2.1, 1.9, 2.5]);
    let mut monitor =
        PredictionMonitor::new(source, ungated_service(5), AnalysisSettings::default(), 5);
    drain(&mut monitor, 4).await;
    assert!(monitor.service().get_history().history.is_empty());

    let outcome = monitor.handle_round(1.6);
    let record = outcome.created.expect("prediction should be created");
    assert_eq!(record.average_odds, 1.98);
    assert_eq!(record.probabilities[0], 55.56);
    assert_eq!(monitor.tracker().pending().unwrap().id, record.id);
}

#[tokio::test]
async fn test_prediction_confirmed_on_second_round() {
    let source = ScriptedSource::new(&[1.8, 2.1, 1.9, 2.5, 1.6, 1.2, 2.4]);
    let mut monitor =
        PredictionMonitor::new(source, ungated_service(5), AnalysisSettings::default(), 5);

    drain(&mut monitor, 5).await;
    let first_id = monitor.tracker().pending().unwrap().id;

    let round_one = monitor.poll_once().await.unwrap().unwrap();
    let verification = round_one.verification.unwrap();
    assert_eq!(verification.status, PredictionStatus::Pending);
    assert_eq!(verification.next_round, Some(2));
    assert!(round_one.created.is_none());

    let round_two = monitor.poll_once().await.unwrap().unwrap();
    let verification = round_two.verification.unwrap();
    assert_eq!(verification.status, PredictionStatus::Success);
    assert_eq!(verification.round, Some(2));

    // The next prediction starts from the slid window right away
    let next = round_two.created.expect("next prediction");
    assert!(next.id > first_id);
    assert_eq!(next.raw_coefficients, vec![1.9, 2.5, 1.6, 1.2, 2.4]);

    let stored = monitor.service().get_prediction(first_id).unwrap();
    assert_eq!(stored.status, PredictionStatus::Success);
    assert_eq!(stored.verified_round, Some(2));
}

#[tokio::test]
async fn test_prediction_fails_after_max_rounds() {
    let source = ScriptedSource::new(&[1.8, 2.1, 1.9, 2.5, 1.6, 1.1, 1.2, 1.3]);
    let mut monitor =
        PredictionMonitor::new(source, ungated_service(3), AnalysisSettings::default(), 5);

    drain(&mut monitor, 5).await;
    let first_id = monitor.tracker().pending().unwrap().id;
    drain(&mut monitor, 3).await;

    let stored = monitor.service().get_prediction(first_id).unwrap();
    assert_eq!(stored.status, PredictionStatus::Failed);
    assert_eq!(stored.verified_round, Some(3));

    let stats = monitor.service().get_stats();
    assert_eq!(stats.failed_count, 1);
    assert_eq!(stats.pending_count, 1);
}

#[tokio::test]
async fn test_repeated_coefficient_is_ignored() {
    let source = ScriptedSource::new(&[1.8, 1.8, 2.1]);
    let mut monitor =
        PredictionMonitor::new(source, ungated_service(5), AnalysisSettings::default(), 5);

    assert!(monitor.poll_once().await.unwrap().is_some());
    assert!(monitor.poll_once().await.unwrap().is_none());
    assert!(monitor.poll_once().await.unwrap().is_some());
    assert_eq!(monitor.tracker().rounds_observed(), 2);
}

#[tokio::test]
async fn test_source_errors_and_gaps_do_not_count_as_rounds() {
    let source = ScriptedSource::with_polls(vec![
        Ok(None),
        Err("gateway timeout".to_string()),
        Ok(Some(2.0)),
    ]);
    let mut monitor =
        PredictionMonitor::new(source, ungated_service(5), AnalysisSettings::default(), 5);

    assert!(monitor.poll_once().await.unwrap().is_none());
    assert!(monitor.poll_once().await.is_err());
    assert!(monitor.poll_once().await.unwrap().is_some());
    assert_eq!(monitor.tracker().rounds_observed(), 1);
}

#[tokio::test]
async fn test_filtered_predictions_are_not_stored() {
    // Default gate: 55.56% main probability is below 70%
    let service = Arc::new(PredictionService::default());
    let source = ScriptedSource::new(&[1.8, 2.1, 1.9, 2.5, 1.6]);
    let mut monitor = PredictionMonitor::new(source, service, AnalysisSettings::default(), 5);

    drain(&mut monitor, 4).await;
    let outcome = monitor.poll_once().await.unwrap().unwrap();
    assert!(outcome.created.is_none());
    assert_eq!(outcome.rejected.unwrap().code(), "FILTERED_PREDICTION");
    assert!(monitor.tracker().pending().is_none());
    assert_eq!(monitor.service().get_stats().total_predictions, 0);
}

#[tokio::test]
async fn test_report_serializes() {
    let source = ScriptedSource::new(&[]);
    let monitor =
        PredictionMonitor::new(source, ungated_service(5), AnalysisSettings::default(), 5);
    let json = serde_json::to_value(monitor.report()).unwrap();
    assert_eq!(json["roundsObserved"], 0);
    assert_eq!(json["stats"]["totalPredictions"], 0);
    assert_eq!(json["analysis"]["hasData"], false);
}
