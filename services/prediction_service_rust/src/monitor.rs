//! Round monitor
//!
//! Polls the coefficient source, turns every new stop coefficient into a
//! round, verifies the pending prediction against it and issues the next
//! prediction from the rolling window once the previous one has resolved.

use crate::tracker::RoundTracker;
use anyhow::Result;
use predictor_core::clients::CoefficientSource;
use predictor_core::{
    AnalysisSettings, HistoryAnalysis, HistoryStats, PredictionError, PredictionRecord,
    PredictionService, VerificationOutcome,
};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// What happened when one round was processed
#[derive(Debug, Clone, Default)]
pub struct RoundOutcome {
    pub coefficient: f64,
    pub verification: Option<VerificationOutcome>,
    pub created: Option<PredictionRecord>,
    pub rejected: Option<PredictionError>,
}

/// Periodic summary written to the log
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceReport {
    pub rounds_observed: u64,
    pub stats: HistoryStats,
    pub analysis: HistoryAnalysis,
}

pub struct PredictionMonitor<S: CoefficientSource> {
    source: S,
    service: Arc<PredictionService>,
    settings: AnalysisSettings,
    tracker: RoundTracker,
}

impl<S: CoefficientSource> PredictionMonitor<S> {
    pub fn new(
        source: S,
        service: Arc<PredictionService>,
        settings: AnalysisSettings,
        window_size: usize,
    ) -> Self {
        Self {
            source,
            service,
            settings,
            tracker: RoundTracker::new(window_size),
        }
    }

    pub fn service(&self) -> &Arc<PredictionService> {
        &self.service
    }

    pub fn tracker(&self) -> &RoundTracker {
        &self.tracker
    }

    /// Fetch once; `None` when the source has nothing new
    pub async fn poll_once(&mut self) -> Result<Option<RoundOutcome>> {
        let coefficient = match self.source.latest_coefficient().await? {
            Some(c) => c,
            None => return Ok(None),
        };
        if !self.tracker.is_new_round(coefficient) {
            return Ok(None);
        }
        Ok(Some(self.handle_round(coefficient)))
    }

    /// Verify the pending prediction against a finished round, then predict
    /// again when nothing is pending and the window is full
    pub fn handle_round(&mut self, coefficient: f64) -> RoundOutcome {
        let mut outcome = RoundOutcome {
            coefficient,
            ..RoundOutcome::default()
        };

        if let Some(pending) = self.tracker.pending() {
            match self
                .service
                .verify_prediction(pending.id, coefficient, pending.round)
            {
                Ok(report) => {
                    if report.result.status.is_terminal() {
                        self.tracker.clear_pending();
                    } else if let Some(next) = report.result.next_round {
                        self.tracker.set_round(next);
                    }
                    outcome.verification = Some(report.result);
                }
                Err(e) => {
                    // Evicted from history before resolving
                    warn!("Dropping pending prediction {}: {}", pending.id, e);
                    self.tracker.clear_pending();
                }
            }
        }

        self.tracker.push(coefficient);

        if self.tracker.pending().is_none() && self.tracker.is_full() {
            let window = self.tracker.window();
            match self
                .service
                .create_prediction(&window, Some(self.settings.clone()))
            {
                Ok(record) => {
                    self.tracker.set_pending(record.id);
                    outcome.created = Some(record);
                }
                Err(e) => {
                    debug!("No prediction this round [{}]: {}", e.code(), e);
                    outcome.rejected = Some(e);
                }
            }
        }

        outcome
    }

    pub fn report(&self) -> ServiceReport {
        ServiceReport {
            rounds_observed: self.tracker.rounds_observed(),
            stats: self.service.get_stats(),
            analysis: self.service.get_analysis(),
        }
    }

    /// Poll until Ctrl-C
    pub async fn run(&mut self, poll_interval: Duration, report_interval: Duration) -> Result<()> {
        info!(
            "Monitoring {} (poll every {:?}, report every {:?})",
            self.source.source_name(),
            poll_interval,
            report_interval
        );

        let mut poll_timer = tokio::time::interval(poll_interval);
        let mut report_timer = tokio::time::interval(report_interval);
        // First tick completes immediately
        report_timer.tick().await;

        let shutdown = tokio::signal::ctrl_c();
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = poll_timer.tick() => {
                    if let Err(e) = self.poll_once().await {
                        error!("Failed to poll {}: {:#}", self.source.source_name(), e);
                    }
                }
                _ = report_timer.tick() => {
                    match serde_json::to_string(&self.report()) {
                        Ok(json) => info!("Report: {}", json),
                        Err(e) => warn!("Failed to serialize report: {}", e),
                    }
                }
                _ = &mut shutdown => {
                    info!("Shutdown requested");
                    return Ok(());
                }
            }
        }
    }
}
