//! Verification state machine
//!
//! A pending prediction is checked once per observed round:
//! - observed coefficient >= predicted odds: success at this round
//! - otherwise, round >= max rounds: failed at this round
//! - otherwise: still pending, caller retries with the next round
//!
//! Success and failed are terminal. Verifying a resolved record reports its
//! stored outcome and never rewrites it.

use crate::types::{PredictionRecord, PredictionStatus, VerificationOutcome};
use tracing::debug;

/// Advance `record` by one observed round
pub fn advance(
    record: &mut PredictionRecord,
    observed_coefficient: f64,
    current_round: u32,
    max_rounds: u32,
) -> VerificationOutcome {
    if !record.is_pending() {
        debug!(
            "Prediction {} already {}, ignoring round {}",
            record.id, record.status, current_round
        );
        return terminal_outcome(record, max_rounds);
    }

    if observed_coefficient >= record.average_odds {
        record.resolve(PredictionStatus::Success, current_round);
        debug!(
            "Prediction {} confirmed at round {} ({:.2} >= {:.2})",
            record.id, current_round, observed_coefficient, record.average_odds
        );
        return VerificationOutcome {
            verified: true,
            status: PredictionStatus::Success,
            round: Some(current_round),
            next_round: None,
            message: None,
        };
    }

    if current_round >= max_rounds {
        record.resolve(PredictionStatus::Failed, current_round);
        debug!(
            "Prediction {} failed after {} rounds",
            record.id, current_round
        );
        return VerificationOutcome {
            verified: false,
            status: PredictionStatus::Failed,
            round: Some(current_round),
            next_round: None,
            message: Some(not_reached_message(max_rounds)),
        };
    }

    VerificationOutcome {
        verified: false,
        status: PredictionStatus::Pending,
        round: None,
        next_round: Some(current_round + 1),
        message: None,
    }
}

/// Outcome describing an already-resolved record
pub fn terminal_outcome(record: &PredictionRecord, max_rounds: u32) -> VerificationOutcome {
    let message = match record.status {
        PredictionStatus::Failed => Some(not_reached_message(max_rounds)),
        _ => None,
    };
    VerificationOutcome {
        verified: record.status == PredictionStatus::Success,
        status: record.status,
        round: record.verified_round,
        next_round: None,
        message,
    }
}

fn not_reached_message(max_rounds: u32) -> String {
    format!("Not reached within {} rounds", max_rounds)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AnalysisMode, PredictionResult};
    use chrono::Utc;

    fn pending_record(average_odds: f64) -> PredictionRecord {
        PredictionRecord::new(
            1,
            Utc::now(),
            PredictionResult {
                average_odds,
                probabilities: vec![50.0],
                original_odds: vec![2.0],
                analysis_mode: AnalysisMode::Standard,
                meets_filters: true,
                is_safe_prediction: false,
            },
            vec![2.0],
        )
    }

    #[test]
    fn test_success_at_any_round() {
        for round in [1, 3, 5, 9] {
            let mut record = pending_record(1.98);
            let outcome = advance(&mut record, 1.98, round, 5);
            assert!(outcome.verified);
            assert_eq!(outcome.status, PredictionStatus::Success);
            assert_eq!(outcome.round, Some(round));
            assert_eq!(record.status, PredictionStatus::Success);
            assert_eq!(record.verified_round, Some(round));
        }
    }

    #[test]
    fn test_pending_below_max_rounds() {
        let mut record = pending_record(2.5);
        let outcome = advance(&mut record, 1.4, 2, 5);
        assert!(!outcome.verified);
        assert_eq!(outcome.status, PredictionStatus::Pending);
        assert_eq!(outcome.next_round, Some(3));
        assert!(record.is_pending());
        assert_eq!(record.verified_round, None);
    }

    #[test]
    fn test_fails_at_max_rounds() {
        let mut record = pending_record(2.5);
        let outcome = advance(&mut record, 1.4, 5, 5);
        assert_eq!(outcome.status, PredictionStatus::Failed);
        assert_eq!(outcome.round, Some(5));
        assert_eq!(outcome.message.as_deref(), Some("Not reached within 5 rounds"));
        assert_eq!(record.status, PredictionStatus::Failed);
        assert_eq!(record.verification_status, PredictionStatus::Failed);
    }

    #[test]
    fn test_failed_never_becomes_success() {
        let mut record = pending_record(2.5);
        advance(&mut record, 1.1, 3, 3);
        let outcome = advance(&mut record, 10.0, 4, 3);
        assert_eq!(outcome.status, PredictionStatus::Failed);
        assert!(!outcome.verified);
        assert_eq!(outcome.round, Some(3));
        assert_eq!(record.status, PredictionStatus::Failed);
    }

    #[test]
    fn test_success_never_becomes_failed() {
        let mut record = pending_record(2.5);
        advance(&mut record, 3.0, 1, 5);
        let outcome = advance(&mut record, 1.01, 5, 5);
        assert!(outcome.verified);
        assert_eq!(outcome.status, PredictionStatus::Success);
        assert_eq!(outcome.round, Some(1));
        assert_eq!(record.verified_round, Some(1));
    }

    #[test]
    fn test_nan_observation_does_not_confirm() {
        let mut record = pending_record(1.5);
        let outcome = advance(&mut record, f64::NAN, 1, 5);
        assert_eq!(outcome.status, PredictionStatus::Pending);
    }
}
