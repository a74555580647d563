//! Rolling round window and the prediction currently under verification

use std::collections::VecDeque;

/// Prediction awaiting confirmation and the round it will be checked at next
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingPrediction {
    pub id: i64,
    pub round: u32,
}

#[derive(Debug)]
pub struct RoundTracker {
    window: VecDeque<f64>,
    window_size: usize,
    last_seen: Option<f64>,
    pending: Option<PendingPrediction>,
    rounds_observed: u64,
}

impl RoundTracker {
    pub fn new(window_size: usize) -> Self {
        let window_size = window_size.max(1);
        Self {
            window: VecDeque::with_capacity(window_size + 1),
            window_size,
            last_seen: None,
            pending: None,
            rounds_observed: 0,
        }
    }

    /// True when `coefficient` differs from the last polled value.
    ///
    /// The upstream state only carries the last stop coefficient, so two
    /// consecutive rounds ending at the same value are seen as one.
    pub fn is_new_round(&mut self, coefficient: f64) -> bool {
        if self.last_seen == Some(coefficient) {
            return false;
        }
        self.last_seen = Some(coefficient);
        true
    }

    /// Add a finished round, dropping the oldest beyond the window size
    pub fn push(&mut self, coefficient: f64) {
        self.rounds_observed += 1;
        self.window.push_back(coefficient);
        while self.window.len() > self.window_size {
            self.window.pop_front();
        }
    }

    /// Window contents, oldest first
    pub fn window(&self) -> Vec<f64> {
        self.window.iter().copied().collect()
    }

    pub fn is_full(&self) -> bool {
        self.window.len() >= self.window_size
    }

    pub fn pending(&self) -> Option<PendingPrediction> {
        self.pending
    }

    /// Start verifying a fresh prediction at round 1
    pub fn set_pending(&mut self, id: i64) {
        self.pending = Some(PendingPrediction { id, round: 1 });
    }

    pub fn set_round(&mut self, round: u32) {
        if let Some(pending) = self.pending.as_mut() {
            pending.round = round;
        }
    }

    pub fn clear_pending(&mut self) {
        self.pending = None;
    }

    pub fn rounds_observed(&self) -> u64 {
        self.rounds_observed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repeated_value_is_not_a_new_round() {
        let mut tracker = RoundTracker::new(5);
        assert!(tracker.is_new_round(1.5));
        assert!(!tracker.is_new_round(1.5));
        assert!(tracker.is_new_round(2.0));
        assert!(tracker.is_new_round(1.5));
    }

    #[test]
    fn test_window_slides() {
        let mut tracker = RoundTracker::new(3);
        for c in [1.1, 1.2, 1.3] {
            tracker.push(c);
        }
        assert!(tracker.is_full());
        tracker.push(1.4);
        assert_eq!(tracker.window(), vec![1.2, 1.3, 1.4]);
        assert_eq!(tracker.rounds_observed(), 4);
    }

    #[test]
    fn test_pending_lifecycle() {
        let mut tracker = RoundTracker::new(3);
        assert!(tracker.pending().is_none());

        tracker.set_pending(42);
        assert_eq!(tracker.pending(), Some(PendingPrediction { id: 42, round: 1 }));

        tracker.set_round(3);
        assert_eq!(tracker.pending().unwrap().round, 3);

        tracker.clear_pending();
        assert!(tracker.pending().is_none());
    }
}
