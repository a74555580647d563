//! Bounded in-memory prediction history.
//!
//! Newest record first. Appending past capacity evicts from the tail
//! (oldest). Records are never removed any other way.

use crate::types::{PredictionRecord, StatusCounts};
use std::collections::VecDeque;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct PredictionHistory {
    records: VecDeque<PredictionRecord>,
    capacity: usize,
    last_id: i64,
}

impl PredictionHistory {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            records: VecDeque::with_capacity(capacity + 1),
            capacity,
            last_id: 0,
        }
    }

    /// Next creation-time-derived id: `now_ms`, bumped past the last issued id
    pub fn next_id(&mut self, now_ms: i64) -> i64 {
        let id = now_ms.max(self.last_id + 1);
        self.last_id = id;
        id
    }

    /// Insert at the head, then trim. Returns the number of evicted records.
    pub fn append(&mut self, record: PredictionRecord) -> usize {
        self.last_id = self.last_id.max(record.id);
        self.records.push_front(record);
        self.trim_to_capacity()
    }

    /// Drop oldest records beyond capacity
    pub fn trim_to_capacity(&mut self) -> usize {
        let mut evicted = 0;
        while self.records.len() > self.capacity {
            if let Some(old) = self.records.pop_back() {
                debug!("Evicting prediction {} ({})", old.id, old.status);
                evicted += 1;
            }
        }
        evicted
    }

    pub fn find_by_id(&self, id: i64) -> Option<&PredictionRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    pub fn find_by_id_mut(&mut self, id: i64) -> Option<&mut PredictionRecord> {
        self.records.iter_mut().find(|r| r.id == id)
    }

    /// All records, newest first
    pub fn iter(&self) -> impl Iterator<Item = &PredictionRecord> {
        self.records.iter()
    }

    pub fn to_vec(&self) -> Vec<PredictionRecord> {
        self.records.iter().cloned().collect()
    }

    pub fn status_counts(&self) -> StatusCounts {
        let mut counts = StatusCounts::default();
        for record in &self.records {
            counts.record(record.status);
        }
        counts
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
