//! History analytics
//!
//! Three independent aggregations over the prediction history:
//! - Probability ranges (width 10) of resolved records, ranked by success count
//! - Resolution rounds of resolved records, ranked by success rate
//! - Average-odds ranges (width 0.5) of successful records, ranked by count
//!
//! Range buckets keep first-seen order while scanning newest-first history,
//! so on a full tie the range of the most recent record wins. Rounds are
//! visited in ascending order, so the earliest round wins a tie.

use crate::history::PredictionHistory;
use crate::types::{PredictionRecord, PredictionStatus};
use crate::utils::{percentage, round1};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Success tally for one bucket
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketStats {
    pub total: usize,
    pub success: usize,
}

/// Entry for `key`, appended on first sight so buckets keep scan order
fn bucket_entry<K: PartialEq, V: Default>(buckets: &mut Vec<(K, V)>, key: K) -> &mut V {
    let index = match buckets.iter().position(|(k, _)| *k == key) {
        Some(index) => index,
        None => {
            buckets.push((key, V::default()));
            buckets.len() - 1
        }
    };
    &mut buckets[index].1
}

impl BucketStats {
    fn add(&mut self, success: bool) {
        self.total += 1;
        if success {
            self.success += 1;
        }
    }

    /// Success rate in percent
    pub fn success_rate(&self) -> f64 {
        percentage(self.success, self.total)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProbabilityRangeSummary {
    /// e.g. "50-60"
    pub best_range: String,
    pub best_count: usize,
    pub total_for_range: usize,
    pub success_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundSummary {
    pub best_round: u32,
    pub round_count: usize,
    pub total_for_round: usize,
    pub success_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OddsRangeSummary {
    /// e.g. "1.5-2.0"
    pub best_range: String,
    pub success_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryAnalysis {
    pub has_data: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percentage_ranges: Option<ProbabilityRangeSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub round_analysis: Option<RoundSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub odds_analysis: Option<OddsRangeSummary>,
    pub total_successful: usize,
}

impl HistoryAnalysis {
    pub fn no_data() -> Self {
        Self {
            has_data: false,
            message: Some("Not enough data for analysis yet".to_string()),
            percentage_ranges: None,
            round_analysis: None,
            odds_analysis: None,
            total_successful: 0,
        }
    }
}

/// Bucket resolved records by main probability, pick the most successes
/// (ties: higher success rate)
pub fn analyze_probability_ranges<'a, I>(records: I) -> Option<ProbabilityRangeSummary>
where
    I: IntoIterator<Item = &'a PredictionRecord>,
{
    let mut ranges: Vec<(i64, BucketStats)> = Vec::new();
    for record in records.into_iter().filter(|r| !r.is_pending()) {
        let bucket = (record.main_probability() / 10.0).floor() as i64;
        bucket_entry(&mut ranges, bucket).add(record.status == PredictionStatus::Success);
    }

    let mut best: Option<(i64, BucketStats)> = None;
    for (bucket, stats) in ranges {
        let better = match best {
            None => true,
            Some((_, current)) => {
                stats.success > current.success
                    || (stats.success == current.success
                        && stats.success_rate() > current.success_rate())
            }
        };
        if better {
            best = Some((bucket, stats));
        }
    }

    best.map(|(bucket, stats)| {
        let start = bucket * 10;
        ProbabilityRangeSummary {
            best_range: format!("{}-{}", start, start + 10),
            best_count: stats.success,
            total_for_range: stats.total,
            success_rate: round1(stats.success_rate()),
        }
    })
}

/// Bucket resolved records by resolution round, pick the best success rate
/// (ties: more successes)
pub fn analyze_rounds<'a, I>(records: I) -> Option<RoundSummary>
where
    I: IntoIterator<Item = &'a PredictionRecord>,
{
    let mut rounds: BTreeMap<u32, BucketStats> = BTreeMap::new();
    for record in records.into_iter().filter(|r| !r.is_pending()) {
        if let Some(round) = record.verified_round {
            rounds
                .entry(round)
                .or_default()
                .add(record.status == PredictionStatus::Success);
        }
    }

    let mut best: Option<(u32, BucketStats)> = None;
    for (round, stats) in rounds {
        let better = match best {
            None => true,
            Some((_, current)) => {
                stats.success_rate() > current.success_rate()
                    || (stats.success_rate() == current.success_rate()
                        && stats.success > current.success)
            }
        };
        if better {
            best = Some((round, stats));
        }
    }

    best.map(|(round, stats)| RoundSummary {
        best_round: round,
        round_count: stats.success,
        total_for_round: stats.total,
        success_rate: round1(stats.success_rate()),
    })
}

/// Bucket successful records by average odds, pick the most frequent range
pub fn analyze_odds_ranges<'a, I>(records: I) -> Option<OddsRangeSummary>
where
    I: IntoIterator<Item = &'a PredictionRecord>,
{
    let mut ranges: Vec<(i64, usize)> = Vec::new();
    for record in records
        .into_iter()
        .filter(|r| r.status == PredictionStatus::Success)
    {
        let bucket = (record.average_odds * 2.0).floor() as i64;
        *bucket_entry(&mut ranges, bucket) += 1;
    }

    let mut best: Option<(i64, usize)> = None;
    for (bucket, count) in ranges {
        if best.map_or(true, |(_, current)| count > current) {
            best = Some((bucket, count));
        }
    }

    best.map(|(bucket, count)| {
        let start = bucket as f64 / 2.0;
        OddsRangeSummary {
            best_range: format!("{:.1}-{:.1}", start, start + 0.5),
            success_count: count,
        }
    })
}

/// Full analysis; `has_data` is false until at least one prediction succeeded
pub fn analyze(history: &PredictionHistory) -> HistoryAnalysis {
    let total_successful = history
        .iter()
        .filter(|r| r.status == PredictionStatus::Success)
        .count();
    if total_successful == 0 {
        return HistoryAnalysis::no_data();
    }

    HistoryAnalysis {
        has_data: true,
        message: None,
        percentage_ranges: analyze_probability_ranges(history.iter()),
        round_analysis: analyze_rounds(history.iter()),
        odds_analysis: analyze_odds_ranges(history.iter()),
        total_successful,
    }
}
