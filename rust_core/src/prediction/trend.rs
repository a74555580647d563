//! First-half vs second-half trend factor

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// `1 + (second_mean - first_mean) / first_mean`, split at `len / 2`.
///
/// A single-element input leaves the first half empty and yields NaN; the
/// engine rejects non-finite averages, so no guard is applied here.
pub fn trend_factor(odds: &[f64]) -> f64 {
    let (first_half, second_half) = odds.split_at(odds.len() / 2);
    let first_mean = mean(first_half);
    let second_mean = mean(second_half);
    1.0 + (second_mean - first_mean) / first_mean
}
