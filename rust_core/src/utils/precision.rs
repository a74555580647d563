//! Fixed-precision helpers for odds and probabilities.
//!
//! Odds and implied probabilities are reported with two decimals. Rounding
//! happens once, at the point a value leaves a calculation, never in between.

/// Round to two decimal places (half away from zero)
#[inline]
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Round to one decimal place, used for percentages in reports
#[inline]
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Implied probability in percent for a decimal odds value
#[inline]
pub fn implied_probability(odds: f64) -> f64 {
    round2(100.0 / odds)
}

/// Success ratio as a percentage, 0 when there is nothing to divide by
#[inline]
pub fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    part as f64 / whole as f64 * 100.0
}
