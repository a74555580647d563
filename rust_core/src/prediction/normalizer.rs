//! Coefficient validation and extremes exclusion

use crate::error::PredictionError;

/// Keep finite values strictly above 1.0, in input order
pub fn valid_coefficients(raw: &[f64]) -> Vec<f64> {
    raw.iter()
        .copied()
        .filter(|odd| odd.is_finite() && *odd > 1.0)
        .collect()
}

/// Sort ascending and drop the single lowest and highest value
pub fn exclude_extremes(mut odds: Vec<f64>) -> Vec<f64> {
    odds.sort_by(|a, b| a.total_cmp(b));
    if odds.len() <= 2 {
        return Vec::new();
    }
    odds.pop();
    odds.remove(0);
    odds
}

/// Validate a raw coefficient array into the set used for prediction.
///
/// The minimum count is checked on the valid coefficients before extremes
/// exclusion and is not re-checked afterwards, so a trimmed set may hold
/// `min_count - 2` values. Only an empty trimmed set is rejected.
pub fn normalize(
    raw: &[f64],
    min_count: usize,
    exclude: bool,
) -> Result<Vec<f64>, PredictionError> {
    let odds = valid_coefficients(raw);
    if odds.len() < min_count {
        return Err(PredictionError::InsufficientData {
            required: min_count,
            found: odds.len(),
        });
    }

    let odds = if exclude { exclude_extremes(odds) } else { odds };
    if odds.is_empty() {
        return Err(PredictionError::InsufficientData {
            required: min_count,
            found: 0,
        });
    }
    Ok(odds)
}
