//! Small numeric helpers shared by the analytics crates.

/// Arithmetic mean; 0.0 for an empty slice.
pub fn mean(data: &[f64]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    data.iter().sum::<f64>() / data.len() as f64
}

/// `numerator / denominator`, or `None` when the denominator is zero or
/// either side is not finite.
pub fn checked_ratio(numerator: f64, denominator: f64) -> Option<f64> {
    if denominator == 0.0 || !numerator.is_finite() || !denominator.is_finite() {
        return None;
    }
    Some(numerator / denominator)
}

/// Relative change from `previous` to `current`, 0.0 when `previous` is zero.
pub fn change_ratio(current: f64, previous: f64) -> f64 {
    checked_ratio(current - previous, previous).unwrap_or(0.0)
}
