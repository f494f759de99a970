//! Descriptive statistics over metric series.

use statrs::statistics::Statistics;

/// Arithmetic mean; 0.0 for an empty series.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().mean()
}

/// Sample standard deviation divided by the mean.
///
/// 0.0 when the series has fewer than two values, a single distinct value,
/// or a zero mean.
pub fn coefficient_of_variation(values: &[f64]) -> f64 {
    if values.len() < 2 || values.iter().all(|v| *v == values[0]) {
        return 0.0;
    }

    let mean = values.iter().mean();
    if mean == 0.0 || !mean.is_finite() {
        return 0.0;
    }

    let std_dev = values.iter().std_dev();
    if std_dev.is_finite() {
        std_dev / mean
    } else {
        0.0
    }
}
