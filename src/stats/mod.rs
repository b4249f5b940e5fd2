//! Descriptive statistics for feature columns.
//!
//! Mean, sample standard deviation, and the standard-score transform used to
//! put every feature dimension on a comparable scale before distances are
//! computed.
//!
//! Degenerate inputs are recoverable by design: an empty column has mean 0,
//! and a column with fewer than two values has standard deviation 0. The
//! functions here never abort the caller. A standard deviation of exactly
//! zero (a constant column) is deliberately not guarded — standardizing
//! through it produces non-finite values that propagate into distance
//! comparisons, where they rank behind every finite distance.
//!
//! # Example
//!
//! ```
//! use clasificar::stats;
//!
//! let depths = [4.0, 6.0, 8.0, 10.0];
//! let mean = stats::mean(&depths);
//! let sd = stats::standard_deviation(&depths, mean);
//! let scaled = stats::standardize(&depths, mean, sd);
//!
//! assert_eq!(mean, 7.0);
//! assert!((scaled[0] * sd + mean - depths[0]).abs() < 1e-5);
//! ```

/// Arithmetic mean of a column.
///
/// Returns the fallback value 0.0 for an empty column.
#[must_use]
pub fn mean(values: &[f32]) -> f32 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f32>() / values.len() as f32
}

/// Sample standard deviation of a column, given its mean.
///
/// Uses divisor n − 1. Returns the fallback value 0.0 when the column holds
/// fewer than two values.
#[must_use]
pub fn standard_deviation(values: &[f32], mean: f32) -> f32 {
    if values.len() <= 1 {
        return 0.0;
    }
    let total: f32 = values.iter().map(|v| (v - mean).powi(2)).sum();
    (total / (values.len() - 1) as f32).sqrt()
}

/// Standard-score transform of a column: `(x − mean) / sd` elementwise.
///
/// Does not mutate its input. A zero `sd` yields non-finite values, which
/// callers let propagate (see module docs).
#[must_use]
pub fn standardize(values: &[f32], mean: f32, sd: f32) -> Vec<f32> {
    values.iter().map(|v| (v - mean) / sd).collect()
}
