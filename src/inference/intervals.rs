//! Normal-theory intervals and the delta method.
//!
//! Quantile and interval helpers shared by coefficient summaries and
//! prediction intervals. All functions here assume a confidence level
//! already normalized into `(0, 1)`; level normalization and its error
//! reporting live in the model layer.
use ndarray::{Array1, Array2, ArrayView1};
use statrs::distribution::{ContinuousCDF, Normal};

/// Two-sided standard-normal critical value for a confidence level in
/// `(0, 1)`: `z = Φ⁻¹((1 + level) / 2)`, e.g. ≈ 1.959964 at 0.95.
pub fn normal_quantile(level: f64) -> f64 {
    let standard_normal = Normal::new(0.0, 1.0)
        .expect("standard normal parameters are constant and valid");
    standard_normal.inverse_cdf(0.5 * (1.0 + level))
}

/// Symmetric normal interval `center ± z · se`, elementwise.
///
/// Returns `(lower, upper)` arrays aligned with the inputs.
pub fn symmetric_interval(
    center: &Array1<f64>, se: &Array1<f64>, z: f64,
) -> (Array1<f64>, Array1<f64>) {
    let half_width = se.mapv(|s| z * s);
    (center - &half_width, center + &half_width)
}

/// Delta-method standard error of one linear-predictor row:
/// `sqrt(x · Σ · xᵀ)` for a design row `x` and coefficient covariance `Σ`.
///
/// Negative quadratic forms from numerical noise are clamped to zero before
/// the square root.
pub fn delta_method_se(row: ArrayView1<f64>, covariance: &Array2<f64>) -> f64 {
    let variance = row.dot(&covariance.dot(&row));
    variance.max(0.0).sqrt()
}
