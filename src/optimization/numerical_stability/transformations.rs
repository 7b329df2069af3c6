//! Numerical stability utilities.
//!
//! Guarded implementations of the nonlinear transforms the detection links
//! rely on, plus the eigenvalue cutoff used when pseudoinverting curvature
//! matrices. The guards use explicit cutoffs to keep `f64` arithmetic in a
//! well-conditioned regime, mirroring the strategy of mainstream ML
//! libraries.
//!
//! # Provided items
//! - [`EIGEN_EPS`]: eigenvalues at or below this magnitude are treated as
//!   numerically zero when forming pseudoinverse directions.
//! - [`safe_logistic(x)`]: stable inverse-logit, mapping ℝ → (0, 1) without
//!   overflow on either tail.
//! - [`safe_exp(x)`]: exponential with an overflow guard, mapping ℝ → (0, ∞)
//!   and saturating at `f64::MAX` instead of producing `inf`.

/// Eigenvalue truncation threshold for curvature pseudoinverses.
///
/// Observed-information matrices from finite differences can carry tiny
/// negative or near-zero eigenvalues along weakly identified directions.
/// Directions with eigenvalue ≤ `EIGEN_EPS` are excluded from the inverse,
/// which inflates the reported uncertainty there instead of dividing by
/// numerical noise.
pub const EIGEN_EPS: f64 = 1e-10;

/// Numerically stable inverse logit: `1 / (1 + exp(-x))`.
///
/// Evaluates the branch whose exponential argument is non-positive, so
/// neither tail overflows:
///
/// - For `x >= 0`: `1 / (1 + exp(-x))`.
/// - For `x < 0`: `exp(x) / (1 + exp(x))`.
///
/// # Parameters
/// - `x`: real input (a linear-predictor value).
///
/// # Returns
/// - `logistic(x)` in `(0, 1)`, up to `f64` underflow at the extreme tails.
pub fn safe_logistic(x: f64) -> f64 {
    if x >= 0.0 {
        1.0 / (1.0 + (-x).exp())
    } else {
        let e = x.exp();
        e / (1.0 + e)
    }
}

/// Exponential with an overflow guard.
///
/// `exp(x)` overflows `f64` near `x ≈ 709.78`. Past that cutoff this returns
/// `f64::MAX` so downstream likelihood code sees a huge-but-finite rate
/// instead of `inf`, which would otherwise poison every product it enters.
///
/// # Parameters
/// - `x`: real input (a log-scale linear-predictor value).
///
/// # Returns
/// - `exp(x)`, saturated at `f64::MAX`.
pub fn safe_exp(x: f64) -> f64 {
    if x > 709.0 { f64::MAX } else { x.exp() }
}
