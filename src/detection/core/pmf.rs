//! Log-space probability masses for the marginal likelihoods.
//!
//! The truncated latent-state sums evaluate Poisson, binomial, and Bernoulli
//! masses thousands of times per likelihood call, so these helpers work
//! directly with log-gamma rather than constructing distribution objects in
//! the inner loop. Impossible events return `-inf`, which exponentiates to a
//! clean zero inside `log(Σ exp(·))` accumulations.
use statrs::function::gamma::ln_gamma;

/// Log Poisson mass `log P(K = k)` for rate `lambda > 0`:
/// `k·log(λ) − λ − log(k!)`.
///
/// A rate of exactly zero is handled by its limit: mass 1 at `k = 0`, zero
/// elsewhere.
pub fn log_poisson_pmf(k: u64, lambda: f64) -> f64 {
    if lambda <= 0.0 {
        return if k == 0 { 0.0 } else { f64::NEG_INFINITY };
    }
    let kf = k as f64;
    kf * lambda.ln() - lambda - ln_gamma(kf + 1.0)
}

/// Log binomial mass `log P(Y = y)` for `n` trials with success probability
/// `p ∈ [0, 1]`: `log C(n, y) + y·log(p) + (n−y)·log(1−p)`.
///
/// Returns `-inf` for `y > n`, and handles the boundary probabilities 0 and
/// 1 exactly (mass concentrates at `y = 0` / `y = n`).
pub fn log_binomial_pmf(y: u64, n: u64, p: f64) -> f64 {
    if y > n {
        return f64::NEG_INFINITY;
    }
    if p <= 0.0 {
        return if y == 0 { 0.0 } else { f64::NEG_INFINITY };
    }
    if p >= 1.0 {
        return if y == n { 0.0 } else { f64::NEG_INFINITY };
    }
    let (yf, nf) = (y as f64, n as f64);
    let ln_choose = ln_gamma(nf + 1.0) - ln_gamma(yf + 1.0) - ln_gamma(nf - yf + 1.0);
    ln_choose + yf * p.ln() + (nf - yf) * (1.0 - p).ln()
}

/// Log Bernoulli mass for a 0/1 outcome with success probability `p`:
/// `log(p)` when `y` is nonzero, `log(1−p)` otherwise.
pub fn log_bernoulli_pmf(y: f64, p: f64) -> f64 {
    if y != 0.0 {
        p.ln()
    } else {
        (1.0 - p).ln()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // Spot-checks against hand-computed masses and the boundary/impossible
    // cases the likelihood sums rely on.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Poisson masses match hand-computed values and the zero-rate limit.
    //
    // Given
    // -----
    // - `P(0; 1) = e⁻¹`, `P(2; 1.5) = 1.5² e⁻¹·⁵ / 2`; λ = 0.
    //
    // Expect
    // ------
    // - Log-mass agreement within 1e-12; point mass at k = 0 for λ = 0.
    fn log_poisson_pmf_matches_hand_values() {
        assert!((log_poisson_pmf(0, 1.0) - (-1.0)).abs() < 1e-12);
        let expected = (1.5_f64.powi(2) * (-1.5_f64).exp() / 2.0).ln();
        assert!((log_poisson_pmf(2, 1.5) - expected).abs() < 1e-12);

        assert_eq!(log_poisson_pmf(0, 0.0), 0.0);
        assert_eq!(log_poisson_pmf(1, 0.0), f64::NEG_INFINITY);
    }

    #[test]
    // Purpose
    // -------
    // Binomial masses match hand values and degenerate cleanly at the
    // boundaries.
    //
    // Given
    // -----
    // - `P(1; 2, 0.5) = 0.5`; `y > n`; `p ∈ {0, 1}`.
    //
    // Expect
    // ------
    // - `log(0.5)` within 1e-12; `-inf` for impossible events; zero
    //   log-mass for certain events.
    fn log_binomial_pmf_handles_boundaries() {
        assert!((log_binomial_pmf(1, 2, 0.5) - 0.5_f64.ln()).abs() < 1e-12);

        assert_eq!(log_binomial_pmf(3, 2, 0.5), f64::NEG_INFINITY);
        assert_eq!(log_binomial_pmf(0, 5, 0.0), 0.0);
        assert_eq!(log_binomial_pmf(2, 5, 0.0), f64::NEG_INFINITY);
        assert_eq!(log_binomial_pmf(5, 5, 1.0), 0.0);
        assert_eq!(log_binomial_pmf(4, 5, 1.0), f64::NEG_INFINITY);
    }

    #[test]
    // Purpose
    // -------
    // The Bernoulli mass picks `log p` for detections and `log(1−p)` for
    // non-detections.
    //
    // Given
    // -----
    // - `p = 0.25` with outcomes 1 and 0.
    //
    // Expect
    // ------
    // - `log(0.25)` and `log(0.75)` respectively.
    fn log_bernoulli_pmf_selects_branch_by_outcome() {
        assert!((log_bernoulli_pmf(1.0, 0.25) - 0.25_f64.ln()).abs() < 1e-12);
        assert!((log_bernoulli_pmf(0.0, 0.25) - 0.75_f64.ln()).abs() < 1e-12);
    }
}
