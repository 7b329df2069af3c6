//! Royle-Nichols family: Poisson latent abundance, abundance-induced
//! Bernoulli detection.
//!
//! Detection at a visit succeeds when at least one of the `k` individuals
//! present is detected, each independently at rate `r_ij`, so the visit-level
//! detection probability is `p_ij(k) = 1 − (1−r_ij)^k`. The marginalization
//! has the same truncated-sum structure as the N-mixture family, with a
//! Bernoulli (not binomial-count) mass per visit:
//!
//! `L_i = Σ_{k=kmin_i}^{K} Poisson(k; λ_i) · ∏_j Bernoulli(y_ij; 1 − q_ij^k)`
//!
//! where `q = 1 − r`.
use crate::detection::core::{
    group::SubmodelGroup,
    pmf::{log_bernoulli_pmf, log_poisson_pmf},
    response::Response,
};
use crate::detection::errors::{ModelError, ModelResult};
use crate::detection::models::family::{draw_bernoulli, draw_poisson, transformed_blocks};
use ndarray::{Array1, Array2};
use rand::rngs::StdRng;

/// Marginal negative log-likelihood of the Royle-Nichols family.
///
/// # Errors
/// - [`ModelError::TruncationBelowObserved`] when `k_max` is below some
///   site's observed maximum.
/// - [`ModelError::DegenerateSiteLikelihood`] when the truncated sum
///   underflows to zero.
pub(crate) fn negative_log_likelihood(
    theta: &Array1<f64>, response: &Response, submodels: &SubmodelGroup, k_max: u64,
) -> ModelResult<f64> {
    let (lambda, r) = transformed_blocks(theta, response, submodels)?;
    let y = response.y();
    let kmin = response.kmin();
    let (n, j) = y.dim();

    let mut nll = 0.0;
    for i in 0..n {
        let k_low = kmin[i] as u64;
        if k_max < k_low {
            return Err(ModelError::TruncationBelowObserved { site: i, kmin: k_low, k_max });
        }
        let mut site_sum = 0.0;
        for k in k_low..=k_max {
            let mut log_term = log_poisson_pmf(k, lambda[i]);
            for v in 0..j {
                let q = 1.0 - r[[i, v]];
                let p_k = 1.0 - q.powf(k as f64);
                log_term += log_bernoulli_pmf(y[[i, v]], p_k);
            }
            site_sum += log_term.exp();
        }
        if !(site_sum > 0.0) {
            return Err(ModelError::DegenerateSiteLikelihood { site: i });
        }
        nll -= site_sum.ln();
    }
    Ok(nll)
}

/// Generative draw: `z_i ~ Poisson(λ_i)`, visit-level detection probability
/// `p_ij = 1 − (1−r_ij)^{z_i}`, then `y_ij ~ Bernoulli(p_ij)`.
pub(crate) fn simulate(lambda: &Array1<f64>, r: &Array2<f64>, rng: &mut StdRng) -> Array2<f64> {
    let (n, j) = r.dim();
    let mut y = Array2::zeros((n, j));
    for i in 0..n {
        let z = draw_poisson(rng, lambda[i]);
        for v in 0..j {
            let p = 1.0 - (1.0 - r[[i, v]]).powf(z as f64);
            y[[i, v]] = draw_bernoulli(rng, p);
        }
    }
    y
}
