//! Occupancy family: Bernoulli latent state, Bernoulli detection.
//!
//! Per-site marginal likelihood, integrating over presence/absence:
//!
//! `L_i = psi_i · ∏_j p_ij^{y_ij} (1−p_ij)^{1−y_ij} + (1−psi_i) · 1[kmin_i = 0]`
//!
//! A site detected at least once rules the absent branch out entirely; the
//! indicator keeps that branch only for all-zero detection histories. The
//! detection history product is accumulated in log space and exponentiated
//! once per site.
use crate::detection::core::{group::SubmodelGroup, pmf::log_bernoulli_pmf, response::Response};
use crate::detection::errors::{ModelError, ModelResult};
use crate::detection::models::family::{draw_bernoulli, transformed_blocks};
use ndarray::{Array1, Array2};
use rand::rngs::StdRng;

/// Marginal negative log-likelihood of the occupancy family.
///
/// # Errors
/// - Propagates block-evaluation failures from theta slicing.
/// - [`ModelError::DegenerateSiteLikelihood`] when a site's marginal
///   likelihood is not strictly positive (e.g. a detection probability that
///   underflowed to zero at a detected site).
pub(crate) fn negative_log_likelihood(
    theta: &Array1<f64>, response: &Response, submodels: &SubmodelGroup,
) -> ModelResult<f64> {
    let (psi, p) = transformed_blocks(theta, response, submodels)?;
    let y = response.y();
    let kmin = response.kmin();
    let (n, j) = y.dim();

    let mut nll = 0.0;
    for i in 0..n {
        let mut log_history = 0.0;
        for v in 0..j {
            log_history += log_bernoulli_pmf(y[[i, v]], p[[i, v]]);
        }
        let absent_branch = if kmin[i] == 0.0 { 1.0 - psi[i] } else { 0.0 };
        let marginal = psi[i] * log_history.exp() + absent_branch;
        if !(marginal > 0.0) {
            return Err(ModelError::DegenerateSiteLikelihood { site: i });
        }
        nll -= marginal.ln();
    }
    Ok(nll)
}

/// Generative draw: `z_i ~ Bernoulli(psi_i)`, then
/// `y_ij ~ Bernoulli(z_i · p_ij)`.
pub(crate) fn simulate(psi: &Array1<f64>, p: &Array2<f64>, rng: &mut StdRng) -> Array2<f64> {
    let (n, j) = p.dim();
    let mut y = Array2::zeros((n, j));
    for i in 0..n {
        let z = draw_bernoulli(rng, psi[i]);
        for v in 0..j {
            y[[i, v]] = draw_bernoulli(rng, z * p[[i, v]]);
        }
    }
    y
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::design::CovariateFrame;
    use crate::detection::core::link::Link;
    use crate::detection::core::submodel::Submodel;
    use ndarray::array;
    use rand::SeedableRng;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - The deterministic likelihood value on the worked two-site example.
    // - The reduction of the marginal to the detection-history product when
    //   every site has at least one detection.
    // - The degenerate-likelihood error path.
    // - Structural properties of simulated matrices.
    // -------------------------------------------------------------------------

    fn intercept_group(n: usize, j: usize) -> SubmodelGroup {
        let state = Submodel::new(
            "Occupancy",
            "occ",
            "~1",
            Link::Logit,
            &CovariateFrame::empty(n),
        )
        .expect("state block");
        let det = Submodel::new(
            "Detection",
            "det",
            "~1",
            Link::Logit,
            &CovariateFrame::empty(n * j),
        )
        .expect("detection block");
        SubmodelGroup::new(state, det)
    }

    #[test]
    // Purpose
    // -------
    // Reproduce the worked example: two sites, two visits,
    // y = [[1, 0], [1, 1]], psi = p = 0.5. Each site's marginal is
    // 0.5 · 0.5 · 0.5 = 0.125, so the NLL is −2·log(0.125).
    //
    // Given
    // -----
    // - Intercept-only blocks with θ = [0, 0] (logit⁻¹(0) = 0.5).
    //
    // Expect
    // ------
    // - NLL within 1e-6 of 4.158883.
    fn deterministic_two_site_example() {
        let response = Response::new(array![[1.0, 0.0], [1.0, 1.0]]).expect("response");
        let group = intercept_group(2, 2);

        let nll = negative_log_likelihood(&array![0.0, 0.0], &response, &group)
            .expect("finite likelihood");

        assert!((nll - 4.158883).abs() < 1e-6);
    }

    #[test]
    // Purpose
    // -------
    // When every site is detected at least once the absent branch
    // contributes nothing, so the full marginal equals the reduced form
    // `Σ_i [log psi_i + Σ_j log Bernoulli(y_ij; p_ij)]`.
    //
    // Given
    // -----
    // - A 3-site, 2-visit matrix with kmin = 1 everywhere and θ = [0.3, −0.2].
    //
    // Expect
    // ------
    // - Full and reduced NLL agree within 1e-10.
    fn reduces_to_detection_product_when_all_sites_detected() {
        let y = array![[1.0, 0.0], [0.0, 1.0], [1.0, 1.0]];
        let response = Response::new(y.clone()).expect("response");
        let group = intercept_group(3, 2);
        let theta = array![0.3, -0.2];

        let full = negative_log_likelihood(&theta, &response, &group).expect("full NLL");

        let psi = crate::optimization::numerical_stability::transformations::safe_logistic(0.3);
        let p = crate::optimization::numerical_stability::transformations::safe_logistic(-0.2);
        let mut reduced = 0.0;
        for i in 0..3 {
            let mut site = psi.ln();
            for v in 0..2 {
                site += if y[[i, v]] == 1.0 { p.ln() } else { (1.0 - p).ln() };
            }
            reduced -= site;
        }

        assert!((full - reduced).abs() < 1e-10);
    }

    #[test]
    // Purpose
    // -------
    // A detected site whose detection probability underflows to zero makes
    // the marginal exactly zero, which is a hard error, not a silent −inf.
    //
    // Given
    // -----
    // - y = [[1]] with detection intercept −800 (logit⁻¹ underflows to 0).
    //
    // Expect
    // ------
    // - `DegenerateSiteLikelihood { site: 0 }`.
    fn zero_marginal_is_a_hard_error() {
        let response = Response::new(array![[1.0]]).expect("response");
        let group = intercept_group(1, 1);

        let err =
            negative_log_likelihood(&array![0.0, -800.0], &response, &group).unwrap_err();

        assert_eq!(err, ModelError::DegenerateSiteLikelihood { site: 0 });
    }

    #[test]
    // Purpose
    // -------
    // Simulated matrices are binary, and sites with psi = 0 never produce a
    // detection while p = 1, psi = 1 always does.
    //
    // Given
    // -----
    // - psi = [0, 1], p all ones, fixed seed.
    //
    // Expect
    // ------
    // - Row 0 all zeros, row 1 all ones, shape 2×3.
    fn simulate_respects_degenerate_probabilities() {
        let mut rng = StdRng::seed_from_u64(1);
        let psi = array![0.0, 1.0];
        let p = Array2::from_elem((2, 3), 1.0);

        let y = simulate(&psi, &p, &mut rng);

        assert_eq!(y.dim(), (2, 3));
        assert!(y.row(0).iter().all(|&v| v == 0.0));
        assert!(y.row(1).iter().all(|&v| v == 1.0));
    }
}
