//! Family — tagged variant over the supported detection-correction models.
//!
//! Purpose
//! -------
//! Enumerate the three latent-state families and dispatch the two
//! capabilities the estimation driver needs: the marginal negative
//! log-likelihood and the generative simulation routine. The driver is
//! generic over this pair and never inspects which variant is active.
//!
//! Key behaviors
//! -------------
//! - The N-mixture and Royle-Nichols variants carry the latent-abundance
//!   truncation bound `k_max` as an auxiliary constant: it rides along with
//!   the family value and is never part of the optimized parameter vector.
//! - Each variant fixes the state block's label, short code, and inverse
//!   link (logit for occupancy probability, log for abundance rates); the
//!   detection block always uses the logit link.
//!
//! Invariants & assumptions
//! ------------------------
//! - Callers of the truncated families must choose `k_max` large enough
//!   that the truncated sum has effectively converged; a bound below an
//!   observed count is rejected, but "large enough for accuracy" is a
//!   caller responsibility, not something the likelihood can verify.
use crate::detection::core::{
    group::{SubmodelGroup, SubmodelKind},
    link::Link,
    response::Response,
};
use crate::detection::errors::{ModelError, ModelResult};
use crate::detection::models::{nmixture, occupancy, royle_nichols};
use ndarray::{s, Array1, Array2};
use rand::rngs::StdRng;
use rand::Rng;
use rand_distr::{Binomial, Distribution, Poisson};

/// Latent-state family of a detection model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Family {
    /// Bernoulli latent occupancy with Bernoulli detection.
    Occupancy,
    /// Poisson latent abundance with Binomial(z, p) detection, marginalized
    /// up to `k_max`.
    NMixture { k_max: u64 },
    /// Poisson latent abundance with Bernoulli detection at rate
    /// `1 − (1−r)^z`, marginalized up to `k_max`.
    RoyleNichols { k_max: u64 },
}

impl Family {
    /// Occupancy family.
    pub const fn occupancy() -> Self {
        Family::Occupancy
    }

    /// N-mixture family with latent-abundance truncation bound `k_max`.
    pub const fn n_mixture(k_max: u64) -> Self {
        Family::NMixture { k_max }
    }

    /// Royle-Nichols family with latent-abundance truncation bound `k_max`.
    pub const fn royle_nichols(k_max: u64) -> Self {
        Family::RoyleNichols { k_max }
    }

    /// `(name, code)` pair for the state block: occupancy models call it
    /// "Occupancy"/"occ", the abundance families "Abundance"/"abun".
    pub fn state_labels(&self) -> (&'static str, &'static str) {
        match self {
            Family::Occupancy => ("Occupancy", "occ"),
            Family::NMixture { .. } | Family::RoyleNichols { .. } => ("Abundance", "abun"),
        }
    }

    /// Inverse link for the state block: logit for probabilities, log for
    /// rates.
    pub fn state_link(&self) -> Link {
        match self {
            Family::Occupancy => Link::Logit,
            Family::NMixture { .. } | Family::RoyleNichols { .. } => Link::Log,
        }
    }

    /// Marginal negative log-likelihood at `theta`, integrating out the
    /// latent state per site.
    ///
    /// # Errors
    /// - [`ModelError::ParameterLengthMismatch`] for a wrong-length `theta`.
    /// - [`ModelError::TruncationBelowObserved`] when a truncated family's
    ///   `k_max` is below some site's observed maximum.
    /// - [`ModelError::DegenerateSiteLikelihood`] when a site's marginal
    ///   likelihood is not strictly positive.
    pub fn negative_log_likelihood(
        &self, theta: &Array1<f64>, response: &Response, submodels: &SubmodelGroup,
    ) -> ModelResult<f64> {
        match self {
            Family::Occupancy => occupancy::negative_log_likelihood(theta, response, submodels),
            Family::NMixture { k_max } => {
                nmixture::negative_log_likelihood(theta, response, submodels, *k_max)
            }
            Family::RoyleNichols { k_max } => {
                royle_nichols::negative_log_likelihood(theta, response, submodels, *k_max)
            }
        }
    }

    /// Generate a new N×J observation matrix from already-transformed
    /// parameter values: `state` holds `psi` or `lambda` per site, `det`
    /// holds `p` or `r` per site-visit.
    pub fn simulate(
        &self, state: &Array1<f64>, det: &Array2<f64>, rng: &mut StdRng,
    ) -> Array2<f64> {
        match self {
            Family::Occupancy => occupancy::simulate(state, det, rng),
            Family::NMixture { .. } => nmixture::simulate(state, det, rng),
            Family::RoyleNichols { .. } => royle_nichols::simulate(state, det, rng),
        }
    }
}

/// Evaluate both blocks at `theta`: the state block's inverse-linked values
/// (length N) and the detection block's inverse-linked values reshaped to
/// N×J (visit-major per site).
///
/// # Errors
/// - [`ModelError::ParameterLengthMismatch`] for a wrong-length `theta`.
/// - [`ModelError::Design`] when the detection design's row count does not
///   equal sites × visits.
pub(crate) fn transformed_blocks(
    theta: &Array1<f64>, response: &Response, submodels: &SubmodelGroup,
) -> ModelResult<(Array1<f64>, Array2<f64>)> {
    submodels.check_parameter_length(theta)?;
    let (n, j) = response.y().dim();

    let state = submodels.get(SubmodelKind::State);
    let state_vals =
        state.link().inverse_array(&state.linear_predictor(theta.slice(s![state.slice()]))?);

    let det = submodels.get(SubmodelKind::Detection);
    let det_vals = det.link().inverse_array(&det.linear_predictor(theta.slice(s![det.slice()]))?);
    let det_len = det_vals.len();
    let det_matrix = Array2::from_shape_vec((n, j), det_vals.to_vec()).map_err(|_| {
        ModelError::Design(crate::design::DesignError::ObsRowMismatch {
            expected: n * j,
            actual: det_len,
        })
    })?;
    Ok((state_vals, det_matrix))
}

/// Bernoulli draw returning 0.0/1.0, with boundary probabilities handled
/// exactly so the sampler never sees an out-of-range parameter.
pub(crate) fn draw_bernoulli(rng: &mut StdRng, p: f64) -> f64 {
    if p <= 0.0 {
        0.0
    } else if p >= 1.0 {
        1.0
    } else if rng.gen::<f64>() < p {
        1.0
    } else {
        0.0
    }
}

/// Poisson draw. A non-positive rate degenerates to zero, matching the
/// pmf's limit.
pub(crate) fn draw_poisson(rng: &mut StdRng, lambda: f64) -> u64 {
    if lambda <= 0.0 {
        return 0;
    }
    let poisson =
        Poisson::new(lambda).expect("rate is strictly positive and finite here");
    poisson.sample(rng).round() as u64
}

/// Binomial draw over `n` trials, with boundary probabilities handled
/// exactly.
pub(crate) fn draw_binomial(rng: &mut StdRng, n: u64, p: f64) -> u64 {
    if n == 0 || p <= 0.0 {
        return 0;
    }
    if p >= 1.0 {
        return n;
    }
    let binomial = Binomial::new(n, p).expect("probability lies in (0, 1) here");
    binomial.sample(rng)
}
