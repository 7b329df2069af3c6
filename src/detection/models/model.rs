//! DetectionModel — the user-facing model object and estimation driver.
//!
//! Purpose
//! -------
//! Tie a [`Family`] to one [`Response`] and one [`SubmodelGroup`] and drive
//! estimation: minimize the family's marginal negative log-likelihood over
//! the flattened parameter vector, derive the asymptotic covariance from the
//! curvature at the optimum, and push both back into the submodels. All
//! post-fit surfaces (summary, coefficient table, predictions, intervals,
//! simulation, AIC) read from here.
//!
//! Key behaviors
//! -------------
//! - `fit` defaults the initial vector to zeros and the gradient tolerance
//!   to `1e-6 × n_sites`, then runs the generic likelihood optimizer on
//!   `ℓ(θ) = −NLL(θ)` with finite-difference gradients.
//! - The covariance proxy is the pseudoinverted observed information at the
//!   optimum (finite-difference Hessian of the NLL), sliced into blocks by
//!   the submodel group.
//! - Convergence failure is not fatal: the flag is stored, surfaced by
//!   `summary`, and left for callers to check.
//!
//! Invariants & assumptions
//! ------------------------
//! - `results`, and the submodels' estimates/covariance, are written exactly
//!   once per `fit` call and read thereafter; `fit` takes `&mut self`, so
//!   concurrent fits on one model cannot interleave.
use crate::design::UnmarkedFrame;
use crate::detection::core::{
    group::{SubmodelGroup, SubmodelKind},
    link::Link,
    options::{FitOptions, SimOptions},
    response::Response,
    submodel::{CoefficientTable, PredictionIntervals, Submodel},
};
use crate::detection::errors::{ModelError, ModelResult};
use crate::detection::models::family::{transformed_blocks, Family};
use crate::inference::covariance::covariance_matrix;
use crate::optimization::{
    errors::OptResult,
    loglik_optimizer::{maximize, Cost, LogLikelihood, MLEOptions, OptimOutcome, Theta, Tolerances},
};
use finitediff::FiniteDiff;
use ndarray::{Array1, Array2};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Post-fit state: the optimizer outcome plus the covariance proxy derived
/// from the curvature at the optimum.
#[derive(Debug, Clone, PartialEq)]
pub struct FitOutcome {
    /// Optimizer result on log-likelihood scale.
    pub optim: OptimOutcome,
    /// Pseudoinverse of the observed information at `theta_hat`.
    pub covariance: Array2<f64>,
}

/// A detection-correction model: family, response, submodel pair, and
/// post-fit state.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectionModel {
    /// Latent-state family (carries any truncation bound).
    pub family: Family,
    /// Validated observations.
    pub response: Response,
    /// State and detection blocks with the parameter layout.
    pub submodels: SubmodelGroup,
    /// Estimation configuration.
    pub options: FitOptions,
    /// Fit results (populated after `fit`).
    pub results: Option<FitOutcome>,
}

impl DetectionModel {
    /// Occupancy model: logit-linked occupancy and detection blocks.
    ///
    /// # Errors
    /// Propagates response validation and formula/design failures.
    pub fn occupancy(
        det_formula: &str, occ_formula: &str, frame: &UnmarkedFrame, options: FitOptions,
    ) -> ModelResult<Self> {
        Self::build(Family::occupancy(), det_formula, occ_formula, frame, options)
    }

    /// N-mixture model with latent-abundance truncation bound `k_max`.
    ///
    /// `k_max` must be large enough that the truncated marginal has
    /// effectively converged; too small a bound biases the fit low.
    ///
    /// # Errors
    /// Propagates response validation and formula/design failures.
    pub fn n_mixture(
        det_formula: &str, abun_formula: &str, frame: &UnmarkedFrame, k_max: u64,
        options: FitOptions,
    ) -> ModelResult<Self> {
        Self::build(Family::n_mixture(k_max), det_formula, abun_formula, frame, options)
    }

    /// Royle-Nichols model with latent-abundance truncation bound `k_max`.
    ///
    /// # Errors
    /// Propagates response validation and formula/design failures.
    pub fn royle_nichols(
        det_formula: &str, abun_formula: &str, frame: &UnmarkedFrame, k_max: u64,
        options: FitOptions,
    ) -> ModelResult<Self> {
        Self::build(Family::royle_nichols(k_max), det_formula, abun_formula, frame, options)
    }

    fn build(
        family: Family, det_formula: &str, state_formula: &str, frame: &UnmarkedFrame,
        options: FitOptions,
    ) -> ModelResult<Self> {
        let response = Response::new(frame.y.clone())?;
        let (state_name, state_code) = family.state_labels();
        let state = Submodel::new(
            state_name,
            state_code,
            state_formula,
            family.state_link(),
            &frame.site_covs,
        )?;
        let detection =
            Submodel::new("Detection", "det", det_formula, Link::Logit, &frame.obs_covs)?;
        Ok(DetectionModel {
            family,
            response,
            submodels: SubmodelGroup::new(state, detection),
            options,
            results: None,
        })
    }

    /// Borrow a submodel by kind.
    pub fn submodel(&self, kind: SubmodelKind) -> &Submodel {
        self.submodels.get(kind)
    }

    /// Post-fit state.
    ///
    /// # Errors
    /// [`ModelError::NotFitted`] before a successful `fit`.
    pub fn fit_outcome(&self) -> ModelResult<&FitOutcome> {
        self.results.as_ref().ok_or(ModelError::NotFitted)
    }

    /// Fit by maximum likelihood and cache results.
    ///
    /// ## Steps
    /// 1. Default `x0` to the zero vector and `gtol` to `1e-6 × n_sites`.
    /// 2. Maximize `ℓ(θ) = −NLL(θ)` with L-BFGS per `self.options`
    ///    (finite-difference gradients; the initial vector is consumed by
    ///    the executor).
    /// 3. Compute the covariance proxy: pseudoinverse of the
    ///    finite-difference observed information at `θ̂`.
    /// 4. Broadcast `θ̂` and the covariance blocks into the submodels and
    ///    store the [`FitOutcome`].
    ///
    /// A run that stops without meeting the gradient tolerance still
    /// populates estimates; check the stored `converged` flag.
    ///
    /// # Errors
    /// - Propagates optimizer construction/run failures, including
    ///   likelihood errors raised at trial parameters (degenerate site
    ///   marginals, truncation bounds below observed counts).
    /// - Propagates covariance failures (invalid finite-difference Hessian).
    pub fn fit(&mut self, x0: Option<Array1<f64>>, gtol: Option<f64>) -> OptResult<()> {
        let n_parameters = self.submodels.n_parameters();
        let theta0 = x0.unwrap_or_else(|| Array1::zeros(n_parameters));
        let gtol = gtol.unwrap_or(1e-6 * self.response.n_sites() as f64);
        let tols = Tolerances::new(Some(gtol), None, Some(self.options.max_iter))?;
        let mle_opts = MLEOptions::new(tols, self.options.line_searcher, self.options.lbfgs_mem)?;
        log::debug!(
            "fitting {} parameters over {} sites x {} visits (gtol = {:.3e})",
            n_parameters,
            self.response.n_sites(),
            self.response.n_visits(),
            gtol
        );

        let outcome = maximize(&*self, theta0, &self.response, &mle_opts)?;
        if !outcome.converged {
            log::warn!("optimizer stopped without convergence: {}", outcome.status);
        }

        let theta_hat = outcome.theta_hat.clone();
        let nll_fn = |theta: &Theta| -> f64 {
            self.family
                .negative_log_likelihood(theta, &self.response, &self.submodels)
                .unwrap_or(f64::NAN)
        };
        let grad_fn = |theta: &Theta| theta.central_diff(&nll_fn);
        let covariance = covariance_matrix(&grad_fn, &theta_hat)?;

        self.submodels.store_fit(&theta_hat, &covariance)?;
        self.results = Some(FitOutcome { optim: outcome, covariance });
        Ok(())
    }

    /// Akaike information criterion:
    /// `2 × NLL(θ̂) + 2 × total_parameters`.
    ///
    /// # Errors
    /// [`ModelError::NotFitted`] before a fit.
    pub fn aic(&self) -> ModelResult<f64> {
        let results = self.fit_outcome()?;
        Ok(2.0 * (-results.optim.value) + 2.0 * self.submodels.n_parameters() as f64)
    }

    /// Rendered model summary: per-block coefficient tables, AIC, and the
    /// convergence flag.
    ///
    /// # Errors
    /// [`ModelError::NotFitted`] before a fit; [`ModelError::InvalidLevel`]
    /// for an out-of-range level.
    pub fn summary(&self, level: f64) -> ModelResult<String> {
        let results = self.fit_outcome()?;
        let blocks = self.submodels.summary(level)?;
        Ok(format!(
            "{blocks}AIC: {:.4}\nConverged: {}\n",
            self.aic()?,
            results.optim.converged
        ))
    }

    /// Combined coefficient table across blocks, tagged by submodel code.
    ///
    /// # Errors
    /// As [`DetectionModel::summary`].
    pub fn coefficient_table(&self, level: f64) -> ModelResult<CoefficientTable> {
        self.submodels.coefficient_table(level)
    }

    /// Point predictions for one block from stored estimates, optionally
    /// inverse-link transformed, aligned to that block's design rows.
    ///
    /// # Errors
    /// [`ModelError::NotFitted`] before a fit.
    pub fn predict(&self, kind: SubmodelKind, transform: bool) -> ModelResult<Array1<f64>> {
        self.submodels.get(kind).predict(None, transform)
    }

    /// Delta-method prediction intervals for one block.
    ///
    /// # Errors
    /// As [`DetectionModel::predict`], plus [`ModelError::InvalidLevel`].
    pub fn predict_interval(
        &self, kind: SubmodelKind, transform: bool, level: f64,
    ) -> ModelResult<PredictionIntervals> {
        self.submodels.get(kind).predict_interval(transform, level)
    }

    /// Generate a new N×J observation matrix from the fitted estimates via
    /// the family's generative process.
    ///
    /// # Errors
    /// [`ModelError::NotFitted`] before a fit.
    pub fn simulate(&self, options: &SimOptions) -> ModelResult<Array2<f64>> {
        let results = self.fit_outcome()?;
        let (state_vals, det_vals) =
            transformed_blocks(&results.optim.theta_hat, &self.response, &self.submodels)?;
        let mut rng = match options.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(self.family.simulate(&state_vals, &det_vals, &mut rng))
    }
}

impl LogLikelihood for DetectionModel {
    type Data = Response;

    /// Log-likelihood `ℓ(θ) = −NLL(θ)` under the model's family.
    ///
    /// # Errors
    /// Propagates marginal-likelihood failures (wrapped as model errors).
    fn value(&self, theta: &Theta, data: &Self::Data) -> OptResult<Cost> {
        Ok(-self.family.negative_log_likelihood(theta, data, &self.submodels)?)
    }

    /// Pre-flight validation: parameter count matches the layout and every
    /// entry is finite.
    fn check(&self, theta: &Theta, _data: &Self::Data) -> OptResult<()> {
        self.submodels.check_parameter_length(theta)?;
        for (index, &value) in theta.iter().enumerate() {
            if !value.is_finite() {
                return Err(ModelError::NonFiniteParameter { index, value }.into());
            }
        }
        Ok(())
    }
}
