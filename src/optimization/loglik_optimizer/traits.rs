//! Public API surface for log-likelihood maximization.
//!
//! - [`LogLikelihood`]: trait models implement.
//! - [`MLEOptions`] and [`Tolerances`]: optimizer configuration.
//! - [`LineSearcher`]: line-search choice used by L-BFGS.
//! - [`OptimOutcome`]: normalized result of a `maximize` run.
//!
//! Convention: a user log-likelihood `ℓ(θ)` is *maximized* by minimizing the
//! cost `c(θ) = -ℓ(θ)`. An analytic gradient, when provided, is the gradient
//! of the log-likelihood; the adapter flips signs.
use crate::optimization::{
    errors::{OptError, OptResult},
    loglik_optimizer::{
        types::{Cost, FnEvalMap, Grad, Theta},
        validation::{validate_theta_hat, validate_value, verify_tol_cost, verify_tol_grad},
    },
};
use argmin::core::{TerminationReason, TerminationStatus};
use argmin_math::ArgminL2Norm;
use std::str::FromStr;

/// Model-implemented log-likelihood interface.
///
/// Implementors supply `ℓ(θ)`; the optimizer internally minimizes
/// `c(θ) = -ℓ(θ)`. An analytic gradient is optional: the default `grad`
/// signals [`OptError::GradientNotImplemented`], which routes the adapter to
/// robust finite differences. Detection models in this crate rely on that
/// fallback.
///
/// - `type Data`: per-model data threaded into every evaluation.
/// - `value(θ, data)`: evaluate `ℓ(θ)`; invalid inputs are recoverable
///   errors, never panics.
/// - `check(θ, data)`: pre-flight validation, called once before a run.
pub trait LogLikelihood {
    type Data: 'static;

    fn value(&self, theta: &Theta, data: &Self::Data) -> OptResult<Cost>;
    fn check(&self, theta: &Theta, data: &Self::Data) -> OptResult<()>;

    fn grad(&self, _theta: &Theta, _data: &Self::Data) -> OptResult<Grad> {
        Err(OptError::GradientNotImplemented)
    }
}

/// Line-search algorithm used inside L-BFGS.
///
/// Parses case-insensitively from `"MoreThuente"` / `"HagerZhang"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineSearcher {
    MoreThuente,
    HagerZhang,
}

impl FromStr for LineSearcher {
    type Err = OptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "morethuente" => Ok(LineSearcher::MoreThuente),
            "hagerzhang" => Ok(LineSearcher::HagerZhang),
            _ => Err(OptError::InvalidLineSearch {
                name: s.to_string(),
                reason: "Valid options are 'MoreThuente' or 'HagerZhang' (case-insensitive).",
            }),
        }
    }
}

/// Optimizer-level configuration.
///
/// - `tols`: stopping rules and iteration cap.
/// - `line_searcher`: line-search algorithm for L-BFGS.
/// - `lbfgs_mem`: optional history size; `None` uses the crate default.
///
/// Default: `tol_grad = 1e-6`, no cost tolerance, `max_iter = 300`,
/// More-Thuente line search, default memory.
#[derive(Debug, Clone, PartialEq)]
pub struct MLEOptions {
    pub tols: Tolerances,
    pub line_searcher: LineSearcher,
    pub lbfgs_mem: Option<usize>,
}

impl MLEOptions {
    /// Build validated options. Numeric validation of the tolerances happens
    /// in [`Tolerances::new`]; this constructor only rejects a zero L-BFGS
    /// memory.
    ///
    /// # Errors
    /// [`OptError::InvalidLbfgsMem`] if `lbfgs_mem == Some(0)`.
    pub fn new(
        tols: Tolerances, line_searcher: LineSearcher, lbfgs_mem: Option<usize>,
    ) -> OptResult<Self> {
        if let Some(mem) = lbfgs_mem {
            if mem == 0 {
                return Err(OptError::InvalidLbfgsMem {
                    mem,
                    reason: "L-BFGS memory must be greater than zero.",
                });
            }
        }
        Ok(Self { tols, line_searcher, lbfgs_mem })
    }
}

impl Default for MLEOptions {
    fn default() -> Self {
        Self {
            tols: Tolerances {
                tol_grad: Some(1e-6),
                tol_cost: None,
                max_iter: Some(300),
            },
            line_searcher: LineSearcher::MoreThuente,
            lbfgs_mem: None,
        }
    }
}

/// Stopping rules and iteration cap for the optimizer.
///
/// - `tol_grad`: stop when the gradient norm falls below this value.
/// - `tol_cost`: stop when the cost change falls below this value.
/// - `max_iter`: hard iteration cap.
///
/// Any field may be `None`, but at least one must be present.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerances {
    pub tol_grad: Option<f64>,
    pub tol_cost: Option<f64>,
    pub max_iter: Option<usize>,
}

impl Tolerances {
    /// Construct validated tolerances.
    ///
    /// # Errors
    /// - [`OptError::NoTolerancesProvided`] when all three are `None`.
    /// - [`OptError::InvalidTolGrad`] / [`OptError::InvalidTolCost`] for
    ///   non-finite or non-positive tolerances.
    /// - [`OptError::InvalidMaxIter`] if `max_iter == Some(0)`.
    pub fn new(
        tol_grad: Option<f64>, tol_cost: Option<f64>, max_iter: Option<usize>,
    ) -> OptResult<Self> {
        if tol_grad.is_none() && tol_cost.is_none() && max_iter.is_none() {
            return Err(OptError::NoTolerancesProvided);
        }
        verify_tol_grad(tol_grad)?;
        verify_tol_cost(tol_cost)?;
        if let Some(max_iter) = max_iter {
            if max_iter == 0 {
                return Err(OptError::InvalidMaxIter {
                    max_iter,
                    reason: "Maximum iterations must be greater than zero.",
                });
            }
        }
        Ok(Self { tol_grad, tol_cost, max_iter })
    }
}

/// Canonical result of a `maximize` run.
///
/// - `theta_hat`: best parameter vector found.
/// - `value`: best **log-likelihood** `ℓ(θ̂)` (not the cost).
/// - `converged`: whether the solver stopped because a convergence
///   criterion was met (gradient tolerance, cost tolerance, or target
///   cost) — an exhausted iteration budget does **not** count.
/// - `status`: human-readable termination description.
/// - `iterations`: optimizer iterations performed.
/// - `fn_evals`: solver evaluation counters.
/// - `grad_norm`: L2 norm of the last available gradient, if any.
#[derive(Debug, Clone, PartialEq)]
pub struct OptimOutcome {
    pub theta_hat: Theta,
    pub value: f64,
    pub converged: bool,
    pub status: String,
    pub iterations: usize,
    pub fn_evals: FnEvalMap,
    pub grad_norm: Option<f64>,
}

impl OptimOutcome {
    /// Build a validated outcome from raw solver state.
    ///
    /// Checks `theta_hat` (present, finite) and `value` (finite), maps the
    /// termination status into `(converged, status)`, and records the
    /// gradient norm when a gradient is available. Only
    /// `SolverConverged` / `TargetCostReached` terminations count as
    /// convergence; running out of iterations leaves the flag false while
    /// the status string still names the reason.
    ///
    /// # Errors
    /// Propagates validation failures for `theta_hat` and `value`.
    pub fn new(
        theta_hat: Option<Theta>, value: f64, termination: TerminationStatus, iterations: u64,
        fn_evals: FnEvalMap, grad: Option<Grad>,
    ) -> OptResult<Self> {
        let theta_hat = validate_theta_hat(theta_hat)?;
        validate_value(value)?;
        let (converged, status) = match termination {
            TerminationStatus::NotTerminated => (false, "Not terminated".to_string()),
            TerminationStatus::Terminated(reason) => {
                let converged = matches!(
                    reason,
                    TerminationReason::SolverConverged | TerminationReason::TargetCostReached
                );
                (converged, format!("{reason:?}"))
            }
        };
        let grad_norm = grad.map(|g| g.l2_norm());
        Ok(Self {
            theta_hat,
            value,
            converged,
            status,
            iterations: iterations as usize,
            fn_evals,
            grad_norm,
        })
    }
}
