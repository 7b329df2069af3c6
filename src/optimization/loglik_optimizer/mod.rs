//! loglik_optimizer — argmin-backed maximum-likelihood layer.
//!
//! Purpose
//! -------
//! Provide a model-agnostic optimization surface for maximizing
//! log-likelihoods `ℓ(θ)`. A model implements [`LogLikelihood`] and calls
//! [`maximize`], which runs L-BFGS with a configurable line search,
//! validated tolerances, and automatic finite-difference gradients when the
//! model supplies none.
//!
//! Key behaviors
//! -------------
//! - [`adapter::ArgMinAdapter`] converts the maximization of `ℓ(θ)` into the
//!   minimization of `c(θ) = -ℓ(θ)` expected by `argmin`.
//! - [`builders`] constructs L-BFGS solvers for the chosen
//!   [`traits::LineSearcher`]; [`run::run_lbfgs`] executes them and
//!   normalizes results into an [`OptimOutcome`].
//! - [`finite_diff`] supplies validated FD gradients and Hessians; the
//!   Hessian path also serves post-fit covariance computation in
//!   [`crate::inference`].
//! - [`validation`] centralizes tolerance/gradient/estimate checks so the
//!   solver layers can assume finite, well-shaped inputs.
//!
//! Invariants & assumptions
//! ------------------------
//! - Parameters live in unconstrained space as [`Theta`]
//!   (`ndarray::Array1<f64>`); link functions map them into model space.
//! - `value` and `grad` report invalid inputs as recoverable
//!   [`crate::optimization::errors::OptError`] values, never panics.
//! - All user-facing diagnostics (including [`OptimOutcome::value`]) are on
//!   log-likelihood scale; the cost sign flip is internal.
//!
//! Downstream usage
//! ----------------
//! - [`crate::detection::models::model::DetectionModel`] implements
//!   [`LogLikelihood`] over its family's marginal likelihood and calls
//!   [`maximize`] from `fit`.

pub mod adapter;
pub mod api;
pub mod builders;
pub mod finite_diff;
pub mod run;
pub mod traits;
pub mod types;
pub mod validation;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::api::maximize;
pub use self::traits::{LineSearcher, LogLikelihood, MLEOptions, OptimOutcome, Tolerances};
pub use self::types::{Cost, FnEvalMap, Grad, Hessian, Theta, DEFAULT_LBFGS_MEM};
