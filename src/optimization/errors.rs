//! Errors for the optimization layer.
//!
//! The optimizer surface reports everything through [`OptError`]: option and
//! tolerance validation, gradient/Hessian checks, non-finite objectives,
//! normalized `argmin` backend failures, and model-layer errors raised inside
//! a likelihood evaluation (wrapped as [`OptError::Model`]).
use argmin::core::{ArgminError, Error};

use crate::detection::errors::ModelError;

/// Crate-wide result alias for optimizer operations.
pub type OptResult<T> = Result<T, OptError>;

#[derive(Debug, Clone, PartialEq)]
pub enum OptError {
    // ---- Gradient ----
    /// No analytic gradient; the adapter falls back to finite differences.
    GradientNotImplemented,

    /// Gradient length does not match the parameter dimension.
    GradientDimMismatch { expected: usize, found: usize },

    /// Gradient elements must be finite.
    InvalidGradient { index: usize, value: f64, reason: &'static str },

    // ---- Options ----
    /// Gradient-norm tolerance must be positive and finite.
    InvalidTolGrad { tol: f64, reason: &'static str },

    /// Cost-change tolerance must be positive and finite.
    InvalidTolCost { tol: f64, reason: &'static str },

    /// Maximum iterations must be positive.
    InvalidMaxIter { max_iter: usize, reason: &'static str },

    /// At least one stopping rule must be provided.
    NoTolerancesProvided,

    /// Unrecognized line-search name.
    InvalidLineSearch { name: String, reason: &'static str },

    /// L-BFGS memory must be at least 1.
    InvalidLbfgsMem { mem: usize, reason: &'static str },

    // ---- Objective ----
    /// Objective returned a non-finite value.
    NonFiniteCost { value: f64 },

    // ---- Outcome ----
    /// Estimated parameters must be finite.
    InvalidThetaHat { index: usize, value: f64, reason: &'static str },

    /// Solver finished without a best parameter vector.
    MissingThetaHat,

    // ---- Finite differences ----
    /// Hessian shape does not match the parameter dimension.
    HessianDimMismatch { expected: usize, found: (usize, usize) },

    /// Hessian entries must be finite.
    InvalidHessian { row: usize, col: usize, value: f64 },

    // ---- Model layer ----
    /// Error raised by the model's likelihood or validation code.
    Model(ModelError),

    // ---- Argmin backend ----
    /// Normalized `argmin` failure with its human-readable text.
    Backend { text: String },
}

impl std::error::Error for OptError {}

impl std::fmt::Display for OptError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OptError::GradientNotImplemented => {
                write!(f, "Analytic gradient not implemented")
            }
            OptError::GradientDimMismatch { expected, found } => {
                write!(f, "Gradient dimension mismatch: expected {expected}, found {found}")
            }
            OptError::InvalidGradient { index, value, reason } => {
                write!(f, "Invalid gradient at index {index}: {value}: {reason}")
            }
            OptError::InvalidTolGrad { tol, reason } => {
                write!(f, "Invalid gradient tolerance {tol}: {reason}")
            }
            OptError::InvalidTolCost { tol, reason } => {
                write!(f, "Invalid cost-change tolerance {tol}: {reason}")
            }
            OptError::InvalidMaxIter { max_iter, reason } => {
                write!(f, "Invalid maximum iterations {max_iter}: {reason}")
            }
            OptError::NoTolerancesProvided => {
                write!(f, "No stopping rule provided (tol_grad, tol_cost, or max_iter)")
            }
            OptError::InvalidLineSearch { name, reason } => {
                write!(f, "Invalid line searcher '{name}': {reason}")
            }
            OptError::InvalidLbfgsMem { mem, reason } => {
                write!(f, "Invalid L-BFGS memory {mem}: {reason}")
            }
            OptError::NonFiniteCost { value } => {
                write!(f, "Non-finite objective value: {value}")
            }
            OptError::InvalidThetaHat { index, value, reason } => {
                write!(f, "Invalid estimate at index {index}: {value}: {reason}")
            }
            OptError::MissingThetaHat => {
                write!(f, "Solver produced no parameter estimate")
            }
            OptError::HessianDimMismatch { expected, found } => {
                write!(
                    f,
                    "Hessian dimension mismatch: expected ({expected}, {expected}), found {found:?}"
                )
            }
            OptError::InvalidHessian { row, col, value } => {
                write!(f, "Invalid Hessian at ({row}, {col}): {value}, must be finite")
            }
            OptError::Model(err) => err.fmt(f),
            OptError::Backend { text } => {
                write!(f, "Optimizer backend error: {text}")
            }
        }
    }
}

impl From<ModelError> for OptError {
    fn from(err: ModelError) -> Self {
        OptError::Model(err)
    }
}

impl From<Error> for OptError {
    /// Normalize an `argmin` error. If the boxed error is one of ours
    /// (raised inside a cost or gradient evaluation), unwrap it; otherwise
    /// keep the backend's own message.
    fn from(original: Error) -> Self {
        match original.downcast::<OptError>() {
            Ok(opt_err) => opt_err,
            Err(err) => match err.downcast::<ArgminError>() {
                Ok(argmin_err) => OptError::Backend { text: argmin_err.to_string() },
                Err(other) => OptError::Backend { text: other.to_string() },
            },
        }
    }
}
