//! Errors for detection-correction models (response validation, fit-state
//! checks, likelihood evaluation, and inference inputs).
//!
//! ## Conventions
//! - **Site and visit indices are 0-based.**
//! - Observations must be finite, non-negative integers (stored as `f64`).
//! - Operations that need estimates or a covariance block fail with
//!   [`ModelError::NotFitted`] until a `fit` call has populated them.
//! - A site whose marginal likelihood is not strictly positive is a hard
//!   error ([`ModelError::DegenerateSiteLikelihood`]), never a silent `-inf`.
use crate::design::errors::DesignError;

/// Result alias for model-layer operations that may produce [`ModelError`].
pub type ModelResult<T> = Result<T, ModelError>;

/// Unified error type for detection-correction modeling.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelError {
    // ---- Response validation ----
    /// Observation matrix has zero sites or zero visits.
    EmptyResponse,

    /// An observation is NaN/±inf.
    NonFiniteObservation { site: usize, visit: usize, value: f64 },

    /// An observation is negative.
    NegativeObservation { site: usize, visit: usize, value: f64 },

    /// An observation is not an integer count.
    NonIntegerObservation { site: usize, visit: usize, value: f64 },

    // ---- Fit state ----
    /// Model hasn't been fitted yet.
    NotFitted,

    // ---- Parameter plumbing ----
    /// Supplied coefficient vector does not match the design's column count.
    CoefficientLengthMismatch { expected: usize, actual: usize },

    /// Global parameter vector does not match the group's total count.
    ParameterLengthMismatch { expected: usize, actual: usize },

    /// A supplied parameter value is NaN/±inf.
    NonFiniteParameter { index: usize, value: f64 },

    // ---- Likelihood evaluation ----
    /// Truncation bound K is below a site's minimum feasible latent state.
    TruncationBelowObserved { site: usize, kmin: u64, k_max: u64 },

    /// A site's marginal likelihood evaluated to zero (or below), so its log
    /// is undefined. Usually a truncation bound that is too tight or extreme
    /// trial parameters.
    DegenerateSiteLikelihood { site: usize },

    // ---- Inference inputs ----
    /// Confidence level must land in (0, 1) after percent normalization.
    InvalidLevel { level: f64 },

    // ---- Design layer ----
    /// Wrapped formula/frame/design-matrix error.
    Design(DesignError),
}

impl std::error::Error for ModelError {}

impl std::fmt::Display for ModelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModelError::EmptyResponse => {
                write!(f, "Observation matrix must have at least one site and one visit")
            }
            ModelError::NonFiniteObservation { site, visit, value } => {
                write!(f, "Observation at site {site}, visit {visit} is not finite: {value}")
            }
            ModelError::NegativeObservation { site, visit, value } => {
                write!(f, "Observation at site {site}, visit {visit} is negative: {value}")
            }
            ModelError::NonIntegerObservation { site, visit, value } => {
                write!(
                    f,
                    "Observation at site {site}, visit {visit} is not an integer count: {value}"
                )
            }
            ModelError::NotFitted => {
                write!(f, "Model has not been fit yet")
            }
            ModelError::CoefficientLengthMismatch { expected, actual } => {
                write!(f, "Coefficient vector length mismatch: expected {expected}, got {actual}")
            }
            ModelError::ParameterLengthMismatch { expected, actual } => {
                write!(f, "Parameter vector length mismatch: expected {expected}, got {actual}")
            }
            ModelError::NonFiniteParameter { index, value } => {
                write!(f, "Parameter at index {index} is not finite: {value}")
            }
            ModelError::TruncationBelowObserved { site, kmin, k_max } => {
                write!(
                    f,
                    "Truncation bound K = {k_max} is below the minimum feasible latent state \
                     {kmin} observed at site {site}"
                )
            }
            ModelError::DegenerateSiteLikelihood { site } => {
                write!(f, "Marginal likelihood at site {site} is zero; its log is undefined")
            }
            ModelError::InvalidLevel { level } => {
                write!(f, "Confidence level {level} must lie in (0, 1) (or (1, 100] as percent)")
            }
            ModelError::Design(err) => err.fmt(f),
        }
    }
}

impl From<DesignError> for ModelError {
    fn from(err: DesignError) -> Self {
        ModelError::Design(err)
    }
}
