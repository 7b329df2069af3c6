//! Errors for formula parsing, covariate frames, and design-matrix
//! construction.
//!
//! ## Conventions
//! - **Row indices are 0-based.**
//! - Covariate columns must be finite; missing-value handling is out of
//!   scope and surfaces here as a non-finite entry.
//! - Formula errors carry the offending formula or term text so callers can
//!   report the problem without re-parsing.

/// Result alias for design-layer operations that may produce [`DesignError`].
pub type DesignResult<T> = Result<T, DesignError>;

/// Unified error type for the design layer (formulas, frames, matrices).
#[derive(Debug, Clone, PartialEq)]
pub enum DesignError {
    // ---- Formula syntax ----
    /// Formula string does not start with `~`.
    MissingTilde { formula: String },

    /// Formula contains an empty term (e.g. `~a++b` or a bare `~`).
    EmptyTerm { formula: String },

    // ---- Covariate frames ----
    /// Two columns share the same name.
    DuplicateColumn { name: String },

    /// A column's length differs from the frame's row count.
    ColumnLengthMismatch { name: String, expected: usize, actual: usize },

    /// A covariate value is NaN or ±inf.
    NonFiniteCovariate { name: String, row: usize, value: f64 },

    /// Formula references a covariate the frame does not contain.
    UnknownCovariate { name: String },

    // ---- Frame bundling ----
    /// Site-covariate frame row count differs from the response's site count.
    SiteRowMismatch { expected: usize, actual: usize },

    /// Observation-covariate frame row count differs from sites × visits.
    ObsRowMismatch { expected: usize, actual: usize },
}

impl std::error::Error for DesignError {}

impl std::fmt::Display for DesignError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DesignError::MissingTilde { formula } => {
                write!(f, "Formula '{formula}' must start with '~'")
            }
            DesignError::EmptyTerm { formula } => {
                write!(f, "Formula '{formula}' contains an empty term")
            }
            DesignError::DuplicateColumn { name } => {
                write!(f, "Duplicate covariate column '{name}'")
            }
            DesignError::ColumnLengthMismatch { name, expected, actual } => {
                write!(
                    f,
                    "Column '{name}' has {actual} rows but the frame expects {expected}"
                )
            }
            DesignError::NonFiniteCovariate { name, row, value } => {
                write!(f, "Covariate '{name}' is not finite at row {row}: {value}")
            }
            DesignError::UnknownCovariate { name } => {
                write!(f, "Formula references unknown covariate '{name}'")
            }
            DesignError::SiteRowMismatch { expected, actual } => {
                write!(
                    f,
                    "Site covariates have {actual} rows, expected {expected} (one per site)"
                )
            }
            DesignError::ObsRowMismatch { expected, actual } => {
                write!(
                    f,
                    "Observation covariates have {actual} rows, expected {expected} \
                     (sites × visits, visit-major)"
                )
            }
        }
    }
}
