//! Wilkinson-style formulas and design-matrix construction.
//!
//! Purpose
//! -------
//! Turn a formula string such as `"~elev+forest"` and a [`CovariateFrame`]
//! into a numeric design matrix with stable column names. This is the whole
//! of the design-matrix collaborator contract the model layer depends on:
//! formula + table → (matrix, column names).
//!
//! Key behaviors
//! -------------
//! - `~1` (or a bare `~`-prefixed intercept) produces an intercept-only
//!   matrix; `~a+b` prepends an `(Intercept)` column unless the formula
//!   suppresses it with a `0` or `-1` term.
//! - Term order in the formula determines column order in the matrix, so the
//!   mapping from coefficients to columns is deterministic.
//!
//! Invariants & assumptions
//! ------------------------
//! - Only additive terms of plain covariate names are supported;
//!   interactions, transformations, and factor expansion are out of scope.
//! - Every named term must resolve to a column of the supplied frame.
//!
//! Downstream usage
//! ----------------
//! - `Submodel` builds and caches one [`DesignMatrix`] per linear-predictor
//!   block at construction; coefficient names are read from it.
use crate::design::{
    errors::{DesignError, DesignResult},
    frame::CovariateFrame,
};
use ndarray::Array2;

/// Column label used for the intercept term.
pub const INTERCEPT_NAME: &str = "(Intercept)";

/// A parsed additive formula: optional intercept plus named terms.
#[derive(Debug, Clone, PartialEq)]
pub struct Formula {
    source: String,
    intercept: bool,
    terms: Vec<String>,
}

impl Formula {
    /// Parse a Wilkinson-style formula string.
    ///
    /// Accepted grammar (whitespace is ignored):
    /// - `~1` — intercept only.
    /// - `~a+b` — intercept plus covariates `a` and `b`.
    /// - `~0+a` or `~-1+a` — covariate `a` with the intercept suppressed.
    ///
    /// # Errors
    /// - [`DesignError::MissingTilde`] if the string does not start with `~`.
    /// - [`DesignError::EmptyTerm`] for empty term lists or empty terms
    ///   between `+` separators.
    pub fn parse(formula: &str) -> DesignResult<Self> {
        let trimmed = formula.trim();
        let body = trimmed
            .strip_prefix('~')
            .ok_or_else(|| DesignError::MissingTilde { formula: formula.to_string() })?;
        if body.trim().is_empty() {
            return Err(DesignError::EmptyTerm { formula: formula.to_string() });
        }
        let mut intercept = true;
        let mut terms = Vec::new();
        for raw in body.split('+') {
            let term = raw.trim();
            match term {
                "" => {
                    return Err(DesignError::EmptyTerm { formula: formula.to_string() });
                }
                "1" => {}
                "0" | "-1" => intercept = false,
                name => terms.push(name.to_string()),
            }
        }
        Ok(Formula { source: trimmed.to_string(), intercept, terms })
    }

    /// The formula text as supplied (trimmed), for display in summaries.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Whether the design matrix includes an `(Intercept)` column.
    pub fn has_intercept(&self) -> bool {
        self.intercept
    }

    /// Named covariate terms in formula order.
    pub fn terms(&self) -> &[String] {
        &self.terms
    }
}

/// A realized design matrix: numeric columns plus their names.
///
/// Rows follow the frame's row order; columns follow formula order with the
/// intercept (when present) first.
#[derive(Debug, Clone, PartialEq)]
pub struct DesignMatrix {
    /// n_rows × n_coefficients numeric matrix.
    pub matrix: Array2<f64>,
    /// One name per column, aligned with `matrix`.
    pub column_names: Vec<String>,
}

impl DesignMatrix {
    /// Evaluate a formula against a covariate frame.
    ///
    /// # Errors
    /// - [`DesignError::UnknownCovariate`] if a term has no matching column.
    pub fn build(formula: &Formula, frame: &CovariateFrame) -> DesignResult<Self> {
        let n_rows = frame.n_rows();
        let mut column_names = Vec::new();
        let mut columns = Vec::new();
        if formula.has_intercept() {
            column_names.push(INTERCEPT_NAME.to_string());
            columns.push(vec![1.0; n_rows]);
        }
        for term in formula.terms() {
            let col = frame
                .column(term)
                .ok_or_else(|| DesignError::UnknownCovariate { name: term.clone() })?;
            column_names.push(term.clone());
            columns.push(col.to_vec());
        }
        let n_cols = columns.len();
        let mut matrix = Array2::zeros((n_rows, n_cols));
        for (c, col) in columns.iter().enumerate() {
            for (r, &value) in col.iter().enumerate() {
                matrix[[r, c]] = value;
            }
        }
        Ok(DesignMatrix { matrix, column_names })
    }

    /// Number of coefficients this design implies.
    pub fn n_coefficients(&self) -> usize {
        self.column_names.len()
    }
}
