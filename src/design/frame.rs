//! Covariate containers for detection models.
//!
//! Purpose
//! -------
//! Provide small, validated tabular containers for model covariates: a named
//! column table ([`CovariateFrame`]) and the bundled model input
//! ([`UnmarkedFrame`]) combining an observation matrix with site-level and
//! observation-level covariates.
//!
//! Key behaviors
//! -------------
//! - [`CovariateFrame`] enforces equal column lengths, unique names, and
//!   finite values at construction.
//! - [`UnmarkedFrame`] checks that site covariates have one row per site and
//!   observation covariates one row per site-visit (visit-major per site).
//!
//! Invariants & assumptions
//! ------------------------
//! - Column order is insertion order and is stable; formula evaluation never
//!   depends on map iteration.
//! - A frame may hold zero columns while still carrying a row count, so
//!   intercept-only formulas (`~1`) evaluate against covariate-free data.
//!
//! Downstream usage
//! ----------------
//! - [`crate::design::formula::DesignMatrix::build`] resolves formula terms
//!   against a `CovariateFrame` by column name.
//! - Model constructors take an [`UnmarkedFrame`] and split it into the
//!   response and the per-submodel covariate tables.
use crate::design::errors::{DesignError, DesignResult};
use ndarray::{Array1, Array2};

/// Named numeric columns of equal length.
///
/// Columns are stored in insertion order; lookups are by name. The row count
/// is fixed at construction and may describe a frame with no columns at all
/// (used by intercept-only formulas).
#[derive(Debug, Clone, PartialEq)]
pub struct CovariateFrame {
    n_rows: usize,
    columns: Vec<(String, Array1<f64>)>,
}

impl CovariateFrame {
    /// Construct a validated frame from `(name, column)` pairs.
    ///
    /// # Errors
    /// - [`DesignError::DuplicateColumn`] if two columns share a name.
    /// - [`DesignError::ColumnLengthMismatch`] if any column length differs
    ///   from `n_rows`.
    /// - [`DesignError::NonFiniteCovariate`] at the first NaN/±inf entry.
    pub fn new(n_rows: usize, columns: Vec<(String, Array1<f64>)>) -> DesignResult<Self> {
        for (i, (name, col)) in columns.iter().enumerate() {
            if columns[..i].iter().any(|(other, _)| other == name) {
                return Err(DesignError::DuplicateColumn { name: name.clone() });
            }
            if col.len() != n_rows {
                return Err(DesignError::ColumnLengthMismatch {
                    name: name.clone(),
                    expected: n_rows,
                    actual: col.len(),
                });
            }
            for (row, &value) in col.iter().enumerate() {
                if !value.is_finite() {
                    return Err(DesignError::NonFiniteCovariate {
                        name: name.clone(),
                        row,
                        value,
                    });
                }
            }
        }
        Ok(CovariateFrame { n_rows, columns })
    }

    /// Frame with no columns, only a row count. Intercept-only formulas
    /// evaluate against this.
    pub fn empty(n_rows: usize) -> Self {
        CovariateFrame { n_rows, columns: Vec::new() }
    }

    /// Number of rows shared by every column.
    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    /// Look up a column by name.
    pub fn column(&self, name: &str) -> Option<&Array1<f64>> {
        self.columns.iter().find(|(n, _)| n == name).map(|(_, c)| c)
    }
}

/// Bundled model input: observation matrix plus covariate tables.
///
/// `y` is the N×J observation matrix, `site_covs` has one row per site and
/// `obs_covs` one row per site-visit, laid out visit-major per site (row
/// `i * J + j` belongs to site `i`, visit `j`).
#[derive(Debug, Clone, PartialEq)]
pub struct UnmarkedFrame {
    /// N×J observations (counts or detection indicators).
    pub y: Array2<f64>,
    /// Site-level covariates (N rows).
    pub site_covs: CovariateFrame,
    /// Observation-level covariates (N·J rows, visit-major per site).
    pub obs_covs: CovariateFrame,
}

impl UnmarkedFrame {
    /// Bundle an observation matrix with its covariate tables.
    ///
    /// Validation of `y` itself (non-negative integers, finiteness) belongs
    /// to the response layer; this constructor only checks row-count
    /// consistency between the three parts.
    ///
    /// # Errors
    /// - [`DesignError::SiteRowMismatch`] if `site_covs.n_rows() != N`.
    /// - [`DesignError::ObsRowMismatch`] if `obs_covs.n_rows() != N·J`.
    pub fn new(
        y: Array2<f64>, site_covs: CovariateFrame, obs_covs: CovariateFrame,
    ) -> DesignResult<Self> {
        let (n, j) = y.dim();
        if site_covs.n_rows() != n {
            return Err(DesignError::SiteRowMismatch {
                expected: n,
                actual: site_covs.n_rows(),
            });
        }
        if obs_covs.n_rows() != n * j {
            return Err(DesignError::ObsRowMismatch {
                expected: n * j,
                actual: obs_covs.n_rows(),
            });
        }
        Ok(UnmarkedFrame { y, site_covs, obs_covs })
    }
}
