//! Submodel — one linear-predictor block of a detection model.
//!
//! Purpose
//! -------
//! Own everything one parameter group needs: the formula, its realized
//! design matrix, the inverse link, the group-assigned slice of the global
//! parameter vector, and (after fitting) the estimates and covariance block
//! for that slice. Prediction, standard errors, and intervals all read from
//! here.
//!
//! Key behaviors
//! -------------
//! - The design matrix is built once at construction and cached; coefficient
//!   names come from its columns.
//! - `predict` accepts an explicit coefficient vector (used by the
//!   likelihood during optimization) or falls back to stored estimates.
//! - `predict_interval` propagates coefficient covariance into per-row
//!   prediction variance via the delta method, builds a symmetric normal
//!   interval, and optionally maps midpoint and bounds through the inverse
//!   link.
//!
//! Invariants & assumptions
//! ------------------------
//! - `slice.len() == design.n_coefficients()` once the owning group has
//!   assigned slices.
//! - `estimates` and `covariance` are written exactly once per fit by the
//!   group broadcast; every reader checks for their presence and fails with
//!   [`ModelError::NotFitted`] otherwise.
use crate::design::{CovariateFrame, DesignMatrix, Formula};
use crate::detection::core::link::Link;
use crate::detection::errors::{ModelError, ModelResult};
use crate::inference::intervals::{delta_method_se, normal_quantile, symmetric_interval};
use ndarray::{Array1, Array2, ArrayView1};
use std::ops::Range;

/// Normalize a confidence level: percent inputs (`95`) become fractions
/// (`0.95`); the result must land strictly inside `(0, 1)`.
///
/// # Errors
/// [`ModelError::InvalidLevel`] when the normalized value is outside `(0, 1)`
/// or the input exceeds 100.
pub(crate) fn normalize_level(level: f64) -> ModelResult<f64> {
    let normalized = if level > 1.0 { level / 100.0 } else { level };
    if !(normalized > 0.0 && normalized < 1.0) {
        return Err(ModelError::InvalidLevel { level });
    }
    Ok(normalized)
}

/// Point predictions with delta-method interval bounds, aligned to the
/// submodel's design rows.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionIntervals {
    pub estimate: Array1<f64>,
    pub lower: Array1<f64>,
    pub upper: Array1<f64>,
}

/// One row of a coefficient table.
#[derive(Debug, Clone, PartialEq)]
pub struct CoefficientRow {
    /// Short submodel key (e.g. "occ", "det").
    pub model: String,
    /// Coefficient name from the design matrix.
    pub parameter: String,
    pub estimate: f64,
    pub se: f64,
    pub lower: f64,
    pub upper: f64,
}

/// Coefficient rows with a fixed-width `Display` rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct CoefficientTable {
    pub rows: Vec<CoefficientRow>,
}

impl std::fmt::Display for CoefficientTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "{:<6} {:<16} {:>10} {:>10} {:>10} {:>10}",
            "Model", "Parameter", "Estimate", "SE", "lower", "upper"
        )?;
        for row in &self.rows {
            writeln!(
                f,
                "{:<6} {:<16} {:>10.4} {:>10.4} {:>10.4} {:>10.4}",
                row.model, row.parameter, row.estimate, row.se, row.lower, row.upper
            )?;
        }
        Ok(())
    }
}

/// One linear-predictor block: formula, link, cached design, and post-fit
/// state for its slice of the global parameter vector.
#[derive(Debug, Clone, PartialEq)]
pub struct Submodel {
    name: String,
    code: String,
    formula: Formula,
    link: Link,
    design: DesignMatrix,
    slice: Range<usize>,
    estimates: Option<Array1<f64>>,
    covariance: Option<Array2<f64>>,
}

impl Submodel {
    /// Build a submodel: parse the formula, realize the design matrix
    /// against `frame`, and leave the parameter slice for the owning group
    /// to assign.
    ///
    /// # Errors
    /// Propagates formula-syntax and design-construction failures as
    /// [`ModelError::Design`].
    pub fn new(
        name: &str, code: &str, formula: &str, link: Link, frame: &CovariateFrame,
    ) -> ModelResult<Self> {
        let formula = Formula::parse(formula)?;
        let design = DesignMatrix::build(&formula, frame)?;
        Ok(Submodel {
            name: name.to_string(),
            code: code.to_string(),
            formula,
            link,
            design,
            slice: 0..0,
            estimates: None,
            covariance: None,
        })
    }

    /// Human label (e.g. "Occupancy").
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Short key used to tag table rows (e.g. "occ").
    pub fn code(&self) -> &str {
        &self.code
    }

    /// The parsed formula.
    pub fn formula(&self) -> &Formula {
        &self.formula
    }

    /// The inverse link for this block.
    pub fn link(&self) -> Link {
        self.link
    }

    /// The realized design matrix.
    pub fn design(&self) -> &DesignMatrix {
        &self.design
    }

    /// Coefficient names, aligned with design columns.
    pub fn coefficient_names(&self) -> &[String] {
        &self.design.column_names
    }

    /// Number of coefficients in this block.
    pub fn n_coefficients(&self) -> usize {
        self.design.n_coefficients()
    }

    /// This block's half-open range into the global parameter vector.
    pub fn slice(&self) -> Range<usize> {
        self.slice.clone()
    }

    pub(crate) fn set_slice(&mut self, slice: Range<usize>) {
        self.slice = slice;
    }

    /// Store the fitted slice of the global estimates and covariance.
    /// Called once per fit by the owning group's broadcast.
    pub(crate) fn set_fit(&mut self, estimates: Array1<f64>, covariance: Array2<f64>) {
        self.estimates = Some(estimates);
        self.covariance = Some(covariance);
    }

    /// Fitted coefficients for this block.
    ///
    /// # Errors
    /// [`ModelError::NotFitted`] before a successful fit.
    pub fn estimates(&self) -> ModelResult<&Array1<f64>> {
        self.estimates.as_ref().ok_or(ModelError::NotFitted)
    }

    /// Covariance block for this slice.
    ///
    /// # Errors
    /// [`ModelError::NotFitted`] before a successful fit.
    pub fn covariance(&self) -> ModelResult<&Array2<f64>> {
        self.covariance.as_ref().ok_or(ModelError::NotFitted)
    }

    /// Linear predictor `X β` for an explicit coefficient vector.
    ///
    /// # Errors
    /// [`ModelError::CoefficientLengthMismatch`] when `beta` does not match
    /// the design's column count.
    pub fn linear_predictor(&self, beta: ArrayView1<f64>) -> ModelResult<Array1<f64>> {
        if beta.len() != self.n_coefficients() {
            return Err(ModelError::CoefficientLengthMismatch {
                expected: self.n_coefficients(),
                actual: beta.len(),
            });
        }
        Ok(self.design.matrix.dot(&beta))
    }

    /// Point prediction per design row.
    ///
    /// Uses `beta` when supplied (the likelihood path during optimization),
    /// otherwise the stored estimates. `transform` maps the linear predictor
    /// through the inverse link.
    ///
    /// # Errors
    /// - [`ModelError::NotFitted`] when no `beta` is supplied and no
    ///   estimates exist.
    /// - [`ModelError::CoefficientLengthMismatch`] for a wrong-length `beta`.
    pub fn predict(
        &self, beta: Option<&Array1<f64>>, transform: bool,
    ) -> ModelResult<Array1<f64>> {
        let beta = match beta {
            Some(b) => b,
            None => self.estimates()?,
        };
        let lp = self.linear_predictor(beta.view())?;
        Ok(if transform { self.link.inverse_array(&lp) } else { lp })
    }

    /// Delta-method prediction intervals per design row.
    ///
    /// Per-row variance is `x · Σ · xᵀ` with Σ this block's covariance; a
    /// symmetric normal interval at `level` is placed around the linear
    /// predictor, then midpoint and bounds are transformed together when
    /// `transform` is set (the inverse links are monotone, so bound order is
    /// preserved).
    ///
    /// # Errors
    /// - [`ModelError::NotFitted`] before a fit.
    /// - [`ModelError::InvalidLevel`] for an out-of-range level.
    pub fn predict_interval(
        &self, transform: bool, level: f64,
    ) -> ModelResult<PredictionIntervals> {
        let level = normalize_level(level)?;
        let estimates = self.estimates()?;
        let covariance = self.covariance()?;
        let lp = self.linear_predictor(estimates.view())?;

        let mut se = Array1::zeros(lp.len());
        for (r, row) in self.design.matrix.rows().into_iter().enumerate() {
            se[r] = delta_method_se(row, covariance);
        }
        let z = normal_quantile(level);
        let (lower, upper) = symmetric_interval(&lp, &se, z);

        let (estimate, lower, upper) = if transform {
            (
                self.link.inverse_array(&lp),
                self.link.inverse_array(&lower),
                self.link.inverse_array(&upper),
            )
        } else {
            (lp, lower, upper)
        };
        Ok(PredictionIntervals { estimate, lower, upper })
    }

    /// Standard errors: square roots of the covariance diagonal.
    ///
    /// # Errors
    /// [`ModelError::NotFitted`] before a fit.
    pub fn standard_errors(&self) -> ModelResult<Array1<f64>> {
        let covariance = self.covariance()?;
        Ok(covariance.diag().mapv(|v| v.max(0.0).sqrt()))
    }

    /// Symmetric normal confidence interval around the estimates.
    ///
    /// # Errors
    /// [`ModelError::NotFitted`] before a fit; [`ModelError::InvalidLevel`]
    /// for an out-of-range level.
    pub fn confidence_interval(&self, level: f64) -> ModelResult<(Array1<f64>, Array1<f64>)> {
        let level = normalize_level(level)?;
        let estimates = self.estimates()?;
        let se = self.standard_errors()?;
        Ok(symmetric_interval(estimates, &se, normal_quantile(level)))
    }

    /// Coefficient table for this block: name, estimate, SE, and bounds.
    ///
    /// # Errors
    /// As [`Submodel::confidence_interval`].
    pub fn coefficient_table(&self, level: f64) -> ModelResult<CoefficientTable> {
        let (lower, upper) = self.confidence_interval(level)?;
        let estimates = self.estimates()?;
        let se = self.standard_errors()?;
        let rows = self
            .coefficient_names()
            .iter()
            .enumerate()
            .map(|(i, parameter)| CoefficientRow {
                model: self.code.clone(),
                parameter: parameter.clone(),
                estimate: estimates[i],
                se: se[i],
                lower: lower[i],
                upper: upper[i],
            })
            .collect();
        Ok(CoefficientTable { rows })
    }

    /// Rendered block summary: label, formula, and the coefficient table.
    ///
    /// # Errors
    /// As [`Submodel::coefficient_table`].
    pub fn summary(&self, level: f64) -> ModelResult<String> {
        let table = self.coefficient_table(level)?;
        Ok(format!("{}: {}\n{}", self.name, self.formula.source(), table))
    }
}
