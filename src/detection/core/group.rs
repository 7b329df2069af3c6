//! SubmodelGroup — the ordered pair of linear-predictor blocks.
//!
//! Purpose
//! -------
//! Fix the layout of the global parameter vector. Every model family owns
//! exactly two submodels — the latent-state block and the detection block —
//! and the group assigns each a contiguous, disjoint slice at construction:
//! state coefficients first, detection coefficients second. The optimizer
//! works on the flattened vector; the group broadcasts fitted results back
//! into the blocks.
//!
//! Invariants & assumptions
//! ------------------------
//! - Concatenating the two slices in order reconstructs
//!   `[0, n_parameters())` exactly once, with no gaps or overlap.
//! - Ordering is positional (a fixed pair), never dependent on map
//!   iteration, so the parameter layout is deterministic across runs.
use crate::detection::core::submodel::{CoefficientTable, Submodel};
use crate::detection::errors::{ModelError, ModelResult};
use ndarray::{s, Array1, Array2};

/// Which block a submodel occupies within its group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmodelKind {
    /// The latent-state block (occupancy probability or abundance rate).
    State,
    /// The detection block.
    Detection,
}

/// Ordered pair of submodels with an assigned parameter layout.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmodelGroup {
    state: Submodel,
    detection: Submodel,
}

impl SubmodelGroup {
    /// Assemble the group and assign parameter slices: the state block gets
    /// `[0, p_state)`, the detection block `[p_state, p_state + p_det)`.
    pub fn new(mut state: Submodel, mut detection: Submodel) -> Self {
        let split = state.n_coefficients();
        state.set_slice(0..split);
        detection.set_slice(split..split + detection.n_coefficients());
        SubmodelGroup { state, detection }
    }

    /// Borrow a block by kind.
    pub fn get(&self, kind: SubmodelKind) -> &Submodel {
        match kind {
            SubmodelKind::State => &self.state,
            SubmodelKind::Detection => &self.detection,
        }
    }

    /// Blocks in parameter-layout order (state, then detection).
    pub fn iter(&self) -> impl Iterator<Item = &Submodel> {
        [&self.state, &self.detection].into_iter()
    }

    /// Total number of parameters across both blocks.
    pub fn n_parameters(&self) -> usize {
        self.state.n_coefficients() + self.detection.n_coefficients()
    }

    /// Validate a global parameter vector's length against the layout.
    ///
    /// # Errors
    /// [`ModelError::ParameterLengthMismatch`] on any difference.
    pub fn check_parameter_length(&self, theta: &Array1<f64>) -> ModelResult<()> {
        if theta.len() != self.n_parameters() {
            return Err(ModelError::ParameterLengthMismatch {
                expected: self.n_parameters(),
                actual: theta.len(),
            });
        }
        Ok(())
    }

    /// Broadcast a fitted global parameter vector and full covariance matrix
    /// into each block's slice (its coefficient sub-vector and the square
    /// covariance sub-block).
    ///
    /// # Errors
    /// [`ModelError::ParameterLengthMismatch`] when `theta` does not match
    /// the layout. The covariance matrix is produced from `theta` by the
    /// fitting path and shares its dimension.
    pub fn store_fit(&mut self, theta: &Array1<f64>, covariance: &Array2<f64>) -> ModelResult<()> {
        self.check_parameter_length(theta)?;
        for block in [&mut self.state, &mut self.detection] {
            let slice = block.slice();
            let estimates = theta.slice(s![slice.clone()]).to_owned();
            let cov_block =
                covariance.slice(s![slice.clone(), slice.clone()]).to_owned();
            block.set_fit(estimates, cov_block);
        }
        Ok(())
    }

    /// Concatenated coefficient tables, state block first.
    ///
    /// # Errors
    /// [`ModelError::NotFitted`] before a fit.
    pub fn coefficient_table(&self, level: f64) -> ModelResult<CoefficientTable> {
        let mut rows = Vec::with_capacity(self.n_parameters());
        for block in self.iter() {
            rows.extend(block.coefficient_table(level)?.rows);
        }
        Ok(CoefficientTable { rows })
    }

    /// Rendered per-block summaries separated by blank lines.
    ///
    /// # Errors
    /// [`ModelError::NotFitted`] before a fit.
    pub fn summary(&self, level: f64) -> ModelResult<String> {
        let mut parts = Vec::with_capacity(2);
        for block in self.iter() {
            parts.push(block.summary(level)?);
        }
        Ok(parts.join("\n"))
    }
}
