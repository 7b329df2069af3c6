//! Observation container for detection models.
//!
//! Purpose
//! -------
//! Hold the validated N×J observation matrix shared by every model family
//! and derive the per-site minimum feasible latent state. This centralizes
//! input checking so likelihood code can assume clean counts.
//!
//! Key behaviors
//! -------------
//! - [`Response::new`] enforces non-emptiness and finite, non-negative,
//!   integer-valued entries in a single pass.
//! - `kmin[i] = max_j y[i, j]` is computed once at construction: a site
//!   observed with count `k` must have had at least `k` individuals present,
//!   so the latent-state marginalization never needs to start below it.
//!
//! Invariants & assumptions
//! ------------------------
//! - `y` has at least one site and one visit.
//! - All entries are finite, `>= 0`, and integral (stored as `f64`).
//! - The container is immutable after construction.
use crate::detection::errors::{ModelError, ModelResult};
use ndarray::{Array1, Array2};

/// Validated N×J observations plus the derived per-site row maximum.
///
/// `y[i, j]` is the count (or 0/1 detection indicator) recorded at site `i`
/// on visit `j`. `kmin[i]` is the row maximum — the smallest latent
/// abundance/occupancy state consistent with what was observed at site `i`.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    y: Array2<f64>,
    kmin: Array1<f64>,
}

impl Response {
    /// Construct a validated [`Response`] from raw observations.
    ///
    /// # Errors
    /// - [`ModelError::EmptyResponse`] for a matrix with zero sites or
    ///   zero visits.
    /// - [`ModelError::NonFiniteObservation`] /
    ///   [`ModelError::NegativeObservation`] /
    ///   [`ModelError::NonIntegerObservation`] at the first offending cell.
    pub fn new(y: Array2<f64>) -> ModelResult<Self> {
        let (n, j) = y.dim();
        if n == 0 || j == 0 {
            return Err(ModelError::EmptyResponse);
        }
        for ((site, visit), &value) in y.indexed_iter() {
            if !value.is_finite() {
                return Err(ModelError::NonFiniteObservation { site, visit, value });
            }
            if value < 0.0 {
                return Err(ModelError::NegativeObservation { site, visit, value });
            }
            if value.fract() != 0.0 {
                return Err(ModelError::NonIntegerObservation { site, visit, value });
            }
        }
        let kmin = y.map_axis(ndarray::Axis(1), |row| {
            row.iter().cloned().fold(0.0_f64, f64::max)
        });
        Ok(Response { y, kmin })
    }

    /// The observation matrix.
    pub fn y(&self) -> &Array2<f64> {
        &self.y
    }

    /// Per-site minimum feasible latent state (row maxima of `y`).
    pub fn kmin(&self) -> &Array1<f64> {
        &self.kmin
    }

    /// Number of sites (rows).
    pub fn n_sites(&self) -> usize {
        self.y.nrows()
    }

    /// Number of repeat visits (columns).
    pub fn n_visits(&self) -> usize {
        self.y.ncols()
    }
}
