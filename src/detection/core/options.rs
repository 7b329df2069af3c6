//! Model options — estimation and simulation configuration.
//!
//! Purpose
//! -------
//! Collect the tuning knobs for fitting and simulating detection models in
//! one place, so call sites pass explicit configuration instead of ad-hoc
//! flags. The gradient tolerance is deliberately *not* part of
//! [`FitOptions`]: its default scales with the sample size
//! (`1e-6 × n_sites`) and is resolved inside `fit`.
//!
//! Invariants & assumptions
//! ------------------------
//! - `FitOptions` fields are validated where they are consumed
//!   (`Tolerances::new` / `MLEOptions::new`); this module only carries
//!   intent.
//! - Simulation is reproducible by default: `SimOptions::default()` seeds
//!   the RNG with 42. `seed: None` delegates to system entropy.
use crate::optimization::loglik_optimizer::LineSearcher;

/// Estimation-time configuration for a detection model.
///
/// - `max_iter`: hard iteration cap for the optimizer.
/// - `line_searcher`: line-search algorithm used inside L-BFGS.
/// - `lbfgs_mem`: optional history size; `None` uses the optimizer default.
#[derive(Debug, Clone, PartialEq)]
pub struct FitOptions {
    pub max_iter: usize,
    pub line_searcher: LineSearcher,
    pub lbfgs_mem: Option<usize>,
}

impl Default for FitOptions {
    fn default() -> Self {
        FitOptions {
            max_iter: 300,
            line_searcher: LineSearcher::MoreThuente,
            lbfgs_mem: None,
        }
    }
}

/// Simulation-time configuration.
///
/// - `seed`: RNG seed; `Some(seed)` yields reproducible draws, `None`
///   delegates to system entropy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimOptions {
    pub seed: Option<u64>,
}

impl Default for SimOptions {
    fn default() -> Self {
        SimOptions { seed: Some(42) }
    }
}
