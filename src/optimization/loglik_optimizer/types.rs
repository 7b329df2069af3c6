//! Shared numeric aliases and solver wiring for the likelihood optimizer.
//!
//! Centralizing these aliases keeps the rest of the optimization code
//! agnostic to `ndarray` and `argmin` generics: parameter vectors, gradients,
//! and Hessians have one canonical spelling, and the L-BFGS solver types are
//! pre-wired to the crate's `(Theta, Grad, Cost)` shapes for each supported
//! line search.
use argmin::solver::{
    linesearch::{HagerZhangLineSearch, MoreThuenteLineSearch},
    quasinewton::LBFGS,
};
use ndarray::{Array1, Array2};
use std::collections::HashMap;

/// Parameter vector `θ` in unconstrained optimizer space.
pub type Theta = Array1<f64>;

/// Gradient vector, matching the shape of [`Theta`].
pub type Grad = Array1<f64>;

/// Dense `n × n` Hessian matrix for `n = theta.len()`.
pub type Hessian = Array2<f64>;

/// Scalar objective value. The solver minimizes the cost `c(θ) = -ℓ(θ)`
/// derived from a log-likelihood `ℓ(θ)`.
pub type Cost = f64;

/// Function-evaluation counters as reported by the solver (e.g.
/// `"cost_count"` → number of objective evaluations).
pub type FnEvalMap = HashMap<String, u64>;

/// Default history size (`m`) for L-BFGS runs.
pub const DEFAULT_LBFGS_MEM: usize = 7;

/// Hager-Zhang line search over the crate's numeric types.
pub type HagerZhangLS = HagerZhangLineSearch<Theta, Grad, Cost>;

/// More-Thuente line search over the crate's numeric types.
pub type MoreThuenteLS = MoreThuenteLineSearch<Theta, Grad, Cost>;

/// L-BFGS wired to the Hager-Zhang line search.
pub type LbfgsHagerZhang = LBFGS<HagerZhangLS, Theta, Grad, Cost>;

/// L-BFGS wired to the More-Thuente line search.
pub type LbfgsMoreThuente = LBFGS<MoreThuenteLS, Theta, Grad, Cost>;
