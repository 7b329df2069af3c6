//! High-level entry point for maximizing a [`LogLikelihood`].
use crate::optimization::{
    errors::OptResult,
    loglik_optimizer::{
        adapter::ArgMinAdapter,
        builders::{build_optimizer_hager_zhang, build_optimizer_more_thuente},
        run::run_lbfgs,
        traits::{LineSearcher, LogLikelihood, MLEOptions, OptimOutcome},
        types::Theta,
    },
};

/// Maximize `ℓ(θ)` with L-BFGS and the configured line search.
///
/// # Behavior
/// - Validates the initial guess via `f.check(theta0, data)`.
/// - Wraps `(f, data)` in an [`ArgMinAdapter`], which presents the
///   minimization problem `c(θ) = -ℓ(θ)` to the solver.
/// - Builds an L-BFGS solver for the line search chosen in
///   `opts.line_searcher` and delegates execution to `run_lbfgs`.
///
/// # Parameters
/// - `f`: the model implementing [`LogLikelihood`].
/// - `theta0`: initial parameter vector (consumed by the executor).
/// - `data`: model data threaded into every evaluation.
/// - `opts`: tolerances, line-search choice, and L-BFGS memory.
///
/// # Returns
/// An [`OptimOutcome`] with `theta_hat`, the best log-likelihood value,
/// termination status, and evaluation counters.
///
/// # Errors
/// Propagates failures from `check`, solver construction, and the run
/// itself. A run that stops without converging is **not** an error: the
/// outcome's `converged` flag carries that information.
pub fn maximize<F: LogLikelihood>(
    f: &F, theta0: Theta, data: &F::Data, opts: &MLEOptions,
) -> OptResult<OptimOutcome> {
    f.check(&theta0, data)?;
    let problem = ArgMinAdapter::new(f, data);
    match opts.line_searcher {
        LineSearcher::MoreThuente => {
            let solver = build_optimizer_more_thuente(opts)?;
            run_lbfgs(theta0, opts, problem, solver)
        }
        LineSearcher::HagerZhang => {
            let solver = build_optimizer_hager_zhang(opts)?;
            run_lbfgs(theta0, opts, problem, solver)
        }
    }
}
