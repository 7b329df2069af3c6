//! Executor wiring: run an `argmin` solver and normalize its state.
use crate::optimization::{
    errors::OptResult,
    loglik_optimizer::{
        adapter::ArgMinAdapter,
        traits::{LogLikelihood, MLEOptions, OptimOutcome},
        types::{Grad, Theta},
    },
};
use argmin::core::{Executor, State};

/// Run a configured solver on an adapted likelihood problem.
///
/// Shared by both line-search variants: sets the initial parameter vector
/// (consuming `theta0`), applies the iteration cap from `opts`, executes the
/// solver, and converts the final state into an [`OptimOutcome`] — flipping
/// the best cost back to log-likelihood scale.
///
/// # Type parameters
/// - `F`: the model's [`LogLikelihood`] implementation.
/// - `S`: any `argmin` solver over `ArgMinAdapter<'a, F>` with the crate's
///   `(Theta, Grad, f64)` iteration state.
///
/// # Errors
/// - Propagates solver and line-search failures through the crate's
///   `From<argmin::core::Error>` conversion.
/// - Propagates outcome validation failures (missing or non-finite optimum).
pub fn run_lbfgs<'a, F, S>(
    theta0: Theta, opts: &MLEOptions, problem: ArgMinAdapter<'a, F>, solver: S,
) -> OptResult<OptimOutcome>
where
    F: LogLikelihood,
    S: argmin::core::Solver<
            ArgMinAdapter<'a, F>,
            argmin::core::IterState<Theta, Grad, (), (), f64>,
        > + Send
        + 'static,
{
    let mut executor = Executor::new(problem, solver).configure(|state| state.param(theta0));
    if let Some(max_iter) = opts.tols.max_iter {
        executor = executor.configure(|state| state.max_iters(max_iter as u64));
    }

    let mut result = executor.run()?.state().clone();
    let iterations = result.get_iter();
    let fn_evals = result.get_func_counts().clone();
    let termination = result.get_termination_status().clone();
    let grad = result.take_gradient();
    let outcome = OptimOutcome::new(
        result.take_best_param(),
        -result.get_best_cost(),
        termination,
        iterations,
        fn_evals,
        grad,
    )?;
    log::debug!(
        "optimizer finished: status = {}, iterations = {}, value = {:.6}",
        outcome.status,
        outcome.iterations,
        outcome.value
    );
    Ok(outcome)
}
