//! L-BFGS solver construction.
//!
//! Small builders that hide `argmin`'s generic wiring: pick a line search,
//! apply the L-BFGS memory, and wire any present tolerances from
//! [`MLEOptions`]. Initial parameters and iteration caps are runtime
//! concerns applied by the runner, not here.
use argmin::solver::quasinewton::LBFGS;

use crate::optimization::{
    errors::OptResult,
    loglik_optimizer::{
        traits::MLEOptions,
        types::{
            Cost, Grad, HagerZhangLS, LbfgsHagerZhang, LbfgsMoreThuente, MoreThuenteLS, Theta,
            DEFAULT_LBFGS_MEM,
        },
    },
};

/// Construct L-BFGS with a Hager-Zhang line search.
///
/// Consults `opts.lbfgs_mem` (falling back to [`DEFAULT_LBFGS_MEM`]) and
/// wires `opts.tols` through [`configure_lbfgs`].
///
/// # Errors
/// Propagates `argmin` rejections of the tolerance settings.
pub fn build_optimizer_hager_zhang(opts: &MLEOptions) -> OptResult<LbfgsHagerZhang> {
    let mem = opts.lbfgs_mem.unwrap_or(DEFAULT_LBFGS_MEM);
    configure_lbfgs(LbfgsHagerZhang::new(HagerZhangLS::new(), mem), opts)
}

/// Construct L-BFGS with a More-Thuente line search.
///
/// Consults `opts.lbfgs_mem` (falling back to [`DEFAULT_LBFGS_MEM`]) and
/// wires `opts.tols` through [`configure_lbfgs`].
///
/// # Errors
/// Propagates `argmin` rejections of the tolerance settings.
pub fn build_optimizer_more_thuente(opts: &MLEOptions) -> OptResult<LbfgsMoreThuente> {
    let mem = opts.lbfgs_mem.unwrap_or(DEFAULT_LBFGS_MEM);
    configure_lbfgs(LbfgsMoreThuente::new(MoreThuenteLS::new(), mem), opts)
}

/// Apply present tolerances to an L-BFGS solver, regardless of line-search
/// type. Absent tolerances leave `argmin`'s defaults in effect.
///
/// # Errors
/// Propagates `argmin` rejections from `with_tolerance_grad` /
/// `with_tolerance_cost`.
pub fn configure_lbfgs<L>(
    mut solver: LBFGS<L, Theta, Grad, Cost>, opts: &MLEOptions,
) -> OptResult<LBFGS<L, Theta, Grad, Cost>> {
    if let Some(g) = opts.tols.tol_grad {
        solver = solver.with_tolerance_grad(g)?;
    }
    if let Some(c) = opts.tols.tol_cost {
        solver = solver.with_tolerance_cost(c)?;
    }
    Ok(solver)
}
