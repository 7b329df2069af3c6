//! Finite-difference gradient and Hessian helpers.
//!
//! Purpose
//! -------
//! Wrap the `finitediff` routines with error capture, validation, and
//! symmetry cleanup so the rest of the optimizer can request derivatives
//! without touching the FD API directly. The detection families provide no
//! analytic gradients, so everything second-order in this crate flows
//! through here.
//!
//! Key behaviors
//! -------------
//! - [`run_fd_diff`] computes a forward-difference gradient of a scalar
//!   objective, surfacing any error the objective raised mid-sweep.
//! - [`compute_hessian`] builds a central-difference Hessian of a gradient
//!   map, falling back to forward differences when validation fails, and
//!   symmetrizes the result in place.
//!
//! Conventions
//! -----------
//! - FD closures cannot return `Result`, so objectives route their first
//!   error into a shared `RefCell` slot and return `NaN`; the helpers turn
//!   the captured error back into a real `Err` afterwards.
//! - Returned gradients and Hessians always satisfy [`validate_grad`] /
//!   [`validate_hessian`] on the path that produced them.
use crate::optimization::{
    errors::OptResult,
    loglik_optimizer::{
        types::{Grad, Hessian, Theta},
        validation::{validate_grad, validate_hessian},
    },
};
use argmin::core::Error;
use finitediff::FiniteDiff;
use std::cell::RefCell;

/// Forward-difference gradient with error capture and validation.
///
/// Clears `closure_err`, sweeps `func` with forward differences, then:
/// returns any error the closure captured, validates the gradient, and
/// hands it back.
///
/// # Errors
/// - Any error captured in `closure_err` during the sweep (converted from
///   the argmin error type).
/// - [`crate::optimization::errors::OptError::GradientDimMismatch`] /
///   [`crate::optimization::errors::OptError::InvalidGradient`] from
///   validation.
pub fn run_fd_diff<G: Fn(&Theta) -> f64>(
    theta: &Theta, func: &G, closure_err: &RefCell<Option<Error>>,
) -> OptResult<Grad> {
    closure_err.replace(None);
    let fd_grad = theta.forward_diff(func);
    if let Some(err) = closure_err.take() {
        return Err(err.into());
    }
    validate_grad(&fd_grad, theta.len())?;
    Ok(fd_grad)
}

/// Finite-difference Hessian of a gradient map, validated and symmetrized.
///
/// Tries a central-difference Hessian first; if that fails validation
/// (shape or finiteness), retries with forward differences and surfaces the
/// forward-path validation result. The accepted matrix has each
/// off-diagonal pair replaced by its average.
///
/// # Errors
/// - [`crate::optimization::errors::OptError::HessianDimMismatch`] /
///   [`crate::optimization::errors::OptError::InvalidHessian`] when the
///   forward-difference fallback also fails validation.
pub fn compute_hessian<F: Fn(&Theta) -> Grad>(f: &F, theta: &Theta) -> OptResult<Hessian> {
    let dim = theta.len();
    let mut hess = theta.central_hessian(f);
    if validate_hessian(&hess, dim).is_err() {
        hess = theta.forward_hessian(f);
        validate_hessian(&hess, dim)?;
    }
    symmetrize(&mut hess);
    Ok(hess)
}

/// Replace each off-diagonal pair with its average, in place. The diagonal
/// is untouched.
fn symmetrize(hess: &mut Hessian) {
    for i in 0..hess.nrows() {
        for j in 0..i {
            let avg = 0.5 * (hess[[i, j]] + hess[[j, i]]);
            hess[[i, j]] = avg;
            hess[[j, i]] = avg;
        }
    }
}
