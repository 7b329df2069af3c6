//! Validation helpers for likelihood optimization.
//!
//! Consistency checks shared across the optimizer interface:
//!
//! - **Tolerances**: [`verify_tol_grad`], [`verify_tol_cost`] require finite,
//!   strictly positive values when present.
//! - **Gradients**: [`validate_grad`] enforces matching dimension and finite
//!   entries.
//! - **Hessians**: [`validate_hessian`] enforces square shape and finite
//!   entries.
//! - **Estimates**: [`validate_theta_hat`] requires a present, all-finite
//!   parameter vector; [`validate_value`] requires a finite objective.
//!
//! Each helper reports failures through a specific [`OptError`] variant so
//! higher layers can match on the cause.
use crate::optimization::{
    errors::{OptError, OptResult},
    loglik_optimizer::types::{Grad, Hessian, Theta},
};

/// Validate the optional gradient-norm tolerance.
///
/// `None` disables the gradient stopping rule. A present value must be
/// finite and strictly positive.
///
/// # Errors
/// [`OptError::InvalidTolGrad`] for a non-finite or non-positive value.
pub fn verify_tol_grad(tol: Option<f64>) -> OptResult<()> {
    if let Some(tol) = tol {
        if !tol.is_finite() {
            return Err(OptError::InvalidTolGrad { tol, reason: "Tolerance must be finite." });
        }
        if tol <= 0.0 {
            return Err(OptError::InvalidTolGrad { tol, reason: "Tolerance must be positive." });
        }
    }
    Ok(())
}

/// Validate the optional cost-change tolerance.
///
/// `None` disables the cost-change stopping rule. A present value must be
/// finite and strictly positive.
///
/// # Errors
/// [`OptError::InvalidTolCost`] for a non-finite or non-positive value.
pub fn verify_tol_cost(tol: Option<f64>) -> OptResult<()> {
    if let Some(tol) = tol {
        if !tol.is_finite() {
            return Err(OptError::InvalidTolCost { tol, reason: "Tolerance must be finite." });
        }
        if tol <= 0.0 {
            return Err(OptError::InvalidTolCost { tol, reason: "Tolerance must be positive." });
        }
    }
    Ok(())
}

/// Validate a gradient against its expected dimension and finiteness.
///
/// # Errors
/// - [`OptError::GradientDimMismatch`] if `grad.len() != dim`.
/// - [`OptError::InvalidGradient`] at the first NaN/±inf entry.
pub fn validate_grad(grad: &Grad, dim: usize) -> OptResult<()> {
    if grad.len() != dim {
        return Err(OptError::GradientDimMismatch { expected: dim, found: grad.len() });
    }
    for (index, &value) in grad.iter().enumerate() {
        if !value.is_finite() {
            return Err(OptError::InvalidGradient {
                index,
                value,
                reason: "Gradient elements must be finite.",
            });
        }
    }
    Ok(())
}

/// Validate a Hessian against its expected dimension and finiteness.
///
/// # Errors
/// - [`OptError::HessianDimMismatch`] if the matrix is not `dim × dim`.
/// - [`OptError::InvalidHessian`] at the first NaN/±inf entry.
pub fn validate_hessian(hess: &Hessian, dim: usize) -> OptResult<()> {
    if hess.nrows() != dim || hess.ncols() != dim {
        return Err(OptError::HessianDimMismatch {
            expected: dim,
            found: (hess.nrows(), hess.ncols()),
        });
    }
    for ((row, col), &value) in hess.indexed_iter() {
        if !value.is_finite() {
            return Err(OptError::InvalidHessian { row, col, value });
        }
    }
    Ok(())
}

/// Validate and unwrap an estimated parameter vector.
///
/// # Returns
/// The owned `Theta` when present with all-finite entries.
///
/// # Errors
/// - [`OptError::MissingThetaHat`] if no vector was produced.
/// - [`OptError::InvalidThetaHat`] at the first non-finite element.
pub fn validate_theta_hat(theta_hat: Option<Theta>) -> OptResult<Theta> {
    match theta_hat {
        Some(t) => {
            for (index, &value) in t.iter().enumerate() {
                if !value.is_finite() {
                    return Err(OptError::InvalidThetaHat {
                        index,
                        value,
                        reason: "Parameter estimates must be finite.",
                    });
                }
            }
            Ok(t)
        }
        None => Err(OptError::MissingThetaHat),
    }
}

/// Validate that a scalar objective value is finite.
///
/// # Errors
/// [`OptError::NonFiniteCost`] for NaN or ±inf.
pub fn validate_value(value: f64) -> OptResult<()> {
    if !value.is_finite() {
        return Err(OptError::NonFiniteCost { value });
    }
    Ok(())
}
