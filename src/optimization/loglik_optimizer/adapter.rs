//! Adapter exposing a [`LogLikelihood`] as an `argmin` problem.
//!
//! Maximization of `ℓ(θ)` becomes minimization of the cost `c(θ) = -ℓ(θ)`.
//! Analytic gradients, when a model provides them, are negated to match.
//! When no analytic gradient exists (the detection families), the gradient
//! is finite-differenced from the **cost** closure directly, so no sign flip
//! is needed on that branch.
use std::cell::RefCell;

use crate::optimization::{
    errors::OptError,
    loglik_optimizer::{
        finite_diff::run_fd_diff,
        traits::LogLikelihood,
        types::{Cost, Grad, Theta},
        validation::validate_grad,
    },
};
use argmin::core::{CostFunction, Error, Gradient};
use finitediff::FiniteDiff;

/// Bridges a [`LogLikelihood`] and its data to `argmin`'s `CostFunction` and
/// `Gradient` traits.
#[derive(Debug, Clone)]
pub struct ArgMinAdapter<'a, F: LogLikelihood> {
    pub f: &'a F,
    pub data: &'a F::Data,
}

impl<'a, F: LogLikelihood> ArgMinAdapter<'a, F> {
    /// Wrap a model and its data for a solver run.
    pub fn new(f: &'a F, data: &'a F::Data) -> Self {
        Self { f, data }
    }
}

impl<'a, F: LogLikelihood> CostFunction for ArgMinAdapter<'a, F> {
    type Param = Theta;
    type Output = Cost;

    /// Evaluate the cost `c(θ) = -ℓ(θ)`, rejecting non-finite values.
    ///
    /// # Errors
    /// Propagates model errors from `value`; returns
    /// [`OptError::NonFiniteCost`] when `ℓ(θ)` is NaN or ±inf.
    fn cost(&self, theta: &Self::Param) -> Result<Self::Output, Error> {
        let value = self.f.value(theta, self.data)?;
        if !value.is_finite() {
            return Err(OptError::NonFiniteCost { value }.into());
        }
        Ok(-value)
    }
}

impl<'a, F: LogLikelihood> Gradient for ArgMinAdapter<'a, F> {
    type Param = Theta;
    type Gradient = Grad;

    /// Evaluate the cost gradient at `θ`.
    ///
    /// - With an analytic model gradient: validate it and return `-∇ℓ(θ)`.
    /// - Without one ([`OptError::GradientNotImplemented`]): finite-difference
    ///   the cost — central differences first; if the closure raised an error
    ///   or the result fails validation, retry once with forward differences
    ///   via [`run_fd_diff`].
    ///
    /// # Errors
    /// - Model errors from `grad` other than `GradientNotImplemented`.
    /// - Errors raised by cost evaluations inside the FD sweep.
    /// - Gradient validation failures surviving the forward-difference retry.
    fn gradient(&self, theta: &Self::Param) -> Result<Self::Gradient, Error> {
        let dim = theta.len();
        match self.f.grad(theta, self.data) {
            Ok(g) => {
                validate_grad(&g, dim)?;
                Ok(-g)
            }
            Err(OptError::GradientNotImplemented) => {
                let closure_err: RefCell<Option<Error>> = RefCell::new(None);
                let cost_fn = |t: &Theta| -> f64 {
                    match self.cost(t) {
                        Ok(c) => c,
                        Err(e) => {
                            let mut slot = closure_err.borrow_mut();
                            if slot.is_none() {
                                *slot = Some(e);
                            }
                            f64::NAN
                        }
                    }
                };
                let central = theta.central_diff(&cost_fn);
                if closure_err.borrow().is_none() && validate_grad(&central, dim).is_ok() {
                    return Ok(central);
                }
                Ok(run_fd_diff(theta, &cost_fn, &closure_err)?)
            }
            Err(other) => Err(other.into()),
        }
    }
}
