//! Inverse-link functions for linear-predictor blocks.
//!
//! Each submodel maps its linear predictor `η = Xβ` into model space
//! through an inverse link: probabilities (`psi`, `p`, `r`) use the logit
//! link's inverse, rates (`lambda`) use the log link's inverse. Both are
//! evaluated through the guarded transforms in
//! [`crate::optimization::numerical_stability`] so extreme predictors never
//! produce overflow.
use crate::optimization::numerical_stability::transformations::{safe_exp, safe_logistic};
use ndarray::Array1;

/// Inverse-link selector for a submodel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Link {
    /// Inverse logit: `η ↦ 1 / (1 + exp(-η))`, for probability parameters.
    Logit,
    /// Inverse log: `η ↦ exp(η)`, for rate parameters.
    Log,
}

impl Link {
    /// Apply the inverse link to one linear-predictor value.
    pub fn inverse(&self, eta: f64) -> f64 {
        match self {
            Link::Logit => safe_logistic(eta),
            Link::Log => safe_exp(eta),
        }
    }

    /// Apply the inverse link elementwise.
    pub fn inverse_array(&self, eta: &Array1<f64>) -> Array1<f64> {
        eta.mapv(|x| self.inverse(x))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    // Purpose
    // -------
    // The logit inverse maps 0 to one half and the log inverse maps 0 to 1;
    // the array form agrees with the scalar form.
    //
    // Given
    // -----
    // - η values `[-1, 0, 1]` under both links.
    //
    // Expect
    // ------
    // - Midpoint values at 0 and elementwise agreement.
    fn link_inverse_scalar_and_array_agree() {
        assert!((Link::Logit.inverse(0.0) - 0.5).abs() < 1e-15);
        assert!((Link::Log.inverse(0.0) - 1.0).abs() < 1e-15);

        let eta = array![-1.0, 0.0, 1.0];
        for link in [Link::Logit, Link::Log] {
            let applied = link.inverse_array(&eta);
            for (a, &e) in applied.iter().zip(eta.iter()) {
                assert_eq!(*a, link.inverse(e));
            }
        }
    }
}
