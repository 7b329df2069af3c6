//! Covariance estimation from observed information.
//!
//! Purpose
//! -------
//! Turn the curvature of the negative log-likelihood at the optimum into an
//! asymptotic covariance matrix for the parameter estimates. The observed
//! information `J(θ̂)` is built from a finite-difference Hessian of the NLL
//! gradient map, then pseudoinverted by symmetric eigendecomposition with
//! eigenvalue truncation: `Σ = Σ_{k: λ_k > EIGEN_EPS} λ_k⁻¹ q_k q_kᵀ`.
//!
//! Key behaviors
//! -------------
//! - No explicit matrix inverse is formed; near-zero and negative
//!   eigenvalues are excluded, which inflates reported uncertainty along
//!   weakly identified directions instead of dividing by numerical noise.
//! - Bridges `ndarray` (crate-wide matrix type) and `nalgebra` (symmetric
//!   eigendecomposition) with a single column-major copy each way.
//!
//! Conventions
//! -----------
//! - The Hessian is taken of the **negative** log-likelihood, so `J(θ̂)` is
//!   positive (semi-)definite at a regular optimum and `Σ = J⁺` is the
//!   covariance proxy the submodels slice into blocks.
//!
//! Downstream usage
//! ----------------
//! - `DetectionModel::fit` calls [`covariance_matrix`] at `θ̂` and
//!   broadcasts the result into per-submodel blocks; the delta method in
//!   `Submodel::predict_interval` consumes those blocks.
use crate::optimization::{
    errors::OptResult,
    loglik_optimizer::{
        finite_diff::compute_hessian,
        types::{Grad, Theta},
    },
    numerical_stability::transformations::EIGEN_EPS,
};
use nalgebra::DMatrix;
use ndarray::Array2;

/// Asymptotic covariance matrix at the optimum.
///
/// # Parameters
/// - `f`: gradient map of the negative log-likelihood, `θ ↦ ∇NLL(θ)`
///   (typically itself a finite-difference gradient). Must be C¹ near
///   `theta_hat` so the FD Hessian is well defined.
/// - `theta_hat`: parameter vector at which curvature is evaluated; its
///   length fixes the dimension of the returned matrix.
///
/// # Returns
/// The `n × n` Moore-Penrose pseudoinverse of the observed information,
/// symmetric by construction.
///
/// # Errors
/// Propagates Hessian validation failures from
/// [`compute_hessian`] (shape mismatch, non-finite entries).
pub fn covariance_matrix<F: Fn(&Theta) -> Grad>(
    f: &F, theta_hat: &Theta,
) -> OptResult<Array2<f64>> {
    let n = theta_hat.len();
    let obs_info = compute_hessian(f, theta_hat)?;

    let mut info = DMatrix::<f64>::zeros(n, n);
    for j in 0..n {
        for i in 0..n {
            info[(i, j)] = obs_info[[i, j]];
        }
    }

    let eigen = info.symmetric_eigen();
    let q = eigen.eigenvectors;
    let lambda = eigen.eigenvalues;

    let mut cov = Array2::<f64>::zeros((n, n));
    for (k, &lam) in lambda.iter().enumerate() {
        if lam <= EIGEN_EPS {
            continue;
        }
        let inv = 1.0 / lam;
        for i in 0..n {
            let qi = q[(i, k)];
            for j in 0..=i {
                let term = inv * qi * q[(j, k)];
                cov[[i, j]] += term;
                if i != j {
                    cov[[j, i]] += term;
                }
            }
        }
    }
    Ok(cov)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Agreement with the analytic inverse for a diagonal quadratic.
    // - Symmetry of the returned matrix for a coupled quadratic.
    // - Truncation behavior for a singular information matrix.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // For `NLL(θ) = ½ θᵀ A θ` with diagonal A, the covariance is `A⁻¹`.
    //
    // Given
    // -----
    // - Gradient map `g(θ) = A θ` with `A = diag(4, 1)`.
    //
    // Expect
    // ------
    // - `Σ ≈ diag(0.25, 1.0)` with vanishing off-diagonals.
    fn covariance_matches_analytic_inverse_for_diagonal_quadratic() {
        let a = array![[4.0, 0.0], [0.0, 1.0]];
        let f = |theta: &Theta| a.dot(theta);
        let theta_hat = array![0.3, -0.7];

        let cov = covariance_matrix(&f, &theta_hat).expect("quadratic covariance");

        assert!((cov[[0, 0]] - 0.25).abs() < 1e-6);
        assert!((cov[[1, 1]] - 1.0).abs() < 1e-6);
        assert!(cov[[0, 1]].abs() < 1e-6);
        assert!(cov[[1, 0]].abs() < 1e-6);
    }

    #[test]
    // Purpose
    // -------
    // A coupled quadratic produces a symmetric covariance matching the
    // analytic 2×2 inverse.
    //
    // Given
    // -----
    // - `A = [[2, 0.5], [0.5, 1]]`, inverse `[[4/7, -2/7], [-2/7, 8/7]]`.
    //
    // Expect
    // ------
    // - Entrywise agreement within 1e-6 and exact symmetry of the result.
    fn covariance_is_symmetric_for_coupled_quadratic() {
        let a = array![[2.0, 0.5], [0.5, 1.0]];
        let f = |theta: &Theta| a.dot(theta);
        let theta_hat = array![1.0, 1.0];

        let cov = covariance_matrix(&f, &theta_hat).expect("coupled covariance");

        assert!((cov[[0, 0]] - 4.0 / 7.0).abs() < 1e-6);
        assert!((cov[[1, 1]] - 8.0 / 7.0).abs() < 1e-6);
        assert!((cov[[0, 1]] + 2.0 / 7.0).abs() < 1e-6);
        assert_eq!(cov[[0, 1]], cov[[1, 0]]);
    }

    #[test]
    // Purpose
    // -------
    // A singular information matrix does not blow up: the flat direction is
    // truncated and contributes zero variance rather than `1/0`.
    //
    // Given
    // -----
    // - `A = diag(1, 0)` — the second parameter is unidentified.
    //
    // Expect
    // ------
    // - `Σ[0,0] ≈ 1`, `Σ[1,1] ≈ 0`, all entries finite.
    fn covariance_truncates_flat_directions() {
        let a = array![[1.0, 0.0], [0.0, 0.0]];
        let f = |theta: &Theta| a.dot(theta);
        let theta_hat = array![0.0, 0.0];

        let cov = covariance_matrix(&f, &theta_hat).expect("singular covariance");

        assert!(cov.iter().all(|v| v.is_finite()));
        assert!((cov[[0, 0]] - 1.0).abs() < 1e-6);
        assert!(cov[[1, 1]].abs() < 1e-6);
    }
}
