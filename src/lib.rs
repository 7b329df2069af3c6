//! rust_unmarked — hierarchical detection-correction models for ecology.
//!
//! Purpose
//! -------
//! Estimate occupancy, N-mixture, and Royle-Nichols models by maximum
//! likelihood: observed counts or detection/non-detection records at N sites
//! over J repeated visits are treated as noisy observations of an unobserved
//! per-site ecological state, filtered through an imperfect detection
//! process. The crate builds per-block design matrices from Wilkinson-style
//! formulas, constructs the family-specific marginal likelihood that
//! integrates out the latent state, drives an L-BFGS optimizer over the
//! flattened parameter vector, and derives standard errors and confidence
//! intervals from the curvature at the optimum.
//!
//! Key behaviors
//! -------------
//! - [`design`] turns formula strings and covariate tables into design
//!   matrices with stable coefficient names, and bundles model input as an
//!   [`design::UnmarkedFrame`].
//! - [`detection`] owns the model layer: the validated
//!   [`detection::Response`], per-block [`detection::core::submodel::Submodel`]s, the
//!   [`detection::Family`] likelihoods, and the user-facing
//!   [`detection::DetectionModel`] with `fit` / `predict` / `summary` /
//!   `simulate` / `aic`.
//! - [`optimization`] is the model-agnostic MLE layer (argmin L-BFGS with
//!   finite-difference gradients); [`inference`] converts curvature at the
//!   optimum into covariance and interval estimates.
//!
//! Downstream usage
//! ----------------
//! ```no_run
//! use ndarray::array;
//! use rust_unmarked::design::{CovariateFrame, UnmarkedFrame};
//! use rust_unmarked::detection::{DetectionModel, FitOptions, SubmodelKind};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let y = array![[1.0, 0.0], [0.0, 0.0], [1.0, 1.0]];
//! let site = CovariateFrame::new(3, vec![("elev".to_string(), array![0.1, -0.4, 1.2])])?;
//! let obs = CovariateFrame::empty(6);
//! let frame = UnmarkedFrame::new(y, site, obs)?;
//!
//! let mut model = DetectionModel::occupancy("~1", "~elev", &frame, FitOptions::default())?;
//! model.fit(None, None)?;
//! println!("{}", model.summary(0.95)?);
//! let psi = model.predict(SubmodelKind::State, true)?;
//! # let _ = psi;
//! # Ok(())
//! # }
//! ```

pub mod design;
pub mod detection;
pub mod inference;
pub mod optimization;
