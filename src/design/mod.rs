//! Design layer: formulas, covariate frames, and design matrices.
//!
//! This module is the crate's concrete realization of the design-matrix
//! collaborator: given a Wilkinson-style formula string and a table of named
//! covariate columns, produce a numeric matrix and stable column names. The
//! model layer never parses formulas itself; it consumes [`DesignMatrix`]
//! values built here.

pub mod errors;
pub mod formula;
pub mod frame;

pub use self::errors::{DesignError, DesignResult};
pub use self::formula::{DesignMatrix, Formula, INTERCEPT_NAME};
pub use self::frame::{CovariateFrame, UnmarkedFrame};
