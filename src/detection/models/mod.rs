//! Model families and the user-facing model object.

pub mod family;
pub mod model;
pub(crate) mod nmixture;
pub(crate) mod occupancy;
pub(crate) mod royle_nichols;

pub use self::family::Family;
pub use self::model::{DetectionModel, FitOutcome};
