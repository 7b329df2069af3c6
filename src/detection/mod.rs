//! Detection-correction models: hierarchical latent-state models with
//! imperfect detection.

pub mod core;
pub mod errors;
pub mod models;

pub use self::core::group::SubmodelKind;
pub use self::core::options::{FitOptions, SimOptions};
pub use self::core::response::Response;
pub use self::errors::{ModelError, ModelResult};
pub use self::models::{DetectionModel, Family};
