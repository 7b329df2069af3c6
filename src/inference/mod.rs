//! Inference layer: curvature-based covariance and normal-theory intervals.

pub mod covariance;
pub mod intervals;
