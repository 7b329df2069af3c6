//! Core containers for detection models: response, links, submodels, the
//! submodel group, options, and log-space probability masses.

pub mod group;
pub mod link;
pub mod options;
pub mod pmf;
pub mod response;
pub mod submodel;
