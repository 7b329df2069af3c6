//! Guarded numeric transforms shared by link functions and inference.

pub mod transformations;
