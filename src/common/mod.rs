//! Common types, errors and formatting shared across the crate

pub mod errors;
pub mod format;
pub mod types;
