//! Utilities: paths, display formatting

pub mod format;
pub mod paths;
