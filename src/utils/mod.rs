//! Utility modules.

pub mod path;
