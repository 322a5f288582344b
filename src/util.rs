//! Utility functions and structures.

pub(crate) mod path;
pub mod walk;
