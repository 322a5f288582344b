//! Mangle CSS selectors of a multi-locale static site.
//!
//! After the site is compiled into one output directory per locale, long class
//! names, custom properties and component selectors are replaced with short
//! codes. Codes are kept in a catalog file so that they stay the same across
//! locales and across builds.
//!
//! The mangler can be used as both a CLI and a library.

#![warn(missing_docs)]

pub mod cli;
pub mod config;
pub mod mangle;
pub mod util;

pub use config::Config;
pub use mangle::{catalog::SelectorCatalog, mangle, MangleError, Summary};
