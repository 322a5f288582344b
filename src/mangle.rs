//! Mangle CSS selectors of a compiled locale.
//!
//! Long class names, custom properties and component selectors found in the
//! output of the reference locale are cataloged and given short codes. Every
//! locale is then rewritten with the same catalog, so that codes are identical
//! across locales and across builds.

pub mod builder;
pub mod catalog;
pub mod code;
pub mod extract;
pub mod folders;
pub mod rewrite;

use std::path::PathBuf;

use log::{error, info};
use thiserror::Error;

use self::{
    builder::BuildStats,
    catalog::{CatalogError, SelectorCatalog},
    code::CodeError,
    extract::Rules,
};
use crate::Config;

/// List of mangling errors.
#[derive(Debug, Error)]
pub enum MangleError {
    /// The locale directory does not exist.
    #[error("locale directory {0:?} does not exist")]
    MissingLocale(PathBuf),
    /// A configured pattern or the rewrite alternation failed to compile.
    #[error("failed to compile selector patterns")]
    Pattern(#[source] regex::Error),
    /// The cache file could not be read.
    #[error("failed to load the selector catalog")]
    LoadCatalog(#[source] CatalogError),
    /// The cache file could not be written.
    #[error("failed to save the selector catalog")]
    SaveCatalog(#[source] CatalogError),
    /// The catalog is inconsistent.
    #[error("duplicate selectors detected in the selector catalog")]
    Validate(#[source] CatalogError),
    /// No code is left.
    #[error("failed to allocate a code")]
    Code(#[from] CodeError),
    /// The feature folders of a locale could not be listed.
    #[error("failed to list feature folders in {path:?}")]
    WalkDir {
        /// Locale directory path.
        path: PathBuf,
        /// Source error.
        source: crate::util::walk::Error,
    },
    /// A directory could not be listed.
    #[error("failed to list files in {path:?}")]
    ReadDir {
        /// Directory path.
        path: PathBuf,
        /// Source error.
        source: std::io::Error,
    },
    /// A source file could not be read.
    #[error("failed to read file {path:?}")]
    ReadFile {
        /// File path.
        path: PathBuf,
        /// Source error.
        source: std::io::Error,
    },
    /// A source file could not be written.
    #[error("failed to write file {path:?}")]
    WriteFile {
        /// File path.
        path: PathBuf,
        /// Source error.
        source: std::io::Error,
    },
}

/// Summary of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Summary {
    /// Whether the catalog was built from this locale.
    pub reference: bool,

    /// Number of files scanned to build the catalog.
    pub scanned_files: usize,

    /// Number of names added to the catalog.
    pub added_selectors: usize,

    /// Number of names in the catalog.
    pub catalog_size: usize,

    /// Number of files rewritten.
    pub rewritten_files: usize,
}

/// Mangle the selectors of a locale.
///
/// When `locale` is the reference locale, the catalog is extended with the
/// selectors of its output and written back to the cache file first. Every
/// locale is then rewritten with the catalog.
pub fn mangle(config: &Config, locale: &str) -> Result<Summary, MangleError> {
    let locale_dir = config.dist_dir.join(locale);

    if !locale_dir.is_dir() {
        return Err(MangleError::MissingLocale(locale_dir));
    }

    let rules = Rules::from_config(config).map_err(MangleError::Pattern)?;

    let mut catalog =
        SelectorCatalog::load(&config.cache_path).map_err(MangleError::LoadCatalog)?;

    let reference = locale == config.reference_locale;

    let stats = if reference {
        builder::build(&mut catalog, &locale_dir, config, &rules).inspect_err(|error| {
            if matches!(error, MangleError::Validate(_)) {
                error!("Duplicate selectors detected when building for locale {locale:?}");
            }
        })?
    } else {
        info!(
            "Using selector catalog {:?} ({} selectors)",
            config.cache_path,
            catalog.len()
        );
        BuildStats::default()
    };

    let rewritten_files = rewrite::rewrite(&catalog, &locale_dir, config)?;

    Ok(Summary {
        reference,
        scanned_files: stats.scanned_files,
        added_selectors: stats.added_selectors,
        catalog_size: catalog.len(),
        rewritten_files,
    })
}
