//! Build the selector catalog from the output of the reference locale.

use std::path::Path;

use log::{debug, error, info};

use super::{
    catalog::SelectorCatalog,
    code::{allocate, derive_elevation_codes},
    extract::{class_names, custom_properties, styles_sources, Rules},
    folders::{feature_folders, source_files, FileKind, SourceFile},
    MangleError,
};
use crate::Config;

/// Statistics of a catalog build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildStats {
    /// Number of files scanned.
    pub scanned_files: usize,

    /// Number of names added to the catalog.
    pub added_selectors: usize,
}

/// Extend a catalog with the selectors found in a locale directory.
///
/// Only names missing from the catalog get a new code, so codes of existing
/// names never change. Once every file is scanned, codes of the elevation
/// family are derived, the catalog is written to the cache file, then checked.
pub fn build(
    catalog: &mut SelectorCatalog,
    locale_dir: &Path,
    config: &Config,
    rules: &Rules,
) -> Result<BuildStats, MangleError> {
    info!("Building selector catalog from {locale_dir:?}");

    let stats = scan(catalog, locale_dir, config, rules)?;

    derive_elevation_codes(catalog, &config.elevation_prefix);

    catalog
        .save(&config.cache_path)
        .map_err(MangleError::SaveCatalog)?;

    info!(
        "Wrote {} selectors ({} new) to {:?}",
        catalog.len(),
        stats.added_selectors,
        config.cache_path
    );
    debug!("{catalog:#?}");

    catalog.validate().map_err(MangleError::Validate)?;

    Ok(stats)
}

/// Scan every source file of a locale directory, without post-processing.
pub fn scan(
    catalog: &mut SelectorCatalog,
    locale_dir: &Path,
    config: &Config,
    rules: &Rules,
) -> Result<BuildStats, MangleError> {
    let mut stats = BuildStats::default();

    let folders = feature_folders(locale_dir, config).map_err(|source| {
        error!("Failed to list feature folders in {locale_dir:?}");
        MangleError::WalkDir {
            path: locale_dir.to_path_buf(),
            source,
        }
    })?;

    for folder in folders {
        let files = source_files(&folder).map_err(|source| MangleError::ReadDir {
            path: folder.clone(),
            source,
        })?;

        for file in files {
            stats.added_selectors += scan_file(catalog, &file, rules).inspect_err(|_| {
                error!(
                    "Failed to create mangled selectors in file {:?} in folder {:?}",
                    file.name(),
                    folder
                );
            })?;
            stats.scanned_files += 1;
        }
    }

    Ok(stats)
}

/// Catalog the selectors of one source file.
///
/// Returns the number of names added.
fn scan_file(
    catalog: &mut SelectorCatalog,
    file: &SourceFile,
    rules: &Rules,
) -> Result<usize, MangleError> {
    let content = std::fs::read_to_string(&file.path).map_err(|source| MangleError::ReadFile {
        path: file.path.clone(),
        source,
    })?;

    let sources = styles_sources(file.kind, &content);
    let mut added = 0;

    for name in sources.iter().copied().flat_map(class_names) {
        if catalog.contains(name) || rules.is_ignored_class_name(name) {
            continue;
        }
        add(catalog, name)?;
        added += 1;
    }

    for name in sources.iter().copied().flat_map(custom_properties) {
        if catalog.contains(name) {
            continue;
        }
        add(catalog, name)?;
        added += 1;
    }

    if file.kind == FileKind::Script {
        for name in rules.framework_selectors(&content) {
            if catalog.contains(name) || rules.is_ignored_framework_selector(name) {
                continue;
            }
            add(catalog, name)?;
            added += 1;
        }
    }

    Ok(added)
}

/// Allocate a code for a new name.
fn add(catalog: &mut SelectorCatalog, name: &str) -> Result<(), MangleError> {
    let code = allocate(catalog)?;
    debug!("Selector {name:?} -> {code:?}");
    catalog.insert(name, code);
    Ok(())
}
