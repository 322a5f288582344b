//! List feature folders and their source files.

use std::{
    io,
    path::{Path, PathBuf},
};

use log::debug;

use crate::{
    util::walk::{self, DirWalker},
    Config,
};

/// Kind of a source file, determined by its extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FileKind {
    /// JavaScript bundle (`.js`).
    Script,
    /// HTML page (`.html`).
    Markup,
    /// CSS stylesheet (`.css`).
    Style,
}

impl FileKind {
    /// Return the kind of a file from its extension, if it is a source file.
    pub fn from_path(path: impl AsRef<Path>) -> Option<Self> {
        match path.as_ref().extension()?.to_str()? {
            "js" => Some(Self::Script),
            "html" => Some(Self::Markup),
            "css" => Some(Self::Style),
            _ => None,
        }
    }
}

/// A file that may contain selectors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Path of the file.
    pub path: PathBuf,

    /// Kind of the file.
    pub kind: FileKind,
}

impl SourceFile {
    /// Return the file name, for logging.
    pub fn name(&self) -> &str {
        self.path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or_default()
    }
}

/// List the feature folders of a locale directory.
///
/// Feature folders are the locale directory itself and its descendants that
/// contain an index page. Directories listed in `skip_dirs` are not descended
/// into. Folders are sorted by path. Fails on the first directory that cannot
/// be read.
pub fn feature_folders(
    locale_dir: impl AsRef<Path>,
    config: &Config,
) -> Result<Vec<PathBuf>, walk::Error> {
    let skip_dirs = config.skip_dirs.clone();
    let index_file = &config.index_file;

    let mut folders = Vec::new();

    for entry in DirWalker::new(locale_dir)
        .filter_entry(move |entry| {
            entry.depth() == 0
                || !entry
                    .file_name()
                    .to_str()
                    .is_some_and(|name| skip_dirs.iter().any(|skip| skip == name))
        })
        .walk_dirs()
    {
        let path = entry?.into_path();

        if path.join(index_file).is_file() {
            folders.push(path);
        } else {
            debug!("Skipping {path:?}: no {index_file:?}");
        }
    }

    folders.sort();
    Ok(folders)
}

/// List the source files of a feature folder.
///
/// Scripts come first, since they may embed the styles that markup and
/// stylesheets refer to. Files of the same group are sorted by name.
pub fn source_files(folder: impl AsRef<Path>) -> io::Result<Vec<SourceFile>> {
    let mut files = Vec::new();

    for entry in std::fs::read_dir(folder)? {
        let entry = entry?;

        if !entry.file_type()?.is_file() {
            continue;
        }

        let path = entry.path();

        if let Some(kind) = FileKind::from_path(&path) {
            files.push(SourceFile { path, kind });
        }
    }

    files.sort_by(|a, b| {
        (a.kind != FileKind::Script)
            .cmp(&(b.kind != FileKind::Script))
            .then_with(|| a.path.cmp(&b.path))
    });

    Ok(files)
}
