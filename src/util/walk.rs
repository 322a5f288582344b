//! Walk directories recursively.
//!
//! This module uses [`ignore`] under the hood.

use std::path::Path;

pub use ignore::{DirEntry, Error};
use ignore::WalkBuilder;

/// A directory walker.
///
/// This walker creates a recursive directory iterator that filters hidden
/// entries and yields entries sorted by file name, so that the walk order does
/// not depend on the file system.
pub struct DirWalker {
    /// Builds a recursive directory iterator.
    builder: WalkBuilder,
}

impl DirWalker {
    /// Create a directory walker.
    pub fn new<P>(dir: P) -> Self
    where
        P: AsRef<Path>,
    {
        let mut builder = WalkBuilder::new(dir);

        builder
            .hidden(true)
            .git_ignore(false)
            .git_global(false)
            .git_exclude(false)
            .ignore(false)
            .parents(false)
            .sort_by_file_name(|a, b| a.cmp(b));

        Self { builder }
    }

    /// Register a predicate to filter directories and files during the walk.
    ///
    /// Directories rejected by the predicate are not descended into.
    pub fn filter_entry<P>(&mut self, predicate: P) -> &mut Self
    where
        P: Fn(&DirEntry) -> bool + Send + Sync + 'static,
    {
        self.builder.filter_entry(predicate);
        self
    }

    /// Return an iterator that yields only directories, the root included.
    ///
    /// Directories that cannot be read are yielded as errors.
    pub fn walk_dirs(&self) -> impl Iterator<Item = Result<DirEntry, Error>> {
        self.builder.build().filter(|result| {
            result.as_ref().map_or(true, |entry| {
                entry.file_type().is_some_and(|file_type| file_type.is_dir())
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use assert_fs::{prelude::*, TempDir};

    use super::DirWalker;

    #[test]
    fn sorted_dirs() {
        let temp_dir = TempDir::new().unwrap();
        temp_dir.child("b/c").create_dir_all().unwrap();
        temp_dir.child("a").create_dir_all().unwrap();
        temp_dir.child("a/file.js").touch().unwrap();
        let dir = temp_dir.path();

        let result: Vec<PathBuf> = DirWalker::new(dir)
            .walk_dirs()
            .map(|entry| entry.unwrap().into_path())
            .collect();

        assert_eq!(
            result,
            vec![dir.to_path_buf(), dir.join("a"), dir.join("b"), dir.join("b/c")]
        );
    }

    #[test]
    fn hidden() {
        let temp_dir = TempDir::new().unwrap();
        temp_dir.child(".cache").create_dir_all().unwrap();
        temp_dir.child("page").create_dir_all().unwrap();
        let dir = temp_dir.path();

        let result: Vec<PathBuf> = DirWalker::new(dir)
            .walk_dirs()
            .map(|entry| entry.unwrap().into_path())
            .collect();

        assert_eq!(result, vec![dir.to_path_buf(), dir.join("page")]);
    }

    #[test]
    fn filter_entry() {
        let temp_dir = TempDir::new().unwrap();
        temp_dir.child("assets/icons").create_dir_all().unwrap();
        temp_dir.child("page").create_dir_all().unwrap();
        let dir = temp_dir.path();

        let result: Vec<PathBuf> = DirWalker::new(dir)
            .filter_entry(|entry| entry.file_name() != "assets")
            .walk_dirs()
            .map(|entry| entry.unwrap().into_path())
            .collect();

        assert_eq!(result, vec![dir.to_path_buf(), dir.join("page")]);
    }

    #[test]
    fn missing_dir() {
        let temp_dir = TempDir::new().unwrap();

        let result: Vec<_> = DirWalker::new(temp_dir.path().join("missing"))
            .walk_dirs()
            .collect();

        assert_eq!(result.len(), 1);
        assert!(result[0].is_err());
    }
}
