//! Utility functions for paths.

use std::path::{Component, Path, PathBuf};

/// Extend [`std::path::Path`] with utility methods.
pub(crate) trait PathExt {
    /// Normalize the path by removing unnecessary separators and `.` and `..`
    /// components.
    ///
    /// This method calls [`normalize_path`] under the hood.
    fn normalize(&self) -> PathBuf;
}

impl<T> PathExt for T
where
    T: AsRef<Path>,
{
    fn normalize(&self) -> PathBuf {
        self::normalize_path(self)
    }
}

/// Normalize a path by removing unnecessary separators and `.` and `..`
/// components.
///
/// Unlike [`std::fs::canonicalize`], the path does not need to exist and
/// symbolic links are not resolved. A `..` at the root is dropped, a leading
/// `..` of a relative path is kept.
pub(crate) fn normalize_path<P>(path: P) -> PathBuf
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let mut result: Vec<Component> = Vec::new();

    for component in path.components() {
        match component {
            Component::Normal(_) => result.push(component),
            Component::ParentDir => match result.last() {
                Some(Component::Normal(_)) => {
                    result.pop();
                },
                Some(Component::RootDir) => {},
                _ => result.push(component),
            },
            Component::Prefix(_) | Component::RootDir => result.push(component),
            Component::CurDir => {},
        }
    }

    let result: PathBuf = result.into_iter().collect();

    if result.as_os_str().is_empty() {
        return PathBuf::from(Component::CurDir.as_os_str());
    }

    result
}

#[cfg(test)]
mod tests {
    #[test]
    #[cfg(unix)]
    fn normalize_path_unix() {
        const CASES: [(&str, &str); 14] = [
            ("", "."),
            ("/", "/"),
            ("/./", "/"),
            ("//foo//bar/", "/foo/bar"),
            ("/foo/../..", "/"),
            ("/../foo", "/foo"),
            (".", "."),
            ("..", ".."),
            ("../../foo", "../../foo"),
            ("foo/../../bar", "../bar"),
            ("./dist/en/../es", "dist/es"),
            ("a//b//./c", "a/b/c"),
            ("/srv/site/./dist/../.mangled-selectors.json", "/srv/site/.mangled-selectors.json"),
            ("bar/foo../..", "bar"),
        ];

        for (input, expected) in CASES {
            let result = super::normalize_path(input);
            assert_eq!(
                result.to_str().unwrap(),
                expected,
                "\nnormalize_path({input:?}) expected {expected:?} but received {result:?}"
            );
        }
    }
}
