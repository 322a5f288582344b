//! Persist the mapping from selector names to mangled codes.
//!
//! The catalog is stored as a single flat JSON object: one `name: code` member
//! per selector, plus a `selectorCount` member holding the allocation counter.

use std::{
    collections::HashSet,
    path::{Path, PathBuf},
};

use indexmap::IndexMap;
use serde::{
    de::Error as _,
    ser::SerializeMap,
    Deserialize, Deserializer, Serialize, Serializer,
};
use thiserror::Error;

/// Name of the JSON member that stores the allocation counter.
pub const COUNT_KEY: &str = "selectorCount";

/// List of errors for this module.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// I/O error.
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// JSON error.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    /// Two different names share a code, or the counter is out of sync.
    #[error("expected unique selector count is {expected}, actual selector count is {actual}")]
    DuplicateSelectors {
        /// Allocation counter.
        expected: u32,
        /// Number of distinct codes.
        actual: usize,
    },
    /// Provides a file path to the context of an existing error.
    #[error("file {path:?}")]
    WithFile {
        /// Source error.
        source: Box<Self>,
        /// File path.
        path: PathBuf,
    },
}

/// Mapping from original selector names to mangled codes.
///
/// Names keep their insertion order, which is the order in which they were
/// discovered. That order is preserved on disk.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectorCatalog {
    /// Selector name to code.
    entries: IndexMap<String, String>,

    /// Number of codes allocated so far.
    count: u32,
}

impl SelectorCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a catalog from a JSON file.
    ///
    /// A missing file yields an empty catalog.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();

        if !path.exists() {
            return Ok(Self::new());
        }

        let load = || -> Result<Self, CatalogError> {
            let content = std::fs::read_to_string(path)?;
            Ok(serde_json::from_str(&content)?)
        };

        load().map_err(|source| CatalogError::WithFile {
            source: Box::new(source),
            path: path.to_path_buf(),
        })
    }

    /// Write the catalog to a JSON file, replacing its content.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), CatalogError> {
        let path = path.as_ref();

        let save = || -> Result<(), CatalogError> {
            if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
                std::fs::create_dir_all(dir)?;
            }
            std::fs::write(path, serde_json::to_string(self)?)?;
            Ok(())
        };

        save().map_err(|source| CatalogError::WithFile {
            source: Box::new(source),
            path: path.to_path_buf(),
        })
    }

    /// Return the code of a selector name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(String::as_str)
    }

    /// Check if a selector name is cataloged.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Set the code of a selector name, without touching the counter.
    ///
    /// An existing name keeps its position. Returns the previous code.
    pub fn insert(&mut self, name: impl Into<String>, code: impl Into<String>) -> Option<String> {
        self.entries.insert(name.into(), code.into())
    }

    /// Return the number of codes allocated so far.
    pub fn count(&self) -> u32 {
        self.count
    }

    /// Return the current counter value and increment it.
    pub(crate) fn next_count(&mut self) -> u32 {
        let count = self.count;
        self.count += 1;
        count
    }

    /// Return the number of cataloged names.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the catalog has no names.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over selector names, in catalog order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Iterate over `(name, code)` pairs, in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(name, code)| (name.as_str(), code.as_str()))
    }

    /// Return the number of distinct codes.
    pub fn unique_codes(&self) -> usize {
        self.entries.values().collect::<HashSet<_>>().len()
    }

    /// Check the catalog against its allocation counter.
    ///
    /// The catalog is consistent when either the number of distinct codes or
    /// the number of names equals the counter.
    pub fn validate(&self) -> Result<(), CatalogError> {
        let actual = self.unique_codes();
        let expected = self.count;

        if actual == expected as usize || self.len() == expected as usize {
            return Ok(());
        }

        Err(CatalogError::DuplicateSelectors { expected, actual })
    }
}

impl Serialize for SelectorCatalog {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.entries.len() + 1))?;
        for (name, code) in &self.entries {
            map.serialize_entry(name, code)?;
        }
        map.serialize_entry(COUNT_KEY, &self.count)?;
        map.end()
    }
}

impl<'de> Deserialize<'de> for SelectorCatalog {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let mut raw = IndexMap::<String, serde_json::Value>::deserialize(deserializer)?;

        let count = match raw.shift_remove(COUNT_KEY) {
            None => 0,
            Some(value) => value
                .as_u64()
                .and_then(|count| u32::try_from(count).ok())
                .ok_or_else(|| {
                    D::Error::custom(format!("`{COUNT_KEY}` must be a non-negative integer"))
                })?,
        };

        let entries = raw
            .into_iter()
            .map(|(name, code)| match code {
                serde_json::Value::String(code) => Ok((name, code)),
                _ => Err(D::Error::custom(format!(
                    "code of selector `{name}` must be a string"
                ))),
            })
            .collect::<Result<_, _>>()?;

        Ok(Self { entries, count })
    }
}

#[cfg(test)]
mod tests {
    use assert_fs::TempDir;

    use super::{CatalogError, SelectorCatalog};

    #[test]
    fn load_missing_file() {
        let temp_dir = TempDir::new().unwrap();

        let catalog = SelectorCatalog::load(temp_dir.path().join("cache.json")).unwrap();

        assert!(catalog.is_empty());
        assert_eq!(catalog.count(), 0);
    }

    #[test]
    fn save_flat_object() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("cache.json");

        let mut catalog = SelectorCatalog::new();
        catalog.insert("card-title", "a0");
        catalog.next_count();
        catalog.insert("card-body", "b1");
        catalog.next_count();
        catalog.save(&path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();

        assert_eq!(
            content,
            r#"{"card-title":"a0","card-body":"b1","selectorCount":2}"#
        );
        assert_eq!(SelectorCatalog::load(&path).unwrap(), catalog);
    }

    #[test]
    fn load_keeps_file_order() {
        const CONTENT: &str = r#"{"zeta-one":"a0","selectorCount":3,"alpha-two":"c","mid-three":"b1"}"#;

        let catalog: SelectorCatalog = serde_json::from_str(CONTENT).unwrap();

        assert_eq!(
            catalog.names().collect::<Vec<_>>(),
            vec!["zeta-one", "alpha-two", "mid-three"]
        );
        assert_eq!(catalog.count(), 3);
        assert_eq!(catalog.get("alpha-two"), Some("c"));
    }

    #[test]
    fn load_without_count() {
        let catalog: SelectorCatalog = serde_json::from_str(r#"{"foo-bar":"c"}"#).unwrap();

        assert_eq!(catalog.count(), 0);
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn load_invalid() {
        assert!(serde_json::from_str::<SelectorCatalog>(r#"{"selectorCount":-1}"#).is_err());
        assert!(serde_json::from_str::<SelectorCatalog>(r#"{"foo-bar":3}"#).is_err());
        assert!(serde_json::from_str::<SelectorCatalog>("[]").is_err());
    }

    #[test]
    fn load_malformed_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("cache.json");
        std::fs::write(&path, "{").unwrap();

        let error = SelectorCatalog::load(&path).unwrap_err();

        assert!(matches!(error, CatalogError::WithFile { .. }));
    }

    #[test]
    fn validate_consistent() {
        let catalog: SelectorCatalog =
            serde_json::from_str(r#"{"foo-bar":"c","baz-qux":"d","selectorCount":2}"#).unwrap();

        assert!(catalog.validate().is_ok());
    }

    #[test]
    fn validate_duplicate_codes() {
        let catalog: SelectorCatalog =
            serde_json::from_str(r#"{"foo-bar":"c","baz-qux":"c","selectorCount":3}"#).unwrap();

        let error = catalog.validate().unwrap_err();

        assert!(matches!(
            error,
            CatalogError::DuplicateSelectors {
                expected: 3,
                actual: 1
            }
        ));
        assert_eq!(
            error.to_string(),
            "expected unique selector count is 3, actual selector count is 1"
        );
    }
}
