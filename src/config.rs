//! Configure the selector mangler.
//!
//! Configuration is read from an optional TOML file, then overridden by
//! command line options.

use std::path::{Component, Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;

use crate::{cli::Opts, util::path::PathExt};

/// Default name of the configuration file.
pub const CONFIG_FILE: &str = "mangler.config.toml";

/// Configuration for the selector mangler.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Directory containing one output directory per locale.
    #[serde(default = "default_dist_dir")]
    pub dist_dir: PathBuf,

    /// Path of the selector catalog.
    #[serde(default = "default_cache_path")]
    pub cache_path: PathBuf,

    /// Locale from which the catalog is built.
    #[serde(default = "default_reference_locale")]
    pub reference_locale: String,

    /// Names of directories that are not searched for feature folders.
    #[serde(default = "default_skip_dirs")]
    pub skip_dirs: Vec<String>,

    /// Name of the file that marks a feature folder.
    #[serde(default = "default_index_file")]
    pub index_file: String,

    /// Prefixes of component and attribute selectors.
    #[serde(default = "default_framework_prefixes")]
    pub framework_prefixes: Vec<String>,

    /// Patterns of class names that must not be mangled.
    #[serde(default = "default_class_name_ignore")]
    pub class_name_ignore: Vec<String>,

    /// Patterns of component and attribute selectors that must not be mangled.
    #[serde(default = "default_framework_ignore")]
    pub framework_ignore: Vec<String>,

    /// Prefix of the elevation selector family.
    #[serde(default = "default_elevation_prefix")]
    pub elevation_prefix: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dist_dir: default_dist_dir(),
            cache_path: default_cache_path(),
            reference_locale: default_reference_locale(),
            skip_dirs: default_skip_dirs(),
            index_file: default_index_file(),
            framework_prefixes: default_framework_prefixes(),
            class_name_ignore: default_class_name_ignore(),
            framework_ignore: default_framework_ignore(),
            elevation_prefix: default_elevation_prefix(),
        }
    }
}

impl Config {
    /// Create a configuration from a [`Opts`] object.
    ///
    /// The configuration file is `opts.config` if set, otherwise
    /// [`CONFIG_FILE`] if it exists in the current directory.
    pub fn from_opts(opts: &Opts) -> Result<Self> {
        let config_path = opts
            .config
            .clone()
            .or_else(|| Some(PathBuf::from(CONFIG_FILE)).filter(|path| path.exists()));

        let config = match config_path {
            Some(path) => Self::from_file(&path)
                .with_context(|| format!("reading configuration file {path:?}"))?,
            None => Self::default(),
        };

        let config = Self {
            dist_dir: opts.dist_dir.clone().unwrap_or(config.dist_dir),
            cache_path: opts.cache.clone().unwrap_or(config.cache_path),
            reference_locale: opts
                .reference_locale
                .clone()
                .unwrap_or(config.reference_locale),
            ..config
        };

        let config = config.normalize()?;

        config.check()?;

        Ok(config)
    }

    /// Load a configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Load a configuration from a TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Normalize configuration.
    ///
    /// Make all paths absolute, relative to the current directory.
    pub fn normalize(self) -> Result<Self> {
        let current_dir = std::env::current_dir()?;

        Ok(Self {
            dist_dir: current_dir.join(self.dist_dir).normalize(),
            cache_path: current_dir.join(self.cache_path).normalize(),
            ..self
        })
    }

    /// Check if configuration is valid.
    pub fn check(&self) -> Result<()> {
        debug_assert!(self.dist_dir.is_absolute());
        debug_assert!(self.cache_path.is_absolute());

        // Prevent shipping the catalog with the output
        if self.cache_path.starts_with(&self.dist_dir) {
            return Err(anyhow!("`cache_path` must be located outside `dist_dir`"));
        }

        if !is_valid_locale(&self.reference_locale) {
            return Err(anyhow!(
                "invalid `reference_locale` {:?}",
                self.reference_locale
            ));
        }

        if self.framework_prefixes.iter().any(|prefix| prefix.is_empty())
            || self.framework_prefixes.is_empty()
        {
            return Err(anyhow!("`framework_prefixes` must contain non-empty prefixes"));
        }

        if self.index_file.is_empty() {
            return Err(anyhow!("`index_file` must not be empty"));
        }

        Ok(())
    }
}

/// Check if a locale names a single directory, e.g. `en` or `pt-BR`.
pub fn is_valid_locale(locale: &str) -> bool {
    let mut components = Path::new(locale).components();

    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

pub(crate) fn default_dist_dir() -> PathBuf {
    PathBuf::from("dist")
}

pub(crate) fn default_cache_path() -> PathBuf {
    PathBuf::from(".mangled-selectors.json")
}

pub(crate) fn default_reference_locale() -> String {
    "en".to_string()
}

pub(crate) fn default_skip_dirs() -> Vec<String> {
    vec!["assets".to_string(), "media".to_string()]
}

pub(crate) fn default_index_file() -> String {
    "index.html".to_string()
}

pub(crate) fn default_framework_prefixes() -> Vec<String> {
    ["lc", "mat", "mdc", "color"].map(String::from).to_vec()
}

pub(crate) fn default_class_name_ignore() -> Vec<String> {
    [
        // These could be subtractions, which look the same
        "^width-",
        "^height-",
        "^left-",
        "^top-",
        "^right-",
        "^bottom-",
        "^x-",
        "^y-",
        "^[a-z]+--",
        "^mat-accent$",
        "^mat-warn$",
        "^mat-primary$",
        "^mat-column-.+",
        "^color-mix$",
    ]
    .map(String::from)
    .to_vec()
}

pub(crate) fn default_framework_ignore() -> Vec<String> {
    [
        "^lc-app$",
        "^mat-accent$",
        "^mat-warn$",
        "^mat-primary$",
        "^mat-column-.+",
        "^color-mix$",
    ]
    .map(String::from)
    .to_vec()
}

pub(crate) fn default_elevation_prefix() -> String {
    "mat-elevation-z".to_string()
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::{is_valid_locale, Config};

    #[test]
    fn load_config_str() {
        const CONTENT: &str = r#"
            dist_dir = "build/browser"
            cache_path = "scripts/.mangled-selectors.json"
            reference_locale = "vi"
            framework_prefixes = ["app", "mat"]
            class_name_ignore = ["^keep-"]
        "#;

        let config = Config::from_toml_str(CONTENT).unwrap();

        assert_eq!(config.dist_dir, PathBuf::from("build/browser"));
        assert_eq!(
            config.cache_path,
            PathBuf::from("scripts/.mangled-selectors.json")
        );
        assert_eq!(config.reference_locale, "vi");
        assert_eq!(config.framework_prefixes, vec!["app", "mat"]);
        assert_eq!(config.class_name_ignore, vec!["^keep-"]);
        assert_eq!(config.framework_ignore, super::default_framework_ignore());
        assert_eq!(config.elevation_prefix, "mat-elevation-z");
    }

    #[test]
    fn load_config_empty() {
        let config = Config::from_toml_str("").unwrap();

        assert_eq!(config, Config::default());
    }

    #[test]
    fn load_config_unknown_field() {
        assert!(Config::from_toml_str("output_dir = \"_site\"").is_err());
    }

    #[test]
    fn check_cache_inside_dist() {
        let config = Config {
            dist_dir: PathBuf::from("/site/dist"),
            cache_path: PathBuf::from("/site/dist/.mangled-selectors.json"),
            ..Default::default()
        };

        assert!(config.check().is_err());
    }

    #[test]
    fn check_empty_prefixes() {
        let config = Config {
            dist_dir: PathBuf::from("/site/dist"),
            cache_path: PathBuf::from("/site/.mangled-selectors.json"),
            framework_prefixes: Vec::new(),
            ..Default::default()
        };

        assert!(config.check().is_err());
    }

    #[test]
    fn locales() {
        assert!(is_valid_locale("en"));
        assert!(is_valid_locale("pt-BR"));
        assert!(!is_valid_locale(""));
        assert!(!is_valid_locale("."));
        assert!(!is_valid_locale("../en"));
        assert!(!is_valid_locale("en/blog"));
        assert!(!is_valid_locale("/en"));
    }
}
