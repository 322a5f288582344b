//! Extract selector names from compiled output.
//!
//! Extraction works on raw text with regular expressions, which is fast and
//! uniform across scripts, markup and stylesheets but only approximate.

use once_cell::sync::Lazy;
use regex::{Regex, RegexSet};

use super::folders::FileKind;
use crate::Config;

/// Style arrays of compiled components, e.g. `styles:[".foo{}"]`.
///
/// The opening and closing quotes must be the same.
static STYLES_ARRAY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"styles:\[(?:'([\s\S]+?)'|"([\s\S]+?)"|`([\s\S]+?)`)\]"#).unwrap()
});

/// Compound class selectors, e.g. `.card-title` or `.card__title`.
static CLASS_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\.([a-z]+(?:-|__)[a-z_0-9-]+[a-z0-9])").unwrap());

/// Custom property declarations, e.g. `--card-width:`.
static CUSTOM_PROPERTY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"--([a-z]+-[a-z0-9-]+[a-z0-9]):").unwrap());

/// Return the style sources of a file.
///
/// Scripts yield the content of their style arrays, stylesheets yield their
/// whole content, markup yields nothing.
pub fn styles_sources(kind: FileKind, content: &str) -> Vec<&str> {
    match kind {
        FileKind::Script => STYLES_ARRAY
            .captures_iter(content)
            .filter_map(|captures| {
                captures
                    .iter()
                    .skip(1)
                    .flatten()
                    .next()
                    .map(|body| body.as_str())
            })
            .collect(),
        FileKind::Style => vec![content],
        FileKind::Markup => Vec::new(),
    }
}

/// Iterate over the compound class names of a style source.
pub fn class_names(source: &str) -> impl Iterator<Item = &str> {
    CLASS_NAME
        .captures_iter(source)
        .filter_map(|captures| captures.get(1))
        .map(|name| name.as_str())
}

/// Iterate over the custom property names declared in a style source.
///
/// Names are returned without their leading `--`.
pub fn custom_properties(source: &str) -> impl Iterator<Item = &str> {
    CUSTOM_PROPERTY
        .captures_iter(source)
        .filter_map(|captures| captures.get(1))
        .map(|name| name.as_str())
}

/// Extraction rules that depend on configuration.
#[derive(Debug, Clone)]
pub struct Rules {
    /// Framework selectors, e.g. `mat-card-title`.
    framework_selector: Regex,

    /// Class names to leave untouched.
    class_name_ignore: RegexSet,

    /// Framework selectors to leave untouched.
    framework_ignore: RegexSet,
}

impl Rules {
    /// Compile the extraction rules.
    pub fn new<S>(
        framework_prefixes: &[S],
        class_name_ignore: &[S],
        framework_ignore: &[S],
    ) -> Result<Self, regex::Error>
    where
        S: AsRef<str>,
    {
        let prefixes = framework_prefixes
            .iter()
            .map(|prefix| regex::escape(prefix.as_ref()))
            .collect::<Vec<_>>()
            .join("|");

        Ok(Self {
            framework_selector: Regex::new(&format!("(?:{prefixes})-[a-z_-]+[a-z]"))?,
            class_name_ignore: RegexSet::new(class_name_ignore)?,
            framework_ignore: RegexSet::new(framework_ignore)?,
        })
    }

    /// Compile the extraction rules of a configuration.
    pub fn from_config(config: &Config) -> Result<Self, regex::Error> {
        Self::new(
            config.framework_prefixes.as_slice(),
            config.class_name_ignore.as_slice(),
            config.framework_ignore.as_slice(),
        )
    }

    /// Iterate over the framework selectors of a script.
    pub fn framework_selectors<'a>(&'a self, content: &'a str) -> impl Iterator<Item = &'a str> {
        self.framework_selector
            .find_iter(content)
            .map(|selector| selector.as_str())
    }

    /// Check if a class name must be left untouched.
    pub fn is_ignored_class_name(&self, name: &str) -> bool {
        self.class_name_ignore.is_match(name)
    }

    /// Check if a framework selector must be left untouched.
    pub fn is_ignored_framework_selector(&self, name: &str) -> bool {
        self.framework_ignore.is_match(name)
    }
}

#[cfg(test)]
mod tests {
    use super::{class_names, custom_properties, styles_sources, Rules};
    use crate::{mangle::folders::FileKind, Config};

    fn rules() -> Rules {
        Rules::from_config(&Config::default()).unwrap()
    }

    #[test]
    fn styles_from_script() {
        const INPUT: &str = concat!(
            r#"a.ɵcmp=x({styles:[".card-title[_ngcontent-%COMP%]{color:red}"]});"#,
            r#"b.ɵcmp=x({styles:['.side-nav{top:0}']});"#,
            "c.ɵcmp=x({styles:[`.app-shell{display:block}`]});",
            r#"d.ɵcmp=x({styles:[]});"#,
        );

        assert_eq!(
            styles_sources(FileKind::Script, INPUT),
            vec![
                ".card-title[_ngcontent-%COMP%]{color:red}",
                ".side-nav{top:0}",
                ".app-shell{display:block}",
            ]
        );
    }

    #[test]
    fn styles_mismatched_quotes() {
        // The body ends at the first closing quote that matches the opening one
        const INPUT: &str = r#"styles:[".foo-bar{content:'x']}"]"#;

        assert_eq!(
            styles_sources(FileKind::Script, INPUT),
            vec![".foo-bar{content:'x']}"]
        );
    }

    #[test]
    fn styles_from_stylesheet_and_markup() {
        assert_eq!(styles_sources(FileKind::Style, ".a-b{}"), vec![".a-b{}"]);
        assert!(styles_sources(FileKind::Markup, "<style>.a-b{}</style>").is_empty());
    }

    #[test]
    fn compound_class_names() {
        const INPUT: &str =
            ".card-title{}.card__body .x .single{} .col-12 .btn-2 .trailing-{} .nav-item:hover{}";

        assert_eq!(
            class_names(INPUT).collect::<Vec<_>>(),
            vec!["card-title", "card__body", "col-12", "nav-item"]
        );
    }

    #[test]
    fn custom_property_declarations() {
        const INPUT: &str =
            ":root{--card-width:10px;--x:1;--theme-primary-500: red}.a{width:var(--card-width)}";

        assert_eq!(
            custom_properties(INPUT).collect::<Vec<_>>(),
            vec!["card-width", "theme-primary-500"]
        );
    }

    #[test]
    fn framework_selectors() {
        const INPUT: &str = r#"selectors:[["lc-side-nav"]],hostAttrs:[1,"mat-mdc-card"],x:"mdc-button__label",y:"color-scheme",z:"other-thing""#;

        let rules = rules();

        assert_eq!(
            rules.framework_selectors(INPUT).collect::<Vec<_>>(),
            vec![
                "lc-side-nav",
                "mat-mdc-card",
                "mdc-button__label",
                "color-scheme"
            ]
        );
    }

    #[test]
    fn ignored_class_names() {
        let rules = rules();

        for name in [
            "width-100",
            "height-50",
            "x-axis",
            "foo--modifier",
            "mat-primary",
            "mat-column-name",
            "color-mix",
        ] {
            assert!(rules.is_ignored_class_name(name), "{name}");
        }

        for name in ["card-title", "max-width-100", "mat-primary-text"] {
            assert!(!rules.is_ignored_class_name(name), "{name}");
        }
    }

    #[test]
    fn ignored_framework_selectors() {
        let rules = rules();

        assert!(rules.is_ignored_framework_selector("lc-app"));
        assert!(rules.is_ignored_framework_selector("mat-column-date"));
        assert!(!rules.is_ignored_framework_selector("lc-app-shell"));
        assert!(!rules.is_ignored_framework_selector("width-100"));
    }

    #[test]
    fn invalid_pattern() {
        assert!(Rules::new::<&str>(&["lc"], &["("], &[]).is_err());
    }
}
