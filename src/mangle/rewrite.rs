//! Replace selector names with their codes.

use std::{borrow::Cow, path::Path};

use log::{error, info};
use regex::{Regex, RegexBuilder};

use super::{
    catalog::SelectorCatalog,
    folders::{feature_folders, source_files, SourceFile},
    MangleError,
};
use crate::Config;

/// Size limit of the compiled alternation.
///
/// Catalogs hold thousands of names, which is well above the default limit.
const REGEX_SIZE_LIMIT: usize = 256 * (1 << 20);

/// Check if a match starting at `start` is preceded by a selector delimiter.
///
/// Accepted delimiters are `'`, `:`, `.`, a backtick, whitespace, `<`, `</`,
/// `--`, and `"` unless it follows `path:`.
pub fn is_delimited(text: &str, start: usize) -> bool {
    let before = &text[..start];

    match before.chars().next_back() {
        Some('\'' | ':' | '.' | '`' | '<') => true,
        Some('/') => before.ends_with("</"),
        Some('-') => before.ends_with("--"),
        Some('"') => !before[..before.len() - 1].ends_with("path:"),
        Some(c) => c.is_whitespace(),
        None => false,
    }
}

/// Rewrites text using a selector catalog.
#[derive(Debug)]
pub struct Rewriter<'catalog> {
    /// Selector catalog.
    catalog: &'catalog SelectorCatalog,

    /// Alternation of every cataloged name, longest first.
    ///
    /// `None` when the catalog is empty.
    regex: Option<Regex>,
}

impl<'catalog> Rewriter<'catalog> {
    /// Create a rewriter for a catalog.
    pub fn new(catalog: &'catalog SelectorCatalog) -> Result<Self, regex::Error> {
        if catalog.is_empty() {
            return Ok(Self {
                catalog,
                regex: None,
            });
        }

        // Longest first, so that a name is never cut short by one of its
        // prefixes. The sort is stable, ties keep catalog order. Word
        // boundaries are ASCII only.
        let mut names: Vec<&str> = catalog.names().collect();
        names.sort_by_key(|name| std::cmp::Reverse(name.len()));

        let alternation = names
            .iter()
            .map(|name| format!(r"(?-u:\b){}(?-u:\b)", regex::escape(name)))
            .collect::<Vec<_>>()
            .join("|");

        let regex = RegexBuilder::new(&format!("(?:{alternation})"))
            .size_limit(REGEX_SIZE_LIMIT)
            .dfa_size_limit(REGEX_SIZE_LIMIT)
            .build()?;

        Ok(Self {
            catalog,
            regex: Some(regex),
        })
    }

    /// Replace every delimited occurrence of a cataloged name with its code.
    ///
    /// A match that cannot be found in the catalog is logged and kept as is.
    pub fn rewrite_str<'a>(&self, text: &'a str) -> Cow<'a, str> {
        let Some(regex) = self.regex.as_ref() else {
            return Cow::Borrowed(text);
        };

        let mut result = String::new();
        let mut last = 0;
        let mut at = 0;

        while let Some(found) = regex.find_at(text, at) {
            if !is_delimited(text, found.start()) {
                // Resume right after the first character of the rejected match
                at = found.start()
                    + text[found.start()..]
                        .chars()
                        .next()
                        .map_or(1, char::len_utf8);
                continue;
            }

            result.push_str(&text[last..found.start()]);

            match self.catalog.get(found.as_str()) {
                Some(code) => result.push_str(code),
                None => {
                    error!(
                        "Selector {:?} not found in mangled selector table",
                        found.as_str()
                    );
                    result.push_str(found.as_str());
                },
            }

            last = found.end();
            at = found.end();
        }

        if last == 0 {
            return Cow::Borrowed(text);
        }

        result.push_str(&text[last..]);
        Cow::Owned(result)
    }

    /// Rewrite a source file in place.
    pub fn rewrite_file(&self, file: &SourceFile) -> Result<(), MangleError> {
        let content = std::fs::read_to_string(&file.path).map_err(|source| MangleError::ReadFile {
            path: file.path.clone(),
            source,
        })?;

        let content = self.rewrite_str(&content);

        std::fs::write(&file.path, content.as_bytes()).map_err(|source| MangleError::WriteFile {
            path: file.path.clone(),
            source,
        })
    }
}

/// Rewrite every source file of a locale directory.
///
/// Returns the number of files rewritten.
pub fn rewrite(
    catalog: &SelectorCatalog,
    locale_dir: &Path,
    config: &Config,
) -> Result<usize, MangleError> {
    let rewriter = Rewriter::new(catalog).map_err(MangleError::Pattern)?;
    let mut count = 0;

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
            rewriter.rewrite_file(&file).inspect_err(|_| {
                error!(
                    "Failed to mangle selectors in file {:?} in {:?}",
                    file.name(),
                    folder
                );
            })?;

            info!("Mangled selectors in file {:?} in {:?}", file.name(), folder);
            count += 1;
        }
    }

    Ok(count)
}
