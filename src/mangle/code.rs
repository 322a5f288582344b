//! Generate mangled codes.
//!
//! Codes are built from lowercase ASCII letters, derived from the allocation
//! counter of a [`SelectorCatalog`]: one letter for the first 26 selectors, two
//! letters up to 676, three letters up to 17576.

use log::{debug, warn};
use thiserror::Error;

use super::catalog::SelectorCatalog;

/// Number of letters in the alphabet.
const ALPHABET_SIZE: u32 = 26;

/// Number of codes the generator can produce.
pub const CAPACITY: u32 = ALPHABET_SIZE * ALPHABET_SIZE * ALPHABET_SIZE;

/// HTML tag names a code must not be equal to.
pub const BUILTIN_TAGS: &[&str] = &[
    "a", "abbr", "acronym", "address", "area", "article", "aside", "audio", "b", "base", "bdi",
    "bdo", "big", "blockquote", "body", "br", "button", "canvas", "caption", "center", "cite",
    "code", "col", "colgroup", "data", "datalist", "dd", "del", "details", "dfn", "dialog", "dir",
    "div", "dl", "dt", "em", "embed", "fencedframe", "fieldset", "figcaption", "figure", "font",
    "footer", "form", "frame", "frameset", "h1", "h2", "h3", "h4", "h5", "h6", "head", "header",
    "hgroup", "hr", "html", "i", "iframe", "img", "input", "ins", "kbd", "label", "legend", "li",
    "link", "main", "map", "mark", "marquee", "menu", "meta", "meter", "nav", "nobr", "noembed",
    "noframes", "noscript", "object", "ol", "optgroup", "option", "output", "p", "param",
    "picture", "plaintext", "portal", "pre", "progress", "q", "rb", "rp", "rt", "rtc", "ruby", "s",
    "samp", "script", "search", "section", "select", "slot", "small", "source", "span", "strike",
    "strong", "style", "sub", "summary", "sup", "table", "tbody", "td", "template", "textarea",
    "tfoot", "th", "thead", "time", "title", "tr", "track", "tt", "u", "ul", "var", "video", "wbr",
    "xmp",
];

/// List of errors for this module.
#[derive(Debug, Error)]
pub enum CodeError {
    /// The counter went past the last three-letter code.
    #[error("no code left for selector #{0} (capacity is {CAPACITY})")]
    CodeSpaceExhausted(u32),
}

/// Return the letters of the code for a counter value.
///
/// Returns `None` past [`CAPACITY`].
pub fn letters(n: u32) -> Option<String> {
    const SQUARED: u32 = ALPHABET_SIZE * ALPHABET_SIZE;

    let digits = if n < ALPHABET_SIZE {
        vec![n]
    } else if n < SQUARED {
        vec![n / ALPHABET_SIZE - 1, n % ALPHABET_SIZE]
    } else if n < CAPACITY {
        vec![
            n / SQUARED - 1,
            (n / ALPHABET_SIZE) % ALPHABET_SIZE,
            n % ALPHABET_SIZE,
        ]
    } else {
        return None;
    };

    Some(digits.into_iter().map(|digit| (b'a' + digit as u8) as char).collect())
}

/// Check if a code is equal to an HTML tag name.
pub fn is_builtin_tag(code: &str) -> bool {
    BUILTIN_TAGS.contains(&code)
}

/// Return the code for a counter value.
///
/// Letters that spell an HTML tag name get the last decimal digit of the
/// counter appended. The suffix depends on the counter only, never on a random
/// source, so the same counter yields the same code on every build.
pub fn code(n: u32) -> Result<String, CodeError> {
    let letters = letters(n).ok_or(CodeError::CodeSpaceExhausted(n))?;

    if is_builtin_tag(&letters) {
        return Ok(format!("{letters}{}", n % 10));
    }

    Ok(letters)
}

/// Allocate the next code of a catalog.
///
/// The counter is incremented only when a code is produced.
pub fn allocate(catalog: &mut SelectorCatalog) -> Result<String, CodeError> {
    let code = code(catalog.count())?;
    catalog.next_count();
    Ok(code)
}

/// Derive the codes of the elevation family from the code of its prefix.
///
/// Every name that starts with `prefix`, other than `prefix` itself, gets the
/// code of `prefix` followed by its index among those names, in catalog order.
/// Returns the number of names updated.
pub fn derive_elevation_codes(catalog: &mut SelectorCatalog, prefix: &str) -> usize {
    let Some(base) = catalog.get(prefix).map(str::to_owned) else {
        warn!("Elevation prefix {prefix:?} is not cataloged, skipping");
        return 0;
    };

    let members: Vec<String> = catalog
        .names()
        .filter(|name| *name != prefix && name.starts_with(prefix))
        .map(str::to_owned)
        .collect();

    for (i, name) in members.iter().enumerate() {
        let code = format!("{base}{i}");
        debug!("Elevation selector {name:?} -> {code:?}");
        catalog.insert(name.as_str(), code);
    }

    members.len()
}
