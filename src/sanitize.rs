//! Filename sanitisation and the names derived from it.
//!
//! Markdown link targets cannot contain unescaped spaces, and vault tooling
//! tends to mangle the full-width ideographic space (U+3000) common in CJK
//! filenames. The rule here is deliberately minimal: collapse every maximal
//! run of whitespace to a single `_` and touch nothing else, so a sanitised
//! name is still recognisably the original.
//!
//! Everything downstream — the cover path, the link path, and both markdown
//! references — derives its filename through [`cover_file_name`] /
//! [`link_file_name`]. Because all four go through the same pure function,
//! the markdown can never point at a name the renderer or linker did not
//! produce.

use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;

// `\s` already covers U+3000 in Unicode mode; it is listed explicitly
// because collapsing the ideographic space is a contract, not a side effect.
static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\s\u{3000}]+").unwrap());

/// Replace every maximal run of whitespace with a single underscore.
///
/// Pure, total, and idempotent: no character other than whitespace is
/// altered, and a name without whitespace passes through unchanged.
///
/// ```
/// use pdfshelf::sanitize;
///
/// assert_eq!(sanitize("My Report.pdf"), "My_Report.pdf");
/// assert_eq!(sanitize("A\u{3000}B"), "A_B");
/// ```
pub fn sanitize(name: &str) -> String {
    WHITESPACE_RUN.replace_all(name, "_").into_owned()
}

/// Final path component, including its extension.
pub fn basename(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Final path component without its final extension.
pub fn stem(path: &Path) -> String {
    path.file_stem()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// File name of the cover image for a source document: the sanitised stem
/// plus `.png`.
pub fn cover_file_name(path: &Path) -> String {
    sanitize(&format!("{}.png", stem(path)))
}

/// File name of the symlink for a source document: the sanitised basename.
///
/// Note this is a second, independent application of [`sanitize`] — the
/// cover name and the link name are two derived strings from the same
/// source, not one shared string with an extension swapped.
pub fn link_file_name(path: &Path) -> String {
    sanitize(&basename(path))
}
