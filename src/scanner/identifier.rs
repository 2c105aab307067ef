//! Movie identification from library folder names.
//!
//! Library folders follow the `Title (Year)` convention, e.g.
//! `Inception (2010)`. This module extracts the title and release year so
//! they can be used as a metadata search query.

use regex::Regex;
use std::sync::LazyLock;

static FOLDER_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<title>[^/]+?)\s+\((?P<year>[0-9]{4})\)/?$")
        .expect("folder name regex should compile")
});

/// Title and year extracted from a folder name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedName {
    pub title: String,
    /// Four-digit release year, kept as text since it is only used in queries.
    pub year: String,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum NameError {
    #[error("folder name does not match \"Title (Year)\": {0}")]
    Mismatch(String),
}

/// Parse a library folder name of the form `Title (Year)`, optionally with a
/// trailing `/`.
pub fn parse_directory_name(raw: &str) -> Result<ParsedName, NameError> {
    let captures = FOLDER_NAME
        .captures(raw)
        .ok_or_else(|| NameError::Mismatch(raw.to_string()))?;

    let title = captures["title"].trim();
    if title.is_empty() {
        return Err(NameError::Mismatch(raw.to_string()));
    }

    Ok(ParsedName {
        title: title.to_string(),
        year: captures["year"].to_string(),
    })
}
