use lazy_static::lazy_static;
use regex::Regex;

use crate::shared::constants::ALLOWED_PHOTO_EXTENSIONS;

lazy_static! {
    /// Characters that are not safe in a stored file name
    /// - Kept: ASCII letters, digits, '.', '_' and '-'
    pub static ref UNSAFE_FILENAME_CHARS: Regex = Regex::new(r"[^A-Za-z0-9_.-]").unwrap();

    /// Runs of whitespace, collapsed to a single underscore
    pub static ref WHITESPACE_RUN: Regex = Regex::new(r"\s+").unwrap();
}

/// Reduce an uploaded file name to a safe, flat name.
///
/// Directory components are dropped, whitespace becomes `_`, any other unsafe
/// character is removed. Returns `None` when nothing usable is left.
pub fn sanitize_filename(name: &str) -> Option<String> {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    let underscored = WHITESPACE_RUN.replace_all(base.trim(), "_");
    let cleaned = UNSAFE_FILENAME_CHARS.replace_all(&underscored, "");
    let trimmed = cleaned.trim_matches(|c| c == '.' || c == '_');

    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Whether the file name carries one of the accepted photo extensions
pub fn is_allowed_photo(filename: &str) -> bool {
    filename
        .rsplit_once('.')
        .map(|(_, ext)| ALLOWED_PHOTO_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}
