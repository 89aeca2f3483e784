//! Common utility functions shared across the codebase.

use std::{any::Any, path::Path};

use unicode_width::UnicodeWidthStr;

/// Checks if the text contains at least one Unicode alphabetic character.
///
/// Returns false for empty strings, pure numbers, or pure symbols.
///
/// # Examples
///
/// ```
/// use glean::utils::contains_alphabetic;
///
/// assert!(contains_alphabetic("Hello"));
/// assert!(contains_alphabetic("你好"));
/// assert!(contains_alphabetic("Hello123"));
/// assert!(!contains_alphabetic("123"));
/// assert!(!contains_alphabetic("---"));
/// assert!(!contains_alphabetic(""));
/// ```
pub fn contains_alphabetic(text: &str) -> bool {
    text.chars().any(|c| c.is_alphabetic())
}

/// Checks if a name starts with an uppercase letter (React component convention).
pub fn is_pascal_case(name: &str) -> bool {
    name.chars().next().is_some_and(|c| c.is_ascii_uppercase())
}

/// Checks if a name follows the React hook convention: `use` followed by an
/// uppercase letter, or exactly `use`.
pub fn is_hook_name(name: &str) -> bool {
    match name.strip_prefix("use") {
        Some("") => true,
        Some(rest) => rest.chars().next().is_some_and(|c| c.is_ascii_uppercase()),
        None => false,
    }
}

/// Render a path relative to `root` with forward slashes, falling back to the
/// full path when it is not under `root`.
pub fn display_relative(path: &Path, root: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    let rendered = rel.to_string_lossy().replace('\\', "/");
    if rendered.is_empty() {
        path.to_string_lossy().to_string()
    } else {
        rendered
    }
}

/// Pad `text` with spaces to `width` terminal columns. Wide characters (CJK,
/// emoji) count as two columns.
pub fn pad_end(text: &str, width: usize) -> String {
    let padding = width.saturating_sub(UnicodeWidthStr::width(text));
    format!("{}{}", text, " ".repeat(padding))
}

/// Widest entry of `items` in terminal columns.
pub fn max_width<'a>(items: impl IntoIterator<Item = &'a str>) -> usize {
    items
        .into_iter()
        .map(UnicodeWidthStr::width)
        .max()
        .unwrap_or(0)
}

/// Message carried by a caught panic payload.
pub fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
