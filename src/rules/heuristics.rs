//! Text heuristics shared by the built-in validators.

use std::sync::LazyLock;

use regex::Regex;

static URL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?i)(https?://|mailto:|tel:|www\.|//)\S+$").unwrap());

static PATH_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\.{0,2}/\S*|[\w@.-]+(/[\w@.\[\]-]+)+/?|[\w-]+\.[a-z0-9]{1,5})$").unwrap()
});

static CAMEL_CASE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z][a-z0-9]*([A-Z][a-z0-9]*)+$").unwrap());

static SNAKE_CASE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9]*(_[A-Za-z0-9]+)+$").unwrap());

static KEBAB_CASE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z][a-z0-9]*(-[a-z0-9]+)+$").unwrap());

/// One class token: `flex`, `p-4`, `md:flex`, `w-1/2`, `btn--primary`.
static CSS_CLASS_TOKEN_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^!?-?[a-z][a-z0-9]*((--?|__|:|/)[a-z0-9\[\]#.%]+)*$").unwrap()
});

/// Bare utility classes that carry no separator.
const BARE_UTILITY_CLASSES: &[&str] = &[
    "flex", "grid", "block", "inline", "hidden", "relative", "absolute", "fixed", "sticky",
    "container", "btn", "truncate", "underline", "italic", "uppercase", "lowercase",
];

static PLACEHOLDERS_ONLY_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\s|\{\{\s*[\w.]+\s*\}\}|\{\s*[\w.]+\s*\}|\$\{[^}]*\}|%[sdif])+$").unwrap()
});

static ENTITIES_ONLY_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\s|&[a-zA-Z]+;|&#x?[0-9a-fA-F]+;)+$").unwrap());

static HEX_COLOR_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#([0-9a-fA-F]{3,4}|[0-9a-fA-F]{6}|[0-9a-fA-F]{8})$").unwrap());

static CSS_LENGTH_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^-?\d+(\.\d+)?(px|em|rem|vh|vw|ms|s|deg|fr|pt)$").unwrap()
});

static DOTTED_KEY_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][\w-]*(\.[A-Za-z_][\w-]*)+$").unwrap());

pub fn is_url(text: &str) -> bool {
    URL_REGEX.is_match(text)
}

/// Relative/absolute paths, module specifiers and bare file names.
pub fn is_path(text: &str) -> bool {
    PATH_REGEX.is_match(text)
}

/// A single camelCase, snake_case or kebab-case token.
pub fn is_identifier(text: &str) -> bool {
    CAMEL_CASE_REGEX.is_match(text)
        || SNAKE_CASE_REGEX.is_match(text)
        || KEBAB_CASE_REGEX.is_match(text)
}

/// Space-separated class list: every token is class-shaped and most of them
/// are unmistakably classes (separator or known utility).
pub fn is_css_classes(text: &str) -> bool {
    let tokens: Vec<&str> = text.split_whitespace().collect();
    if tokens.is_empty() || !tokens.iter().all(|t| CSS_CLASS_TOKEN_REGEX.is_match(t)) {
        return false;
    }
    let classy = tokens
        .iter()
        .filter(|t| t.contains(['-', ':', '/', '_']) || BARE_UTILITY_CLASSES.contains(*t))
        .count();
    classy > tokens.len() - classy
}

pub fn is_placeholders_only(text: &str) -> bool {
    PLACEHOLDERS_ONLY_REGEX.is_match(text)
}

pub fn is_entities_only(text: &str) -> bool {
    ENTITIES_ONLY_REGEX.is_match(text)
}

/// `errors.required`, `auth.login.title`.
pub fn is_dotted_key(text: &str) -> bool {
    DOTTED_KEY_REGEX.is_match(text)
}

/// Why `text` looks like code rather than prose, if it does.
pub fn code_like_reason(text: &str) -> Option<&'static str> {
    let text = text.trim();
    if is_url(text) {
        Some("looks like a URL")
    } else if is_placeholders_only(text) {
        Some("contains only template placeholders")
    } else if is_entities_only(text) {
        Some("contains only HTML entities")
    } else if HEX_COLOR_REGEX.is_match(text) || CSS_LENGTH_REGEX.is_match(text) {
        Some("looks like a style value")
    } else if is_identifier(text) {
        Some("looks like an identifier")
    } else if is_css_classes(text) {
        Some("looks like CSS classes")
    } else if is_path(text) {
        Some("looks like a path")
    } else {
        None
    }
}

/// Reads like a sentence: several words or terminal punctuation.
pub fn reads_like_prose(text: &str) -> bool {
    let text = text.trim();
    text.split_whitespace().nth(1).is_some() || text.ends_with(['.', '!', '?', '…'])
}
