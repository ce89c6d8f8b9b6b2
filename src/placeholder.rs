use regex::Regex;
use once_cell::sync::Lazy;

// @module: Placeholder marker detection

/// Literal prefix identifying a placeholder cell
pub const PLACEHOLDER_PREFIX: &str = "# @ PLACEHOLDER<";

// @const: Full placeholder marker, capturing the key
static PLACEHOLDER_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"# @ PLACEHOLDER<(.*)>").unwrap()
});

/// What a cell source turns out to be
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellKind {
    /// A well-formed placeholder carrying its key
    Placeholder { key: String },
    /// Starts with the sentinel prefix but the key cannot be parsed
    Malformed,
    /// Anything else
    Ordinary,
}

/// Whether the source starts with the sentinel prefix
pub fn is_placeholder(source: &str) -> bool {
    source.starts_with(PLACEHOLDER_PREFIX)
}

/// Extract the key of a placeholder marker, if the full pattern matches
pub fn extract_key(source: &str) -> Option<String> {
    PLACEHOLDER_REGEX
        .captures(source)
        .and_then(|caps| caps.get(1))
        .map(|key| key.as_str().to_string())
}

/// Classify a cell source
pub fn classify(source: &str) -> CellKind {
    if !is_placeholder(source) {
        return CellKind::Ordinary;
    }

    match extract_key(source) {
        Some(key) => CellKind::Placeholder { key },
        None => CellKind::Malformed,
    }
}
