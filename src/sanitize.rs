use std::sync::LazyLock;

use regex::Regex;

/// Markup sequences: anything between `<` and the next `>`.
static MARKUP: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").unwrap());

/// Control characters except newline and tab.
static CONTROL_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\x00-\x08\x0B\x0C\x0E-\x1F\x7F]").unwrap());

/// Clean a single inbound scalar before validation, uniqueness comparison
/// or persistence. Strips markup/script sequences and control characters.
/// Deliberately does not trim: whitespace-only values must survive so the
/// validators can tell them apart from empty ones. Idempotent.
pub fn sanitize(value: &str) -> String {
    let cleaned = CONTROL_CHARS.replace_all(value, "");
    MARKUP.replace_all(&cleaned, "").into_owned()
}

/// Sanitize an optional field, preserving `None`.
pub fn sanitize_opt(value: Option<&str>) -> Option<String> {
    value.map(sanitize)
}
