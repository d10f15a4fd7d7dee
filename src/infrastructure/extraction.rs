//! JSON extraction from free-form model replies
//!
//! Models are asked for fenced JSON but often add commentary, use several
//! fences or none at all. Candidates are tried in a fixed order and the first
//! one that parses strictly wins. Broken JSON is never repaired.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::domain::DomainError;

/// Fenced code block with an optional `json` tag
static FENCED_BLOCK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)```(?:json)?\s*([\s\S]*?)\s*```").expect("fence pattern is a valid regex")
});

/// Recover a JSON value from `text`.
///
/// 1. each fenced block, in order of appearance
/// 2. the whole trimmed text
/// 3. the span from the first `{` or `[` to the last matching closer
pub fn extract_json(text: &str) -> Result<Value, DomainError> {
    let cleaned = text.trim();

    for block in fenced_blocks(cleaned) {
        if let Ok(value) = serde_json::from_str(block) {
            return Ok(value);
        }
    }

    if let Ok(value) = serde_json::from_str(cleaned) {
        return Ok(value);
    }

    if let Some(span) = outer_span(cleaned) {
        if let Ok(value) = serde_json::from_str(span) {
            return Ok(value);
        }
    }

    Err(DomainError::parse(text))
}

fn fenced_blocks(text: &str) -> impl Iterator<Item = &str> {
    FENCED_BLOCK
        .captures_iter(text)
        .filter_map(|cap| cap.get(1).map(|m| m.as_str()))
}

/// Span from the earliest opener to the last closer of the same kind
fn outer_span(text: &str) -> Option<&str> {
    let start = match (text.find('{'), text.find('[')) {
        (Some(brace), Some(bracket)) => brace.min(bracket),
        (Some(brace), None) => brace,
        (None, Some(bracket)) => bracket,
        (None, None) => return None,
    };

    let closer = if text.as_bytes()[start] == b'{' { '}' } else { ']' };
    let end = text.rfind(closer)?;

    (end > start).then(|| &text[start..=end])
}
