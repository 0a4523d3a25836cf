//! Stop-marker handling for model completions.

/// Cut `text` before the first occurrence of `stop`.
///
/// An empty marker leaves the text unchanged.
pub fn truncate_at_stop<'a>(text: &'a str, stop: &str) -> &'a str {
    if stop.is_empty() {
        return text;
    }
    match text.find(stop) {
        Some(idx) => &text[..idx],
        None => text,
    }
}
