//! Markdown code-fence removal.

const FENCE: &str = "```";

/// Return the payload of a fenced JSON block that wraps the whole text.
///
/// The text (ignoring surrounding whitespace) must start with "```", an
/// optional `json` tag and a newline, and must end with "```". Anything else,
/// including an opener without a closer, yields `None`.
pub fn fenced_payload(text: &str) -> Option<&str> {
    let rest = text.trim().strip_prefix(FENCE)?;
    let newline = rest.find('\n')?;
    let tag = rest[..newline].trim();
    if !(tag.is_empty() || tag.eq_ignore_ascii_case("json")) {
        return None;
    }
    let body = rest[newline + 1..].strip_suffix(FENCE)?;
    Some(body.trim())
}

/// Strip a surrounding fenced code block, or return `text` unchanged.
pub fn strip_code_fence(text: &str) -> &str {
    fenced_payload(text).unwrap_or(text)
}
