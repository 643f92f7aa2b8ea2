//! Locating a candidate JSON span inside free text.

/// How a candidate JSON span is located inside a model response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpanStrategy {
    /// Slice from the first `{` to the last `}`.
    ///
    /// Braces are not balanced: two disjoint objects, or a stray `}` in the
    /// trailing prose, produce a span that fails to decode.
    #[default]
    FirstLastBrace,
    /// Scan for the first balanced object or array, skipping brackets that
    /// appear inside string literals.
    Balanced,
}

impl SpanStrategy {
    pub fn locate(self, text: &str) -> Option<&str> {
        match self {
            Self::FirstLastBrace => brace_span(text),
            Self::Balanced => balanced_span(text),
        }
    }
}

/// Inclusive slice between the first `{` and the last `}`.
///
/// Returns `None` when either brace is missing or the last `}` precedes
/// the first `{`.
pub fn brace_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end <= start {
        return None;
    }
    Some(&text[start..=end])
}

/// First balanced `{...}` or `[...]` block in `text`.
///
/// Single pass over the bytes. Brackets inside string literals (including
/// escaped quotes) are ignored once a block is open. A mismatched closer
/// drops the open blocks and scanning continues from there. A complete
/// block nested under an opener that never closes (a stray `{` in prose)
/// is still returned.
pub fn balanced_span(text: &str) -> Option<&str> {
    let bytes = text.as_bytes();
    // (expected closer, opener index)
    let mut open: Vec<(u8, usize)> = Vec::new();
    // Earliest-starting complete block seen under a still-open opener.
    let mut orphan: Option<(usize, usize)> = None;
    let mut in_str = false;
    let mut escape = false;

    for (i, &b) in bytes.iter().enumerate() {
        if in_str {
            if escape {
                escape = false;
            } else if b == b'\\' {
                escape = true;
            } else if b == b'"' {
                in_str = false;
            }
            continue;
        }
        match b {
            b'"' if !open.is_empty() => in_str = true,
            b'{' => open.push((b'}', i)),
            b'[' => open.push((b']', i)),
            b'}' | b']' => match open.last() {
                None => {}
                Some(&(closer, start)) if closer == b => {
                    open.pop();
                    if open.is_empty() {
                        return Some(&text[start..=i]);
                    }
                    if orphan.is_none_or(|(s, _)| start < s) {
                        orphan = Some((start, i));
                    }
                }
                Some(_) => {
                    if orphan.is_some() {
                        break;
                    }
                    open.clear();
                }
            },
            _ => {}
        }
    }
    orphan.map(|(start, end)| &text[start..=end])
}
