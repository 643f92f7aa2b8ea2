//! Best-effort structured data extraction from model output.
//!
//! Model responses are free text: sometimes a fenced JSON block, sometimes a
//! JSON object buried in prose, often no JSON at all. [`extract`] turns any
//! such text into an [`ExtractionResult`] without ever failing.
//!
//! Pipeline:
//! 1. [`fence`]: if the whole text is a fenced block, only its payload is
//!    considered from here on.
//! 2. [`decode`]: the trimmed payload (or text) is parsed as strict JSON and
//!    wins when it is a clean object or array.
//! 3. [`span`]: otherwise a candidate span is located inside it (first `{`
//!    to last `}` by default) and strictly decoded.
//!
//! ```rust
//! use llm_envelope::extract::extract;
//!
//! let result = extract("Here you go: {\"species\": \"Pleurotus ostreatus\"}");
//! assert!(result.is_structured());
//! assert_eq!(result.structured_data().unwrap()["species"], "Pleurotus ostreatus");
//!
//! let result = extract("no json here");
//! assert!(!result.is_structured());
//! assert_eq!(result.raw_response(), "no json here");
//! ```

pub mod decode;
pub mod envelope;
pub mod fence;
pub mod span;

pub use decode::{Decoded, decode_strict};
pub use envelope::ExtractionResult;
pub use fence::{fenced_payload, strip_code_fence};
pub use span::{SpanStrategy, balanced_span, brace_span};

/// Extract with the default [`Extractor`].
pub fn extract(text: &str) -> ExtractionResult {
    Extractor::default().extract(text)
}

/// Stateless extraction pipeline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Extractor {
    strategy: SpanStrategy,
}

impl Extractor {
    pub const fn new(strategy: SpanStrategy) -> Self {
        Self { strategy }
    }

    /// Extractor using the bracket-depth scanner instead of the brace heuristic.
    pub const fn balanced() -> Self {
        Self::new(SpanStrategy::Balanced)
    }

    pub const fn strategy(&self) -> SpanStrategy {
        self.strategy
    }

    pub fn extract(&self, text: &str) -> ExtractionResult {
        let decoded = self.decode(text);
        tracing::debug!(
            len = text.len(),
            structured = decoded.is_structured(),
            strategy = ?self.strategy,
            "extracted model response"
        );
        ExtractionResult::new(text, decoded.into_value())
    }

    fn decode(&self, text: &str) -> Decoded {
        let body = fenced_payload(text).unwrap_or(text).trim();
        if body.is_empty() {
            return Decoded::Unstructured;
        }

        let whole = decode_strict(body);
        if whole.is_structured() {
            return whole;
        }

        match self.strategy.locate(body) {
            // The body itself was already tried.
            Some(candidate) if candidate.len() < body.len() => decode_strict(candidate),
            _ => {
                tracing::trace!("no JSON span inside the response");
                Decoded::Unstructured
            }
        }
    }
}
