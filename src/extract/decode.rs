//! Strict JSON decoding of a candidate span.

use serde_json::Value;

/// Outcome of decoding a candidate string.
#[derive(Debug, Clone, PartialEq)]
pub enum Decoded {
    /// A JSON object or array.
    Structured(Value),
    /// Malformed JSON, trailing content, or a scalar top-level value.
    Unstructured,
}

impl Decoded {
    pub fn is_structured(&self) -> bool {
        matches!(self, Self::Structured(_))
    }

    pub fn into_value(self) -> Option<Value> {
        match self {
            Self::Structured(value) => Some(value),
            Self::Unstructured => None,
        }
    }
}

/// Decode `candidate` as standard JSON.
///
/// Only `serde_json`'s strict grammar is accepted; there is no repair pass.
pub fn decode_strict(candidate: &str) -> Decoded {
    match serde_json::from_str::<Value>(candidate) {
        Ok(value @ (Value::Object(_) | Value::Array(_))) => Decoded::Structured(value),
        Ok(other) => {
            tracing::trace!(kind = value_kind(&other), "top-level JSON value is not a container");
            Decoded::Unstructured
        }
        Err(e) => {
            tracing::trace!(error = %e, "candidate is not valid JSON");
            Decoded::Unstructured
        }
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
