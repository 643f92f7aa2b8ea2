//! The uniform result record handed back to callers.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::LlmError;

/// Raw model text plus the structured data recovered from it, if any.
///
/// `raw_response` is always the unmodified input. `structured_data` is present
/// exactly when `is_structured()` is true, and is always an object or array.
/// Deserializing recomputes the flag from the data and drops scalar data, so
/// a stored envelope cannot disagree with itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "StoredEnvelope")]
pub struct ExtractionResult {
    raw_response: String,
    structured_data: Option<Value>,
    is_structured: bool,
}

#[derive(Deserialize)]
struct StoredEnvelope {
    raw_response: String,
    #[serde(default)]
    structured_data: Option<Value>,
}

impl From<StoredEnvelope> for ExtractionResult {
    fn from(stored: StoredEnvelope) -> Self {
        // Scalars are never structured data.
        let data = stored
            .structured_data
            .filter(|v| v.is_object() || v.is_array());
        Self::new(stored.raw_response, data)
    }
}

impl ExtractionResult {
    pub(crate) fn new(raw_response: impl Into<String>, structured_data: Option<Value>) -> Self {
        let is_structured = structured_data.is_some();
        Self {
            raw_response: raw_response.into(),
            structured_data,
            is_structured,
        }
    }

    /// Envelope for text that carried no structured data.
    pub fn unstructured(raw_response: impl Into<String>) -> Self {
        Self::new(raw_response, None)
    }

    pub fn raw_response(&self) -> &str {
        &self.raw_response
    }

    pub fn structured_data(&self) -> Option<&Value> {
        self.structured_data.as_ref()
    }

    pub fn is_structured(&self) -> bool {
        self.is_structured
    }

    /// Split into the raw text and the structured data.
    pub fn into_parts(self) -> (String, Option<Value>) {
        (self.raw_response, self.structured_data)
    }

    /// Deserialize the structured data into `T`.
    ///
    /// Unstructured envelopes and shape mismatches both report
    /// [`LlmError::ParseError`]; the call site decides how to surface them.
    pub fn deserialize_into<T: DeserializeOwned>(&self) -> Result<T, LlmError> {
        let value = self.structured_data.clone().ok_or_else(|| {
            LlmError::ParseError("Model response contained no structured data".to_string())
        })?;
        serde_json::from_value(value)
            .map_err(|e| LlmError::ParseError(format!("Failed to deserialize object: {e}")))
    }
}
