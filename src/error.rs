//! Error Handling Module
//!
//! Errors raised by the model-call layer. Extraction itself never fails:
//! a response without usable JSON is an ordinary
//! [`ExtractionResult`](crate::extract::ExtractionResult) with
//! `is_structured == false`, not an `LlmError`.
//!
//! # Example
//!
//! ```rust
//! use llm_envelope::error::{ErrorCategory, LlmError};
//!
//! let error = LlmError::api_error(404, "Not found");
//! assert_eq!(error.category(), ErrorCategory::Client);
//! assert!(!error.is_retryable());
//! ```

use std::time::Duration;

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Errors produced while talking to a model provider.
#[derive(Error, Debug, Clone)]
pub enum LlmError {
    /// Transport-level failure (DNS, connect, reset).
    #[error("Network error: {0}")]
    NetworkError(String),

    /// The request did not complete within the configured timeout.
    #[error("Timeout error: {0}")]
    TimeoutError(String),

    /// Credentials were rejected (HTTP 401/403).
    #[error("Authentication error: {0}")]
    AuthenticationError(String),

    /// The provider throttled the request (HTTP 429).
    #[error("Rate limit exceeded: {message}")]
    RateLimitError {
        message: String,
        /// Server-provided hint from the `Retry-After` header.
        retry_after: Option<Duration>,
    },

    /// Any other non-success HTTP reply.
    #[error("API error {code}: {message}")]
    ApiError {
        code: u16,
        message: String,
        details: Option<serde_json::Value>,
    },

    /// The provider reply could not be understood.
    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("JSON error: {0}")]
    JsonError(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("IO error: {0}")]
    IoError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Coarse grouping used for retry decisions and user-facing summaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Authentication,
    RateLimit,
    Client,
    Server,
    Parsing,
    Validation,
    Configuration,
    Internal,
}

impl LlmError {
    /// Shorthand for an [`LlmError::ApiError`] without details.
    pub fn api_error(code: u16, message: impl Into<String>) -> Self {
        Self::ApiError {
            code,
            message: message.into(),
            details: None,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::NetworkError(_) | Self::TimeoutError(_) => ErrorCategory::Network,
            Self::AuthenticationError(_) => ErrorCategory::Authentication,
            Self::RateLimitError { .. } => ErrorCategory::RateLimit,
            Self::ApiError { code, .. } if *code >= 500 => ErrorCategory::Server,
            Self::ApiError { .. } => ErrorCategory::Client,
            Self::ParseError(_) | Self::JsonError(_) => ErrorCategory::Parsing,
            Self::InvalidInput(_) => ErrorCategory::Validation,
            Self::ConfigurationError(_) => ErrorCategory::Configuration,
            Self::IoError(_) | Self::InternalError(_) => ErrorCategory::Internal,
        }
    }

    /// Whether repeating the same request may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self.category(),
            ErrorCategory::Network | ErrorCategory::RateLimit | ErrorCategory::Server
        )
    }

    /// HTTP status associated with the error, when there is one.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::ApiError { code, .. } => Some(*code),
            Self::RateLimitError { .. } => Some(429),
            _ => None,
        }
    }

    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::RateLimitError { retry_after, .. } => *retry_after,
            _ => None,
        }
    }
}

/// Classify a failed HTTP reply into a typed error.
///
/// OpenAI-style bodies (`{"error": {"message": ...}}`) contribute their
/// message; otherwise the raw body text is used.
pub fn classify_http_error(status: u16, body_text: &str, retry_after: Option<Duration>) -> LlmError {
    let details = serde_json::from_str::<serde_json::Value>(body_text).ok();
    let message = details
        .as_ref()
        .and_then(|v| v.get("error"))
        .and_then(|e| e.get("message").or(Some(e)))
        .and_then(|m| m.as_str())
        .map(str::to_string)
        .unwrap_or_else(|| {
            if body_text.trim().is_empty() {
                format!("HTTP {status}")
            } else {
                body_text.trim().to_string()
            }
        });

    match status {
        401 | 403 => LlmError::AuthenticationError(message),
        429 => LlmError::RateLimitError {
            message,
            retry_after,
        },
        _ => LlmError::ApiError {
            code: status,
            message,
            details,
        },
    }
}

/// Parse a `Retry-After` header value: delay seconds or an HTTP date.
///
/// Dates in the past yield a zero delay.
pub fn parse_retry_after(value: &str) -> Option<Duration> {
    parse_retry_after_at(value, Utc::now())
}

fn parse_retry_after_at(value: &str, now: DateTime<Utc>) -> Option<Duration> {
    let value = value.trim();
    if let Ok(secs) = value.parse::<u64>() {
        return Some(Duration::from_secs(secs));
    }
    let at = DateTime::parse_from_rfc2822(value).ok()?;
    Some(
        (at.with_timezone(&Utc) - now)
            .to_std()
            .unwrap_or(Duration::ZERO),
    )
}

impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::TimeoutError(err.to_string())
        } else if err.is_decode() {
            Self::ParseError(err.to_string())
        } else if err.is_builder() {
            Self::ConfigurationError(err.to_string())
        } else {
            Self::NetworkError(err.to_string())
        }
    }
}

impl From<serde_json::Error> for LlmError {
    fn from(err: serde_json::Error) -> Self {
        Self::JsonError(err.to_string())
    }
}

impl From<std::io::Error> for LlmError {
    fn from(err: std::io::Error) -> Self {
        Self::IoError(err.to_string())
    }
}
