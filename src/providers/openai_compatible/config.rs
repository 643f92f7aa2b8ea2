//! OpenAI-compatible client configuration

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};

use crate::error::LlmError;
use crate::retry::RetryPolicy;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Connection and sampling settings for an OpenAI-compatible endpoint.
///
/// Any service speaking the `/chat/completions` wire format works here
/// (OpenAI, xAI, Groq, DeepSeek, Gemini's compatibility endpoint, ...).
#[derive(Debug, Clone)]
pub struct OpenAiCompatibleConfig {
    pub api_key: SecretString,
    pub base_url: String,
    pub model: String,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    pub timeout: Duration,
    /// Retry policy applied to every completion call
    pub retry: Option<RetryPolicy>,
}

impl OpenAiCompatibleConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: SecretString::from(api_key.into()),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: String::new(),
            temperature: None,
            max_tokens: None,
            timeout: DEFAULT_TIMEOUT,
            retry: None,
        }
    }

    /// Read `<PREFIX>_API_KEY`, `<PREFIX>_BASE_URL` and `<PREFIX>_MODEL`.
    ///
    /// Only the API key is required; the base URL falls back to
    /// [`DEFAULT_BASE_URL`].
    pub fn from_env(prefix: &str) -> Result<Self, LlmError> {
        let var = |name: &str| std::env::var(format!("{prefix}_{name}")).ok();

        let api_key = var("API_KEY").ok_or_else(|| {
            LlmError::ConfigurationError(format!("{prefix}_API_KEY is not set"))
        })?;
        let mut config = Self::new(api_key);
        if let Some(base_url) = var("BASE_URL") {
            config = config.with_base_url(base_url);
        }
        if let Some(model) = var("MODEL") {
            config = config.with_model(model);
        }
        Ok(config)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub const fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub const fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_retry(mut self, policy: RetryPolicy) -> Self {
        self.retry = Some(policy);
        self
    }

    pub fn validate(&self) -> Result<(), LlmError> {
        if self.api_key.expose_secret().trim().is_empty() {
            return Err(LlmError::ConfigurationError(
                "API key cannot be empty".to_string(),
            ));
        }
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(LlmError::ConfigurationError(format!(
                "Base URL must be an http(s) URL, got {:?}",
                self.base_url
            )));
        }
        if self.model.trim().is_empty() {
            return Err(LlmError::ConfigurationError(
                "Model cannot be empty".to_string(),
            ));
        }
        if let Some(t) = self.temperature
            && !(0.0..=2.0).contains(&t)
        {
            return Err(LlmError::ConfigurationError(format!(
                "Temperature must be between 0.0 and 2.0, got {t}"
            )));
        }
        Ok(())
    }

    pub(crate) fn chat_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> OpenAiCompatibleConfig {
        OpenAiCompatibleConfig::new("sk-test").with_model("gpt-4o-mini")
    }

    #[test]
    fn test_defaults_and_setters() {
        let config = valid()
            .with_base_url("http://localhost:8080/v1/")
            .with_temperature(0.2)
            .with_max_tokens(512)
            .with_timeout(Duration::from_secs(5));
        assert_eq!(config.chat_url(), "http://localhost:8080/v1/chat/completions");
        assert_eq!(config.temperature, Some(0.2));
        assert_eq!(config.max_tokens, Some(512));
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert!(config.validate().is_ok());

        assert_eq!(OpenAiCompatibleConfig::new("k").base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_validate_rejects_bad_settings() {
        for config in [
            OpenAiCompatibleConfig::new("  ").with_model("m"),
            OpenAiCompatibleConfig::new("k"),
            valid().with_base_url("ftp://example.com"),
            valid().with_temperature(3.5),
        ] {
            assert!(matches!(
                config.validate(),
                Err(LlmError::ConfigurationError(_))
            ));
        }
    }

    #[test]
    fn test_debug_does_not_leak_key() {
        let rendered = format!("{:?}", valid());
        assert!(!rendered.contains("sk-test"));
    }

    #[test]
    fn test_from_env_requires_key() {
        let err = OpenAiCompatibleConfig::from_env("LLM_ENVELOPE_TEST_UNSET_PREFIX").unwrap_err();
        assert!(matches!(err, LlmError::ConfigurationError(ref m) if m.contains("_API_KEY")));
    }
}
