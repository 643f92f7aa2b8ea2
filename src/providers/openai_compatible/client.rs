//! OpenAI-compatible chat client

use async_trait::async_trait;
use reqwest::header::RETRY_AFTER;
use secrecy::ExposeSecret;

use super::config::OpenAiCompatibleConfig;
use super::types::{ChatCompletionRequest, ChatCompletionResponse};
use crate::error::{LlmError, classify_http_error, parse_retry_after};
use crate::retry::{RetryExecutor, RetryPolicy};
use crate::traits::TextModel;
use crate::types::{Completion, Prompt};

/// [`TextModel`] backed by an OpenAI-style `/chat/completions` endpoint.
#[derive(Debug, Clone)]
pub struct OpenAiCompatibleClient {
    config: OpenAiCompatibleConfig,
    http_client: reqwest::Client,
}

impl OpenAiCompatibleClient {
    /// Validate `config` and build an HTTP client with its timeout.
    pub fn new(config: OpenAiCompatibleConfig) -> Result<Self, LlmError> {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| LlmError::ConfigurationError(format!("Failed to build HTTP client: {e}")))?;
        Self::with_http_client(config, http_client)
    }

    /// Use a caller-provided `reqwest::Client` (connection pool, proxy, ...).
    pub fn with_http_client(
        config: OpenAiCompatibleConfig,
        http_client: reqwest::Client,
    ) -> Result<Self, LlmError> {
        config.validate()?;
        Ok(Self {
            config,
            http_client,
        })
    }

    pub fn config(&self) -> &OpenAiCompatibleConfig {
        &self.config
    }

    async fn send_once(&self, prompt: &Prompt) -> Result<Completion, LlmError> {
        let body = ChatCompletionRequest::from_prompt(
            &self.config.model,
            prompt,
            self.config.temperature,
            self.config.max_tokens,
        );

        let response = self
            .http_client
            .post(self.config.chat_url())
            .bearer_auth(self.config.api_key.expose_secret())
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let retry_after = response.headers().get(RETRY_AFTER).and_then(|value| {
                let parsed = value.to_str().ok().and_then(parse_retry_after);
                if parsed.is_none() {
                    tracing::debug!(value = ?value, "ignoring unparseable Retry-After header");
                }
                parsed
            });
            let text = match response.text().await {
                Ok(text) => text,
                Err(e) => {
                    tracing::debug!(error = %e, "failed to read error response body");
                    String::new()
                }
            };
            let error = classify_http_error(status.as_u16(), &text, retry_after);
            tracing::debug!(status = status.as_u16(), error = %error, "chat completion failed");
            return Err(error);
        }

        let text = response.text().await?;
        let parsed: ChatCompletionResponse = serde_json::from_str(&text)
            .map_err(|e| LlmError::ParseError(format!("Invalid chat completion body: {e}")))?;
        Ok(parsed.into())
    }
}

#[async_trait]
impl TextModel for OpenAiCompatibleClient {
    #[tracing::instrument(
        name = "chat_completion",
        skip_all,
        fields(model = %self.config.model, images = prompt.images.len())
    )]
    async fn complete(&self, prompt: &Prompt) -> Result<Completion, LlmError> {
        let completion = match &self.config.retry {
            Some(policy) => {
                RetryExecutor::new(policy.clone())
                    .execute(|| async move { self.send_once(prompt).await })
                    .await?
            }
            None => self.send_once(prompt).await?,
        };
        tracing::debug!(
            len = completion.text.len(),
            finish_reason = completion.finish_reason.as_deref().unwrap_or("unknown"),
            "chat completion received"
        );
        Ok(completion)
    }

    fn model_id(&self) -> &str {
        &self.config.model
    }

    fn retry_policy(&self) -> Option<&RetryPolicy> {
        self.config.retry.as_ref()
    }
}
