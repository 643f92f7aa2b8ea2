//! Prompt-in, envelope-out analysis over an injected [`TextModel`].

use serde::de::DeserializeOwned;

use crate::error::LlmError;
use crate::extract::{ExtractionResult, Extractor};
use crate::retry::{RetryExecutor, RetryPolicy};
use crate::traits::TextModel;
use crate::types::Prompt;

/// Runs prompts against a model and extracts structured data from the replies.
///
/// A failed model call is an `Err`. A reply without usable JSON is an `Ok`
/// envelope with `is_structured() == false`.
///
/// ```rust,no_run
/// use llm_envelope::prelude::*;
///
/// # async fn run() -> Result<(), LlmError> {
/// let client = OpenAiCompatibleClient::new(OpenAiCompatibleConfig::from_env("OPENAI")?)?;
/// let assistant = Assistant::new(client).with_retry(RetryPolicy::default());
///
/// let result = assistant.analyze(Prompt::user("Summarize as JSON: ...")).await?;
/// match result.structured_data() {
///     Some(data) => println!("structured: {data}"),
///     None => println!("raw only: {}", result.raw_response()),
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Assistant<M> {
    model: M,
    extractor: Extractor,
    retry: Option<RetryPolicy>,
}

impl<M: TextModel> Assistant<M> {
    pub fn new(model: M) -> Self {
        Self {
            model,
            extractor: Extractor::default(),
            retry: None,
        }
    }

    pub fn with_extractor(mut self, extractor: Extractor) -> Self {
        self.extractor = extractor;
        self
    }

    /// Retry failed model calls. Extraction is never retried.
    ///
    /// Ignored when the model carries its own retry policy
    /// ([`TextModel::retry_policy`]); retries are never layered.
    pub fn with_retry(mut self, policy: RetryPolicy) -> Self {
        self.retry = Some(policy);
        self
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    pub fn extractor(&self) -> Extractor {
        self.extractor
    }

    /// Call the model and wrap its reply in an [`ExtractionResult`].
    #[tracing::instrument(name = "analyze", skip_all, fields(model = %self.model.model_id()))]
    pub async fn analyze(&self, prompt: Prompt) -> Result<ExtractionResult, LlmError> {
        let policy = RetryPolicy::layered(self.retry.as_ref(), self.model.retry_policy());
        let completion = match policy {
            Some(policy) => {
                let prompt = &prompt;
                RetryExecutor::new(policy.clone())
                    .execute(|| async move { self.model.complete(prompt).await })
                    .await
            }
            None => self.model.complete(&prompt).await,
        }
        .inspect_err(|e| tracing::error!(error = %e, "model call failed"))?;

        let result = self.extractor.extract(&completion.text);
        if result.is_structured() {
            tracing::info!("model response contained structured data");
        } else {
            tracing::info!(
                len = completion.text.len(),
                "model response has no structured data, keeping raw text"
            );
        }
        Ok(result)
    }

    /// [`analyze`](Self::analyze), then deserialize the structured data.
    ///
    /// Unstructured replies surface as [`LlmError::ParseError`].
    pub async fn analyze_as<T: DeserializeOwned>(&self, prompt: Prompt) -> Result<T, LlmError> {
        self.analyze(prompt).await?.deserialize_into()
    }
}
