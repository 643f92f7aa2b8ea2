//! Model capability traits

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::LlmError;
use crate::retry::RetryPolicy;
use crate::types::{Completion, Prompt};

/// Anything that turns a prompt into response text.
///
/// Clients are built explicitly and handed to the code that needs them,
/// which also makes them easy to replace with a fake in tests.
#[async_trait]
pub trait TextModel: Send + Sync {
    /// Run one completion. Network, authentication and rate-limit failures
    /// are reported here, before any extraction happens.
    async fn complete(&self, prompt: &Prompt) -> Result<Completion, LlmError>;

    /// Identifier of the model used for requests.
    fn model_id(&self) -> &str;

    /// Retry policy the model applies inside [`complete`](Self::complete).
    ///
    /// Callers holding their own policy skip it when this is set, so
    /// attempts never multiply.
    fn retry_policy(&self) -> Option<&RetryPolicy> {
        None
    }

    /// Convenience wrapper returning only the response text.
    async fn ask(&self, text: String) -> Result<String, LlmError> {
        let completion = self.complete(&Prompt::user(text)).await?;
        Ok(completion.text)
    }
}

#[async_trait]
impl<T: TextModel + ?Sized> TextModel for Arc<T> {
    async fn complete(&self, prompt: &Prompt) -> Result<Completion, LlmError> {
        (**self).complete(prompt).await
    }

    fn model_id(&self) -> &str {
        (**self).model_id()
    }

    fn retry_policy(&self) -> Option<&RetryPolicy> {
        (**self).retry_policy()
    }
}
