//! Retries for model calls
//!
//! Delays double from `initial_delay` up to `max_delay`, with a little
//! random spread so parallel callers do not retry in lockstep. A provider's
//! `Retry-After` hint is honored when it asks for a longer wait.
//!
//! Extraction never retries. Model calls retry at exactly one layer: see
//! [`RetryPolicy::layered`].

use std::future::Future;
use std::time::Duration;

use rand::Rng;
use tokio::time::sleep;

use crate::error::LlmError;

/// Spread applied around each delay, as a fraction of it.
const JITTER: f64 = 0.1;

/// When and how long to wait before repeating a failed model call.
///
/// Only errors for which [`LlmError::is_retryable`] holds are retried.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    max_attempts: u32,
    initial_delay: Duration,
    max_delay: Duration,
    jitter: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(60),
            jitter: true,
        }
    }
}

impl RetryPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total attempts, the first call included. Zero is treated as one.
    pub const fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    pub const fn with_initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    /// Upper bound for every wait, `Retry-After` hints included.
    pub const fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    pub const fn with_jitter(mut self, jitter: bool) -> Self {
        self.jitter = jitter;
        self
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }

    /// Backoff before retry number `retry` (0-based), without jitter.
    pub fn backoff(&self, retry: u32) -> Duration {
        let factor = 2u32.saturating_pow(retry);
        self.initial_delay
            .saturating_mul(factor)
            .min(self.max_delay)
    }

    /// Wait before retry number `retry` after `error`.
    ///
    /// The jittered backoff, or the error's `Retry-After` hint when that is
    /// longer. Never above `max_delay`.
    pub fn delay_for(&self, retry: u32, error: &LlmError) -> Duration {
        let mut delay = self.backoff(retry);
        if self.jitter && !delay.is_zero() {
            let spread = rand::thread_rng().gen_range(1.0 - JITTER..=1.0 + JITTER);
            delay = delay.mul_f64(spread);
        }
        if let Some(hint) = error.retry_after() {
            delay = delay.max(hint);
        }
        delay.min(self.max_delay)
    }

    /// Policy a caller should apply around a model call.
    ///
    /// Retries never nest: when the model already retries with its own
    /// policy, the caller's policy is dropped and the caller makes a single
    /// attempt.
    pub fn layered<'a>(caller: Option<&'a Self>, model: Option<&Self>) -> Option<&'a Self> {
        match (caller, model) {
            (Some(_), Some(_)) => {
                tracing::debug!("model retries on its own, skipping outer retry policy");
                None
            }
            (caller, None) => caller,
            (None, Some(_)) => None,
        }
    }
}

/// Runs an operation under a [`RetryPolicy`].
#[derive(Debug, Clone)]
pub struct RetryExecutor {
    policy: RetryPolicy,
}

impl RetryExecutor {
    pub const fn new(policy: RetryPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Execute `operation`, retrying retryable failures.
    ///
    /// The last error is returned once attempts run out.
    pub async fn execute<F, Fut, T>(&self, mut operation: F) -> Result<T, LlmError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, LlmError>>,
    {
        let max_attempts = self.policy.max_attempts();
        let mut attempt = 0;

        loop {
            let error = match operation().await {
                Ok(result) => return Ok(result),
                Err(error) => error,
            };

            attempt += 1;
            if attempt >= max_attempts || !error.is_retryable() {
                return Err(error);
            }

            let delay = self.policy.delay_for(attempt - 1, &error);
            tracing::warn!(
                attempt,
                max_attempts,
                delay_ms = delay.as_millis() as u64,
                error = %error,
                "retrying model call"
            );
            sleep(delay).await;
        }
    }
}
