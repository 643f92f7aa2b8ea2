//! # llm-envelope
//!
//! Recover structured JSON from the free-text replies of large language
//! models, and wrap raw text plus recovered data in one uniform envelope.
//!
#![deny(unsafe_code)]

//! ## Features
//!
//! - **Total extraction**: [`extract::extract`] accepts any string and never
//!   fails; a reply without usable JSON is an ordinary envelope with
//!   `is_structured() == false`.
//! - **Fences and prose**: fenced ```` ```json ```` blocks are unwrapped, JSON
//!   objects buried in prose are located by a first-`{`/last-`}` span, with a
//!   string-aware bracket scanner available as an opt-in.
//! - **Injected models**: the [`TextModel`](traits::TextModel) trait is the
//!   only seam to a provider, so tests swap in fakes and applications choose
//!   their own client.
//! - **OpenAI-compatible client**: text and vision prompts over
//!   `/chat/completions`, with typed errors and optional retries.
//!
//! ## Quick Start
//!
//! ```rust
//! use llm_envelope::prelude::*;
//!
//! let result = extract("```json\n{\"a\": 1}\n```");
//! assert!(result.is_structured());
//! assert_eq!(result.structured_data().unwrap()["a"], 1);
//!
//! let result = extract("no json here");
//! assert_eq!(result.structured_data(), None);
//! ```

pub mod assistant;
pub mod error;
pub mod extract;
pub mod prompt;
pub mod providers;
pub mod retry;
pub mod telemetry;
pub mod traits;
pub mod types;

pub use error::LlmError;

/// Commonly used types in one import.
pub mod prelude {
    pub use crate::assistant::Assistant;
    pub use crate::error::{ErrorCategory, LlmError};
    pub use crate::extract::{ExtractionResult, Extractor, SpanStrategy, extract};
    pub use crate::prompt::PromptBuilder;
    pub use crate::providers::{OpenAiCompatibleClient, OpenAiCompatibleConfig};
    pub use crate::retry::RetryPolicy;
    pub use crate::traits::TextModel;
    pub use crate::types::{Completion, ImagePart, Prompt, Usage};
}
