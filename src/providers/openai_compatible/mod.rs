//! OpenAI-compatible provider
//!
//! One client for every service that speaks the `/chat/completions` wire
//! format. Text and vision prompts are both supported; images travel as
//! `image_url` content parts with `data:` URLs.

mod client;
mod config;
mod types;

pub use client::OpenAiCompatibleClient;
pub use config::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT, OpenAiCompatibleConfig};
