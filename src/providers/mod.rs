//! Provider clients implementing [`TextModel`](crate::traits::TextModel).

pub mod openai_compatible;

pub use openai_compatible::{OpenAiCompatibleClient, OpenAiCompatibleConfig};
