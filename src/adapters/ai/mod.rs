//! AI draft generation adapters.

mod openai_provider;

pub use openai_provider::{OpenAiConfig, OpenAiDraftProvider};
