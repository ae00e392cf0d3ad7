//! Text generation collaborator.
//!
//! The engine never looks inside a model; it hands over a finished prompt
//! and gets text back. [`GenaiGenerator`] talks to real providers through
//! `genai`; [`OfflineGenerator`] runs without a provider and [`MockGenerator`]
//! scripts replies for tests.

pub mod error;
pub mod provider;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod offline;
pub mod prompt;


use async_trait::async_trait;

pub use error::{LlmError, LlmResult};
pub use provider::{GenaiGenerator, GenerationOptions};
#[cfg(any(test, feature = "mock"))]
pub use mock::MockGenerator;
pub use offline::OfflineGenerator;
pub use prompt::{document_prompt, judge_prompt, web_prompt};

/// Produces a completion for a single user prompt.
#[async_trait]
pub trait AnswerGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> LlmResult<String>;

    /// Model identifier, for logs and error messages.
    fn model_name(&self) -> &str;
}
