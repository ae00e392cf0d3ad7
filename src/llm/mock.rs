use async_trait::async_trait;
use parking_lot::Mutex;

use super::AnswerGenerator;
use super::error::{LlmError, LlmResult};
use super::offline::offline_reply;

const MOCK_MODEL: &str = "mock";

#[derive(Debug, Clone)]
enum Reply {
    Fixed(String),
    Fail(String),
    Echo,
}

/// Scripted [`AnswerGenerator`] that records every prompt.
#[derive(Debug)]
pub struct MockGenerator {
    reply: Reply,
    prompts: Mutex<Vec<String>>,
}

impl MockGenerator {
    /// Always answers `text`.
    pub fn fixed(text: impl Into<String>) -> Self {
        Self::with_reply(Reply::Fixed(text.into()))
    }

    /// Always fails with a provider error carrying `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self::with_reply(Reply::Fail(message.into()))
    }

    /// Answers with a short digest of the prompt it was given.
    pub fn echo() -> Self {
        Self::with_reply(Reply::Echo)
    }

    fn with_reply(reply: Reply) -> Self {
        Self {
            reply,
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Every prompt received so far, oldest first.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.prompts.lock().len()
    }
}

#[async_trait]
impl AnswerGenerator for MockGenerator {
    async fn generate(&self, prompt: &str) -> LlmResult<String> {
        self.prompts.lock().push(prompt.to_string());

        match &self.reply {
            Reply::Fixed(text) => Ok(text.clone()),
            Reply::Fail(message) => Err(LlmError::Provider {
                model: MOCK_MODEL.to_string(),
                message: message.clone(),
            }),
            Reply::Echo => Ok(offline_reply(prompt)),
        }
    }

    fn model_name(&self) -> &str {
        MOCK_MODEL
    }
}
