use async_trait::async_trait;

use super::AnswerGenerator;
use super::error::LlmResult;

pub(crate) const OFFLINE_MODEL: &str = "offline";

/// Reply that names the prompt length instead of answering it.
pub(crate) fn offline_reply(prompt: &str) -> String {
    format!(
        "Mock response for a {}-character prompt",
        prompt.chars().count()
    )
}

/// Provider-free [`AnswerGenerator`] selected by `DOCENT_MOCK_PROVIDER`.
///
/// Lets the server run end to end without credentials; every answer is a
/// deterministic placeholder.
#[derive(Debug, Default, Clone, Copy)]
pub struct OfflineGenerator;

#[async_trait]
impl AnswerGenerator for OfflineGenerator {
    async fn generate(&self, prompt: &str) -> LlmResult<String> {
        Ok(offline_reply(prompt))
    }

    fn model_name(&self) -> &str {
        OFFLINE_MODEL
    }
}
