use async_trait::async_trait;
use genai::Client;
use genai::chat::{ChatMessage, ChatOptions, ChatRequest};
use tracing::{debug, error, instrument};

use super::AnswerGenerator;
use super::error::{LlmError, LlmResult};
use crate::constants::{DEFAULT_LLM_MAX_TOKENS, DEFAULT_LLM_TEMPERATURE};

/// Sampling options applied to every call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationOptions {
    pub temperature: f64,
    pub max_tokens: u32,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            temperature: DEFAULT_LLM_TEMPERATURE,
            max_tokens: DEFAULT_LLM_MAX_TOKENS,
        }
    }
}

/// [`AnswerGenerator`] backed by the `genai` multi-provider client.
///
/// The provider is picked by `genai` from the model name; credentials come
/// from the provider's usual environment variables.
#[derive(Clone)]
pub struct GenaiGenerator {
    client: Client,
    model: String,
    options: GenerationOptions,
}

impl GenaiGenerator {
    pub fn new(model: impl Into<String>, options: GenerationOptions) -> Self {
        Self::with_client(Client::default(), model, options)
    }

    pub fn with_client(client: Client, model: impl Into<String>, options: GenerationOptions) -> Self {
        Self {
            client,
            model: model.into(),
            options,
        }
    }

    pub fn options(&self) -> GenerationOptions {
        self.options
    }

    fn chat_options(&self) -> ChatOptions {
        ChatOptions::default()
            .with_temperature(self.options.temperature)
            .with_max_tokens(self.options.max_tokens)
    }
}

#[async_trait]
impl AnswerGenerator for GenaiGenerator {
    #[instrument(skip(self, prompt), fields(model = %self.model, prompt_len = prompt.len()))]
    async fn generate(&self, prompt: &str) -> LlmResult<String> {
        let request = ChatRequest::new(vec![ChatMessage::user(prompt)]);
        let options = self.chat_options();

        let response = self
            .client
            .exec_chat(&self.model, request, Some(&options))
            .await
            .map_err(|e| {
                error!(error = %e, "Provider error");
                LlmError::Provider {
                    model: self.model.clone(),
                    message: e.to_string(),
                }
            })?;

        let text = response.first_text().unwrap_or_default().trim().to_string();
        if text.is_empty() {
            return Err(LlmError::EmptyResponse {
                model: self.model.clone(),
            });
        }

        debug!(chars = text.len(), "Provider answered");
        Ok(text)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

impl std::fmt::Debug for GenaiGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenaiGenerator")
            .field("model", &self.model)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}
