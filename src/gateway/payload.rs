use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::agent::{AgentResponse, AnswerSource, EvaluationStatus, ResponseMetadata};

/// Body of `POST /v1/query`.
#[derive(Debug, Clone, Deserialize)]
pub struct QueryRequest {
    pub question: String,

    /// Corpus to answer from; empty means all indexed data.
    #[serde(default)]
    pub sources: Vec<String>,

    #[serde(default)]
    pub evaluate: bool,
}

/// Body returned by `POST /v1/query`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryResponse {
    pub answer: String,
    pub source: AnswerSource,
    pub metadata: ResponseMetadata,
    pub evaluation: EvaluationStatus,
    pub metrics: BTreeMap<String, f32>,
    pub source_urls: Vec<String>,
}

impl From<AgentResponse> for QueryResponse {
    fn from(response: AgentResponse) -> Self {
        let metrics = response.metrics();
        Self {
            answer: response.answer,
            source: response.source,
            metadata: response.metadata,
            evaluation: response.evaluation,
            metrics,
            source_urls: response.source_urls,
        }
    }
}

/// Body of `POST /v1/documents`.
#[derive(Debug, Clone, Deserialize)]
pub struct DocumentRequest {
    /// File name or URL the text came from. Text from a URL is stored under
    /// the shared `web_content` label.
    pub source: String,
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentResponse {
    /// Label the passages were stored under.
    pub source: String,
    pub chunks: usize,
    pub total_passages: usize,
}
