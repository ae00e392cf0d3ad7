use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::evaluation::EvaluationMetrics;

/// Which path produced the final answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnswerSource {
    Document,
    Web,
}

/// Outcome of the evaluation step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum EvaluationStatus {
    NotRequested,
    Failed { reason: String },
    Scored { metrics: EvaluationMetrics },
}

impl EvaluationStatus {
    pub fn is_scored(&self) -> bool {
        matches!(self, EvaluationStatus::Scored { .. })
    }

    pub fn metrics(&self) -> Option<EvaluationMetrics> {
        match self {
            EvaluationStatus::Scored { metrics } => Some(*metrics),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseMetadata {
    /// Lexical confidence of the document answer.
    pub confidence: f32,
    /// Threshold the confidence was compared against.
    pub threshold: f32,
    /// Sources cited by a document answer.
    pub citations: Vec<String>,
    /// Set when the final answer is a placeholder for a failed step.
    pub degraded: bool,
    /// Set when served from the response cache.
    pub cached: bool,
    /// Run that served this response.
    pub run_id: String,
}

/// Final, caller-facing result of one router run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentResponse {
    pub answer: String,
    pub source: AnswerSource,
    pub metadata: ResponseMetadata,
    pub evaluation: EvaluationStatus,
    /// URLs behind a web answer.
    pub source_urls: Vec<String>,
}

impl AgentResponse {
    /// Metric name to score; empty unless evaluation was scored.
    pub fn metrics(&self) -> BTreeMap<String, f32> {
        self.evaluation
            .metrics()
            .map(|m| m.to_map())
            .unwrap_or_default()
    }
}
