//! Answer quality evaluation.
//!
//! Two metrics, both in `[0, 1]`: `hallucination` (share of the answer not
//! supported by the reference text, lower is better) and `context_precision`
//! (whether some reference snippet supports the answer at all).

pub mod error;
pub mod judge;
pub mod log;
pub mod metrics;
#[cfg(any(test, feature = "mock"))]
pub mod mock;


use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::query::CorpusSelector;

pub use error::{EvaluationError, EvaluationResult};
pub use judge::JudgeEvaluator;
pub use log::{EvaluationLog, EvaluationRecord};
pub use metrics::{context_precision, keyword_overlap, lexical_hallucination, parse_judge_score};
#[cfg(any(test, feature = "mock"))]
pub use mock::MockEvaluator;

/// Everything an evaluator needs about one answer.
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationRequest {
    pub query: String,
    pub answer: String,
    /// Reference snippets. Web answers carry their search snippets; document
    /// answers arrive with none.
    pub ground_truth: Vec<String>,
    pub is_web: bool,
    /// Corpus the document answer was drawn from.
    pub corpus: CorpusSelector,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EvaluationMetrics {
    pub hallucination: f32,
    pub context_precision: f32,
}

impl EvaluationMetrics {
    pub fn to_map(&self) -> BTreeMap<String, f32> {
        BTreeMap::from([
            ("hallucination".to_string(), self.hallucination),
            ("context_precision".to_string(), self.context_precision),
        ])
    }
}

/// Scores an answer.
#[async_trait]
pub trait Evaluator: Send + Sync {
    async fn evaluate(&self, request: &EvaluationRequest) -> EvaluationResult<EvaluationMetrics>;
}
