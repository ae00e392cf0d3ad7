use async_trait::async_trait;
use parking_lot::Mutex;

use super::error::{EvaluationError, EvaluationResult};
use super::{EvaluationMetrics, EvaluationRequest, Evaluator};

/// Scripted [`Evaluator`] that records every request.
#[derive(Debug)]
pub struct MockEvaluator {
    metrics: Option<EvaluationMetrics>,
    requests: Mutex<Vec<EvaluationRequest>>,
}

impl MockEvaluator {
    pub fn scoring(hallucination: f32, context_precision: f32) -> Self {
        Self {
            metrics: Some(EvaluationMetrics {
                hallucination,
                context_precision,
            }),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            metrics: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<EvaluationRequest> {
        self.requests.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().len()
    }
}

#[async_trait]
impl Evaluator for MockEvaluator {
    async fn evaluate(&self, request: &EvaluationRequest) -> EvaluationResult<EvaluationMetrics> {
        self.requests.lock().push(request.clone());
        self.metrics.ok_or(EvaluationError::MissingGroundTruth)
    }
}
