use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use super::error::{EvaluationError, EvaluationResult};
use super::log::EvaluationLog;
use super::metrics::{context_precision, lexical_hallucination, parse_judge_score};
use super::{EvaluationMetrics, EvaluationRequest, Evaluator};
use crate::constants::DEFAULT_SEARCH_K;
use crate::llm::{AnswerGenerator, judge_prompt};
use crate::retrieval::{PassageSource, corpus_candidates};
use crate::scoring::LexicalRanker;

/// Default [`Evaluator`].
///
/// Hallucination comes from a judge model when one is configured and from
/// [`lexical_hallucination`] otherwise. Document answers without ground truth
/// are checked against the corpus' own top passages when a passage source is
/// attached.
pub struct JudgeEvaluator {
    judge: Option<Arc<dyn AnswerGenerator>>,
    passages: Option<Arc<dyn PassageSource>>,
    search_k: usize,
    log: Option<EvaluationLog>,
}

impl JudgeEvaluator {
    pub fn new() -> Self {
        Self {
            judge: None,
            passages: None,
            search_k: DEFAULT_SEARCH_K,
            log: None,
        }
    }

    pub fn with_judge(mut self, judge: Arc<dyn AnswerGenerator>) -> Self {
        self.judge = Some(judge);
        self
    }

    pub fn with_passages(mut self, passages: Arc<dyn PassageSource>, search_k: usize) -> Self {
        self.passages = Some(passages);
        self.search_k = search_k;
        self
    }

    pub fn with_log(mut self, log: EvaluationLog) -> Self {
        self.log = Some(log);
        self
    }

    async fn reference_passages(&self, request: &EvaluationRequest) -> EvaluationResult<Vec<String>> {
        if !request.ground_truth.is_empty() {
            return Ok(request.ground_truth.clone());
        }
        if request.is_web {
            return Err(EvaluationError::MissingGroundTruth);
        }
        let Some(source) = &self.passages else {
            return Err(EvaluationError::MissingGroundTruth);
        };

        let candidates =
            corpus_candidates(source.as_ref(), &request.query, &request.corpus, self.search_k)
                .await?;
        let chunks: Vec<String> = LexicalRanker::default()
            .rank_top(&request.query, &candidates, candidates.len())
            .into_passages()
            .into_iter()
            .map(|p| p.text)
            .collect();

        info!(chunks = chunks.len(), "Retrieved corpus chunks as ground truth");
        if chunks.is_empty() {
            return Err(EvaluationError::MissingGroundTruth);
        }
        Ok(chunks)
    }

    async fn hallucination(&self, request: &EvaluationRequest, reference: &[String]) -> EvaluationResult<f32> {
        match &self.judge {
            Some(judge) => {
                let reply = judge
                    .generate(&judge_prompt(&request.query, &request.answer, reference))
                    .await?;
                parse_judge_score(&reply)
            }
            None => Ok(lexical_hallucination(&request.answer, reference)),
        }
    }
}

impl Default for JudgeEvaluator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Evaluator for JudgeEvaluator {
    #[instrument(skip(self, request), fields(is_web = request.is_web))]
    async fn evaluate(&self, request: &EvaluationRequest) -> EvaluationResult<EvaluationMetrics> {
        let reference = self.reference_passages(request).await?;

        let metrics = EvaluationMetrics {
            hallucination: self.hallucination(request, &reference).await?,
            context_precision: context_precision(&request.answer, &reference),
        };
        debug!(
            hallucination = metrics.hallucination,
            context_precision = metrics.context_precision,
            "Evaluation scored"
        );

        if let Some(log) = &self.log
            && let Err(e) = log
                .record(&request.query, &request.answer, &reference, metrics, request.is_web)
                .await
        {
            warn!(error = %e, "Failed to save evaluation results");
        }

        Ok(metrics)
    }
}

impl std::fmt::Debug for JudgeEvaluator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JudgeEvaluator")
            .field("judge", &self.judge.as_ref().map(|j| j.model_name().to_string()))
            .field("has_passages", &self.passages.is_some())
            .field("search_k", &self.search_k)
            .field("log", &self.log)
            .finish()
    }
}
