use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use super::error::{AgentError, AgentResult};
use super::state::{AgentState, AgentStep, RoutingPolicy, transition};
use super::types::{AgentResponse, EvaluationStatus};
use crate::cache::{CacheKey, ResponseCache};
use crate::evaluation::{EvaluationRequest, Evaluator};
use crate::hashing::query_fingerprint;
use crate::query::{CorpusSelector, QueryClass, QueryContext};
use crate::retrieval::{DocumentAnswer, DocumentRetriever};
use crate::websearch::{WebAnswer, WebSearcher};

/// Reason reported when a degraded answer skips evaluation.
pub const DEGRADED_NOT_EVALUATED: &str = "degraded answer not evaluated";

/// Confidence-gated question answering over documents with web fallback.
///
/// Each run walks [`AgentStep`]s sequentially. Concurrent runs share only the
/// response cache. Collaborator failures never abort a run: the failing step
/// is replaced by a degraded placeholder and the run continues.
pub struct ConfidenceRouter {
    retriever: Arc<dyn DocumentRetriever>,
    web: Arc<dyn WebSearcher>,
    evaluator: Arc<dyn Evaluator>,
    cache: Arc<dyn ResponseCache<AgentResponse>>,
    policy: RoutingPolicy,
}

impl ConfidenceRouter {
    pub fn new(
        retriever: Arc<dyn DocumentRetriever>,
        web: Arc<dyn WebSearcher>,
        evaluator: Arc<dyn Evaluator>,
        cache: Arc<dyn ResponseCache<AgentResponse>>,
        policy: RoutingPolicy,
    ) -> Self {
        Self {
            retriever,
            web,
            evaluator,
            cache,
            policy,
        }
    }

    pub fn policy(&self) -> &RoutingPolicy {
        &self.policy
    }

    pub fn cache(&self) -> &Arc<dyn ResponseCache<AgentResponse>> {
        &self.cache
    }

    /// `true` once the retriever has something to search.
    pub fn has_documents(&self) -> bool {
        self.retriever.has_documents()
    }

    /// Answers `query` from `corpus` (empty = all data), falling back to the web.
    ///
    /// Fails with [`AgentError::InvalidArgument`] on a blank query and with
    /// [`AgentError::NoData`] when nothing is indexed and nothing is cached.
    #[instrument(
        skip(self, query, corpus),
        fields(
            run_id = tracing::field::Empty,
            query_fp = %query_fingerprint(query),
            corpus_size = corpus.len()
        )
    )]
    pub async fn run(
        &self,
        query: &str,
        corpus: &CorpusSelector,
        evaluate: bool,
    ) -> AgentResult<AgentResponse> {
        if query.trim().is_empty() {
            return Err(AgentError::InvalidArgument(
                "query must not be empty".to_string(),
            ));
        }

        let run_id = uuid::Uuid::new_v4().to_string();
        tracing::Span::current().record("run_id", tracing::field::display(&run_id));

        let key = CacheKey::new(
            query,
            QueryClass::Document,
            &QueryContext::corpus(corpus.clone()),
        );

        if let Some(mut cached) = self.cache.get_by_key(&key) {
            if !evaluate || cached.evaluation.is_scored() {
                info!(key_hash = key.fingerprint(), "Serving cached response");
                if !evaluate {
                    cached.evaluation = EvaluationStatus::NotRequested;
                }
                cached.metadata.cached = true;
                cached.metadata.run_id = run_id;
                return Ok(cached);
            }
            debug!(
                key_hash = key.fingerprint(),
                "Cached response lacks metrics, recomputing"
            );
        }

        if !self.retriever.has_documents() {
            return Err(AgentError::NoData);
        }

        let mut state = AgentState::new(query, corpus.clone(), evaluate);
        let mut step = AgentStep::DocRetrieval;
        while step != AgentStep::End {
            self.execute(step, &mut state).await;
            let next = transition(step, &state, &self.policy);
            debug!(from = ?step, to = ?next, confidence = state.confidence, "Step transition");
            step = next;
        }

        let response = state.into_response(&self.policy, &run_id);

        if response.metadata.degraded {
            debug!("Degraded answer, not caching");
        } else {
            self.cache.set_by_key(key, response.clone());
        }

        info!(
            source = ?response.source,
            confidence = response.metadata.confidence,
            degraded = response.metadata.degraded,
            "Run complete"
        );
        Ok(response)
    }

    async fn execute(&self, step: AgentStep, state: &mut AgentState) {
        match step {
            AgentStep::DocRetrieval => {
                let answer = match self.retriever.retrieve(&state.query, &state.corpus).await {
                    Ok(answer) => answer,
                    Err(e) => {
                        let err = AgentError::UpstreamUnavailable {
                            component: "document retrieval",
                            message: e.to_string(),
                        };
                        warn!(error = %err, "Using degraded document answer");
                        DocumentAnswer::degraded()
                    }
                };
                info!(
                    confidence = answer.confidence,
                    threshold = self.policy.threshold(),
                    "Document answer retrieved"
                );
                state.apply_document(answer);
            }
            AgentStep::WebSearch => {
                let answer = match self.web.search(&state.query).await {
                    Ok(answer) => answer,
                    Err(e) => {
                        let err = AgentError::UpstreamUnavailable {
                            component: "web search",
                            message: e.to_string(),
                        };
                        warn!(error = %err, "Using placeholder web answer");
                        WebAnswer::placeholder()
                    }
                };
                state.apply_web(answer);
            }
            AgentStep::Evaluation => {
                let request = EvaluationRequest {
                    query: state.query.clone(),
                    answer: state.final_answer.clone(),
                    ground_truth: state.ground_truth(),
                    is_web: state.web_answer.is_some(),
                    corpus: state.corpus.clone(),
                };
                state.evaluation = match self.evaluator.evaluate(&request).await {
                    Ok(metrics) => EvaluationStatus::Scored { metrics },
                    Err(e) => {
                        warn!(error = %e, "Evaluation failed");
                        EvaluationStatus::Failed {
                            reason: e.to_string(),
                        }
                    }
                };
            }
            AgentStep::End => {}
        }

        if step != AgentStep::Evaluation
            && state.evaluate_requested
            && state.final_degraded
        {
            state.evaluation = EvaluationStatus::Failed {
                reason: DEGRADED_NOT_EVALUATED.to_string(),
            };
        }
    }
}

impl std::fmt::Debug for ConfidenceRouter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfidenceRouter")
            .field("policy", &self.policy)
            .field("cached_entries", &self.cache.len())
            .finish_non_exhaustive()
    }
}
