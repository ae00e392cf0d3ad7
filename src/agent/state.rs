//! Per-run state and the pure step transition function.

use crate::constants::DOC_NOT_FOUND_ANSWER;
use crate::query::CorpusSelector;
use crate::retrieval::DocumentAnswer;
use crate::websearch::WebAnswer;

use super::error::{AgentError, AgentResult};
use super::types::{AgentResponse, AnswerSource, EvaluationStatus, ResponseMetadata};

/// Steps of one run. `DocRetrieval` is the entry, `End` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AgentStep {
    DocRetrieval,
    WebSearch,
    Evaluation,
    End,
}

/// Routing threshold on the document confidence.
///
/// The confidence is a lexical-overlap proxy, so the threshold is a
/// relevance gate rather than a correctness probability. There is no default.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoutingPolicy {
    threshold: f32,
}

impl RoutingPolicy {
    pub fn new(threshold: f32) -> AgentResult<Self> {
        if !(0.0..=1.0).contains(&threshold) {
            return Err(AgentError::InvalidArgument(format!(
                "confidence threshold {} is outside [0, 1]",
                threshold
            )));
        }
        Ok(Self { threshold })
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// `true` when the document answer is trusted as is.
    #[inline]
    pub fn accepts(&self, confidence: f32) -> bool {
        confidence >= self.threshold
    }
}

/// Mutable record of a single run.
#[derive(Debug, Clone)]
pub struct AgentState {
    pub query: String,
    pub corpus: CorpusSelector,
    pub evaluate_requested: bool,
    pub doc_answer: Option<DocumentAnswer>,
    pub confidence: f32,
    pub web_answer: Option<WebAnswer>,
    pub final_answer: String,
    pub final_source: AnswerSource,
    pub final_degraded: bool,
    pub evaluation: EvaluationStatus,
}

impl AgentState {
    pub fn new(query: impl Into<String>, corpus: CorpusSelector, evaluate_requested: bool) -> Self {
        Self {
            query: query.into(),
            corpus,
            evaluate_requested,
            doc_answer: None,
            confidence: 0.0,
            web_answer: None,
            final_answer: String::new(),
            final_source: AnswerSource::Document,
            final_degraded: false,
            evaluation: EvaluationStatus::NotRequested,
        }
    }

    /// Records the document answer and makes it the tentative final answer.
    pub fn apply_document(&mut self, answer: DocumentAnswer) {
        self.confidence = answer.confidence;
        self.final_answer = answer.answer.clone();
        self.final_source = AnswerSource::Document;
        self.final_degraded = answer.is_degraded();
        self.doc_answer = Some(answer);
    }

    /// Records the web answer; it always replaces the final answer.
    pub fn apply_web(&mut self, answer: WebAnswer) {
        self.final_answer = answer.answer.clone();
        self.final_source = AnswerSource::Web;
        self.final_degraded = answer.is_degraded();
        self.web_answer = Some(answer);
    }

    /// `true` when the evaluation step should run for the current answer.
    pub fn wants_evaluation(&self) -> bool {
        self.evaluate_requested && !self.final_degraded
    }

    /// Snippets the final answer was generated from, for web answers only.
    pub fn ground_truth(&self) -> Vec<String> {
        match (self.final_source, &self.web_answer) {
            (AnswerSource::Web, Some(web)) => web.ground_truth.clone(),
            _ => Vec::new(),
        }
    }

    /// Assembles the caller-facing response.
    pub fn into_response(self, policy: &RoutingPolicy, run_id: &str) -> AgentResponse {
        let final_answer = if self.final_answer.is_empty() {
            DOC_NOT_FOUND_ANSWER.to_string()
        } else {
            self.final_answer
        };

        let citations = match (self.final_source, &self.doc_answer) {
            (AnswerSource::Document, Some(doc)) => doc.metadata.sources.clone(),
            _ => Vec::new(),
        };
        let source_urls = match (self.final_source, self.web_answer) {
            (AnswerSource::Web, Some(web)) => web.sources,
            _ => Vec::new(),
        };

        AgentResponse {
            answer: final_answer,
            source: self.final_source,
            metadata: ResponseMetadata {
                confidence: self.confidence,
                threshold: policy.threshold(),
                citations,
                degraded: self.final_degraded,
                cached: false,
                run_id: run_id.to_string(),
            },
            evaluation: self.evaluation,
            source_urls,
        }
    }
}

/// Next step after `step` has run against `state`.
///
/// Low confidence always goes to web search, whether or not evaluation was
/// requested. A degraded answer is never evaluated.
pub fn transition(step: AgentStep, state: &AgentState, policy: &RoutingPolicy) -> AgentStep {
    match step {
        AgentStep::DocRetrieval if !policy.accepts(state.confidence) => AgentStep::WebSearch,
        AgentStep::DocRetrieval | AgentStep::WebSearch => {
            if state.wants_evaluation() {
                AgentStep::Evaluation
            } else {
                AgentStep::End
            }
        }
        AgentStep::Evaluation | AgentStep::End => AgentStep::End,
    }
}
