use std::sync::Arc;
use std::time::Duration;

use super::*;
use crate::cache::{InMemoryResponseCache, ResponseCache};
use crate::constants::{DOC_NOT_FOUND_ANSWER, WEB_NOT_FOUND_ANSWER};
use crate::evaluation::MockEvaluator;
use crate::query::CorpusSelector;
use crate::retrieval::{DocumentAnswer, MockRetriever, RetrievalMetadata};
use crate::scoring::Passage;
use crate::websearch::{MockWebSearch, WebAnswer};

const THRESHOLD: f32 = 0.5;

struct Harness {
    router: ConfidenceRouter,
    retriever: Arc<MockRetriever>,
    web: Arc<MockWebSearch>,
    evaluator: Arc<MockEvaluator>,
    cache: Arc<InMemoryResponseCache<AgentResponse>>,
}

fn harness(retriever: MockRetriever, web: MockWebSearch, evaluator: MockEvaluator) -> Harness {
    let retriever = Arc::new(retriever);
    let web = Arc::new(web);
    let evaluator = Arc::new(evaluator);
    let cache = Arc::new(InMemoryResponseCache::new(Duration::from_secs(3600)));

    let router = ConfidenceRouter::new(
        retriever.clone(),
        web.clone(),
        evaluator.clone(),
        cache.clone(),
        RoutingPolicy::new(THRESHOLD).unwrap(),
    );

    Harness {
        router,
        retriever,
        web,
        evaluator,
        cache,
    }
}

fn cited_document(confidence: f32) -> DocumentAnswer {
    DocumentAnswer {
        answer: "Answer: minus twenty\n\nCitations:\n[Doc 1] (acetone.pdf): flash...".to_string(),
        confidence,
        passages: vec![Passage::new("flash point minus twenty", "acetone.pdf")],
        metadata: RetrievalMetadata {
            candidates: 1,
            sources: vec!["acetone.pdf".to_string()],
            degraded: false,
        },
    }
}

fn web_hit() -> MockWebSearch {
    MockWebSearch::with_answer(
        "web says minus twenty",
        &["snippet one", "snippet two"],
        &["https://a.example", "https://b.example"],
    )
}

fn acetone() -> CorpusSelector {
    CorpusSelector::new(["acetone.pdf"])
}

fn state_with(confidence: f32, evaluate: bool, degraded: bool) -> AgentState {
    let mut state = AgentState::new("q", CorpusSelector::all(), evaluate);
    state.confidence = confidence;
    state.final_degraded = degraded;
    state
}

#[test]
fn test_transition_table() {
    let policy = RoutingPolicy::new(THRESHOLD).unwrap();

    let cases = [
        (AgentStep::DocRetrieval, 0.9, false, false, AgentStep::End),
        (AgentStep::DocRetrieval, 0.9, true, false, AgentStep::Evaluation),
        (AgentStep::DocRetrieval, 0.5, false, false, AgentStep::End),
        (AgentStep::DocRetrieval, 0.49, false, false, AgentStep::WebSearch),
        (AgentStep::DocRetrieval, 0.1, true, false, AgentStep::WebSearch),
        (AgentStep::WebSearch, 0.1, false, false, AgentStep::End),
        (AgentStep::WebSearch, 0.1, true, false, AgentStep::Evaluation),
        (AgentStep::WebSearch, 0.1, true, true, AgentStep::End),
        (AgentStep::Evaluation, 0.9, true, false, AgentStep::End),
        (AgentStep::End, 0.9, true, false, AgentStep::End),
    ];

    for (step, confidence, evaluate, degraded, expected) in cases {
        let state = state_with(confidence, evaluate, degraded);
        assert_eq!(
            transition(step, &state, &policy),
            expected,
            "{:?} conf={} eval={} degraded={}",
            step,
            confidence,
            evaluate,
            degraded
        );
    }
}

#[test]
fn test_policy_rejects_out_of_range_threshold() {
    assert!(RoutingPolicy::new(0.0).is_ok());
    assert!(RoutingPolicy::new(1.0).is_ok());
    for bad in [-0.1, 1.01, f32::NAN] {
        assert!(matches!(
            RoutingPolicy::new(bad),
            Err(AgentError::InvalidArgument(_))
        ));
    }
}

#[tokio::test]
async fn test_high_confidence_returns_document_answer() {
    let h = harness(
        MockRetriever::answering(cited_document(0.9)),
        web_hit(),
        MockEvaluator::scoring(0.0, 1.0),
    );

    let response = h.router.run("flash point", &acetone(), false).await.unwrap();

    assert_eq!(response.source, AnswerSource::Document);
    assert!(response.answer.starts_with("Answer: minus twenty"));
    assert_eq!(response.metadata.confidence, 0.9);
    assert_eq!(response.metadata.threshold, THRESHOLD);
    assert_eq!(response.metadata.citations, vec!["acetone.pdf".to_string()]);
    assert!(!response.metadata.degraded);
    assert!(!response.metadata.cached);
    assert_eq!(response.evaluation, EvaluationStatus::NotRequested);
    assert!(response.metrics().is_empty());
    assert!(response.source_urls.is_empty());

    assert_eq!(h.web.call_count(), 0);
    assert_eq!(h.evaluator.call_count(), 0);
    assert_eq!(h.retriever.last_corpus(), Some(acetone()));
}

#[tokio::test]
async fn test_high_confidence_with_evaluation_scores_document_answer() {
    let h = harness(
        MockRetriever::answering(cited_document(0.9)),
        web_hit(),
        MockEvaluator::scoring(0.1, 1.0),
    );

    let response = h.router.run("flash point", &acetone(), true).await.unwrap();

    assert_eq!(response.source, AnswerSource::Document);
    assert!(response.evaluation.is_scored());
    assert_eq!(response.metrics()["hallucination"], 0.1);
    assert_eq!(response.metrics()["context_precision"], 1.0);

    let requests = h.evaluator.requests();
    assert_eq!(requests.len(), 1);
    assert!(!requests[0].is_web);
    assert!(requests[0].ground_truth.is_empty());
    assert_eq!(requests[0].answer, response.answer);
    assert_eq!(requests[0].corpus, acetone());
    assert_eq!(h.web.call_count(), 0);
}

#[tokio::test]
async fn test_threshold_is_inclusive() {
    let h = harness(
        MockRetriever::with_confidence("doc", THRESHOLD),
        web_hit(),
        MockEvaluator::scoring(0.0, 1.0),
    );

    let response = h.router.run("q", &CorpusSelector::all(), false).await.unwrap();
    assert_eq!(response.source, AnswerSource::Document);
    assert_eq!(h.web.call_count(), 0);
}

#[tokio::test]
async fn test_low_confidence_falls_back_to_web() {
    let h = harness(
        MockRetriever::answering(cited_document(0.2)),
        web_hit(),
        MockEvaluator::scoring(0.0, 1.0),
    );

    let response = h.router.run("flash point", &acetone(), false).await.unwrap();

    assert_eq!(response.source, AnswerSource::Web);
    assert_eq!(response.answer, "web says minus twenty");
    assert_eq!(response.metadata.confidence, 0.2);
    assert!(response.metadata.citations.is_empty());
    assert_eq!(
        response.source_urls,
        vec!["https://a.example".to_string(), "https://b.example".to_string()]
    );
    assert_eq!(response.evaluation, EvaluationStatus::NotRequested);
    assert_eq!(h.web.call_count(), 1);
    assert_eq!(h.evaluator.call_count(), 0);
}

#[tokio::test]
async fn test_low_confidence_with_evaluation_uses_web_ground_truth() {
    let h = harness(
        MockRetriever::answering(cited_document(0.2)),
        web_hit(),
        MockEvaluator::scoring(0.3, 0.0),
    );

    let response = h.router.run("flash point", &acetone(), true).await.unwrap();

    assert_eq!(response.source, AnswerSource::Web);
    assert!(response.evaluation.is_scored());

    let requests = h.evaluator.requests();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].is_web);
    assert_eq!(requests[0].answer, "web says minus twenty");
    assert_eq!(
        requests[0].ground_truth,
        vec!["snippet one".to_string(), "snippet two".to_string()]
    );
}

#[tokio::test]
async fn test_degraded_web_answer_is_not_evaluated() {
    let h = harness(
        MockRetriever::answering(cited_document(0.2)),
        MockWebSearch::degraded(),
        MockEvaluator::scoring(0.0, 1.0),
    );

    let response = h.router.run("flash point", &acetone(), true).await.unwrap();

    assert_eq!(response.source, AnswerSource::Web);
    assert_eq!(response.answer, WEB_NOT_FOUND_ANSWER);
    assert!(response.metadata.degraded);
    assert_eq!(
        response.evaluation,
        EvaluationStatus::Failed {
            reason: DEGRADED_NOT_EVALUATED.to_string()
        }
    );
    assert!(response.metrics().is_empty());
    assert!(response.source_urls.is_empty());
    assert_eq!(h.evaluator.call_count(), 0);

    h.cache.run_pending_tasks();
    assert!(h.cache.is_empty());
}

#[tokio::test]
async fn test_web_error_is_replaced_by_placeholder() {
    let h = harness(
        MockRetriever::answering(cited_document(0.1)),
        MockWebSearch::failing(),
        MockEvaluator::scoring(0.0, 1.0),
    );

    let response = h.router.run("q", &acetone(), false).await.unwrap();

    assert_eq!(response.answer, WEB_NOT_FOUND_ANSWER);
    assert!(response.metadata.degraded);
    assert_eq!(response.evaluation, EvaluationStatus::NotRequested);
}

#[tokio::test]
async fn test_retrieval_error_degrades_then_searches_web() {
    let h = harness(
        MockRetriever::failing(),
        web_hit(),
        MockEvaluator::scoring(0.0, 1.0),
    );

    let response = h.router.run("q", &acetone(), true).await.unwrap();

    assert_eq!(response.source, AnswerSource::Web);
    assert_eq!(response.metadata.confidence, 0.0);
    assert!(!response.metadata.degraded);
    assert!(response.evaluation.is_scored());
    assert_eq!(h.web.call_count(), 1);
}

#[tokio::test]
async fn test_evaluation_failure_does_not_abort_run() {
    let h = harness(
        MockRetriever::answering(cited_document(0.9)),
        web_hit(),
        MockEvaluator::failing(),
    );

    let response = h.router.run("q", &acetone(), true).await.unwrap();

    assert_eq!(response.source, AnswerSource::Document);
    assert!(matches!(response.evaluation, EvaluationStatus::Failed { ref reason } if !reason.is_empty()));
    assert!(response.metrics().is_empty());
}

#[tokio::test]
async fn test_no_documents_is_no_data() {
    let h = harness(
        MockRetriever::empty(),
        web_hit(),
        MockEvaluator::scoring(0.0, 1.0),
    );

    let err = h.router.run("q", &CorpusSelector::all(), false).await.unwrap_err();
    assert_eq!(err, AgentError::NoData);
    assert_eq!(h.retriever.call_count(), 0);
    assert_eq!(h.web.call_count(), 0);
}

#[tokio::test]
async fn test_cached_answer_served_without_documents() {
    let h = harness(
        MockRetriever::empty(),
        web_hit(),
        MockEvaluator::scoring(0.0, 1.0),
    );

    let mut seeded = DocumentAnswer::not_present();
    seeded.answer = "cached".to_string();
    let mut state = AgentState::new("q", CorpusSelector::all(), false);
    state.apply_document(seeded);
    let response = state.into_response(h.router.policy(), "seed");
    h.cache.set_by_key(
        crate::cache::CacheKey::new(
            "q",
            crate::query::QueryClass::Document,
            &crate::query::QueryContext::corpus(CorpusSelector::all()),
        ),
        response,
    );

    let served = h.router.run("q", &CorpusSelector::all(), false).await.unwrap();
    assert_eq!(served.answer, "cached");
    assert!(served.metadata.cached);
}

#[tokio::test]
async fn test_second_run_is_served_from_cache() {
    let h = harness(
        MockRetriever::answering(cited_document(0.9)),
        web_hit(),
        MockEvaluator::scoring(0.0, 1.0),
    );

    let first = h.router.run("flash point", &CorpusSelector::new(["a.pdf", "b.pdf"]), false).await.unwrap();
    let second = h.router.run("flash point", &CorpusSelector::new(["b.pdf", "a.pdf"]), false).await.unwrap();

    assert!(!first.metadata.cached);
    assert!(second.metadata.cached);
    assert_eq!(first.answer, second.answer);
    assert_ne!(first.metadata.run_id, second.metadata.run_id);
    assert_eq!(h.retriever.call_count(), 1);

    h.router.run("flash point", &CorpusSelector::new(["c.pdf"]), false).await.unwrap();
    assert_eq!(h.retriever.call_count(), 2);
}

#[tokio::test]
async fn test_unscored_cache_entry_recomputed_when_evaluation_requested() {
    let h = harness(
        MockRetriever::answering(cited_document(0.9)),
        web_hit(),
        MockEvaluator::scoring(0.0, 1.0),
    );

    h.router.run("q", &acetone(), false).await.unwrap();
    let evaluated = h.router.run("q", &acetone(), true).await.unwrap();
    assert!(!evaluated.metadata.cached);
    assert!(evaluated.evaluation.is_scored());
    assert_eq!(h.retriever.call_count(), 2);

    let again = h.router.run("q", &acetone(), true).await.unwrap();
    assert!(again.metadata.cached);
    assert!(again.evaluation.is_scored());

    let plain = h.router.run("q", &acetone(), false).await.unwrap();
    assert!(plain.metadata.cached);
    assert_eq!(plain.evaluation, EvaluationStatus::NotRequested);
    assert!(plain.metrics().is_empty());
    assert_eq!(h.retriever.call_count(), 2);

    let rescored = h.router.run("q", &acetone(), true).await.unwrap();
    assert!(rescored.metadata.cached);
    assert!(rescored.evaluation.is_scored());
}

#[tokio::test]
async fn test_cached_scored_response_served_without_metrics_when_not_requested() {
    let h = harness(
        MockRetriever::answering(cited_document(0.9)),
        web_hit(),
        MockEvaluator::scoring(0.0, 1.0),
    );

    let scored = h.router.run("q", &acetone(), true).await.unwrap();
    assert!(!scored.metrics().is_empty());

    let plain = h.router.run("q", &acetone(), false).await.unwrap();
    assert!(plain.metadata.cached);
    assert_eq!(plain.evaluation, EvaluationStatus::NotRequested);
    assert!(plain.metrics().is_empty());
    assert_eq!(h.retriever.call_count(), 1);
}

#[tokio::test]
async fn test_blank_query_is_invalid() {
    let h = harness(
        MockRetriever::answering(cited_document(0.9)),
        web_hit(),
        MockEvaluator::scoring(0.0, 1.0),
    );

    let err = h.router.run("  ", &acetone(), false).await.unwrap_err();
    assert!(matches!(err, AgentError::InvalidArgument(_)));
    assert_eq!(h.retriever.call_count(), 0);
}

#[test]
fn test_final_answer_never_empty() {
    let policy = RoutingPolicy::new(THRESHOLD).unwrap();
    let state = AgentState::new("q", CorpusSelector::all(), false);
    let response = state.into_response(&policy, "run");
    assert_eq!(response.answer, DOC_NOT_FOUND_ANSWER);
}

#[test]
fn test_response_serialization_shape() {
    let policy = RoutingPolicy::new(THRESHOLD).unwrap();
    let mut state = AgentState::new("q", CorpusSelector::all(), true);
    state.apply_document(cited_document(0.2));
    state.apply_web(WebAnswer {
        answer: "web".to_string(),
        ground_truth: vec!["s".to_string()],
        sources: vec!["https://a.example".to_string()],
        degraded: false,
    });
    state.evaluation = EvaluationStatus::Scored {
        metrics: crate::evaluation::EvaluationMetrics {
            hallucination: 0.0,
            context_precision: 1.0,
        },
    };

    let json = serde_json::to_value(state.into_response(&policy, "run-1")).unwrap();
    assert_eq!(json["source"], "web");
    assert_eq!(json["evaluation"]["status"], "scored");
    assert_eq!(json["evaluation"]["metrics"]["context_precision"], 1.0);
    assert_eq!(json["metadata"]["run_id"], "run-1");
    assert_eq!(json["source_urls"][0], "https://a.example");

    let failed = serde_json::to_value(EvaluationStatus::Failed {
        reason: "x".to_string(),
    })
    .unwrap();
    assert_eq!(failed, serde_json::json!({"status": "failed", "reason": "x"}));
    assert_eq!(
        serde_json::to_value(EvaluationStatus::NotRequested).unwrap(),
        serde_json::json!({"status": "not_requested"})
    );
}

#[tokio::test]
async fn test_concurrent_runs_share_cache() {
    let h = Arc::new(harness(
        MockRetriever::answering(cited_document(0.9)),
        web_hit(),
        MockEvaluator::scoring(0.0, 1.0),
    ));

    let runs: Vec<_> = (0..8)
        .map(|i| {
            let h = Arc::clone(&h);
            tokio::spawn(async move {
                h.router
                    .run(&format!("question {}", i % 4), &CorpusSelector::all(), false)
                    .await
            })
        })
        .collect();

    for run in futures::future::join_all(runs).await {
        assert_eq!(run.unwrap().unwrap().source, AnswerSource::Document);
    }

    h.cache.run_pending_tasks();
    assert_eq!(h.cache.len(), 4);
    assert!(h.retriever.call_count() >= 4 && h.retriever.call_count() <= 8);
}
