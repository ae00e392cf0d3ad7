//! Docent library crate (used by the server and integration tests).
//!
//! # Public API Surface
//!
//! ## Routing
//! - [`ConfidenceRouter`], [`RoutingPolicy`] - Document-first answering with web fallback
//! - [`AgentResponse`], [`AgentError`] - Run results and failures
//!
//! ## Collaborators
//! - [`CorpusRetriever`], [`InMemoryPassageIndex`] - Document retrieval
//! - [`TavilyWebSearch`] - Web search
//! - [`JudgeEvaluator`] - Hallucination and context-precision scoring
//! - [`GenaiGenerator`], [`OfflineGenerator`] - Text generation
//!
//! ## Caching & Ranking
//! - [`InMemoryResponseCache`], [`CacheKey`] - Response cache keyed by query semantics
//! - [`LexicalRanker`] - BM25 reranking and confidence
//!
//! ## Test/Mock Support
//! Mock implementations are available behind `#[cfg(any(test, feature = "mock"))]`.

pub mod agent;
pub mod cache;
pub mod config;
pub mod constants;
pub mod evaluation;
pub mod gateway;
pub mod hashing;
pub mod llm;
pub mod query;
pub mod retrieval;
pub mod scoring;
pub mod websearch;

pub use agent::{
    AgentError, AgentResponse, AgentResult, AnswerSource, ConfidenceRouter, EvaluationStatus,
    ResponseMetadata, RoutingPolicy,
};
pub use cache::{CacheError, CacheKey, InMemoryResponseCache, ResponseCache};
pub use config::{Config, ConfigError};
pub use evaluation::{EvaluationMetrics, EvaluationRequest, Evaluator, JudgeEvaluator};
pub use gateway::{HandlerState, create_router_with_state};
pub use hashing::{hash_cache_key, hash_to_u64, query_fingerprint};
pub use llm::{AnswerGenerator, GenaiGenerator, GenerationOptions, OfflineGenerator};
pub use query::{CorpusSelector, QueryClass, QueryContext};
pub use retrieval::{
    CorpusRetriever, DocumentAnswer, DocumentRetriever, InMemoryPassageIndex, PassageSource,
};
pub use scoring::{LexicalRanker, Passage, RankedResult};
pub use websearch::{TavilyWebSearch, WebAnswer, WebSearcher};

#[cfg(any(test, feature = "mock"))]
pub use evaluation::MockEvaluator;
#[cfg(any(test, feature = "mock"))]
pub use llm::MockGenerator;
#[cfg(any(test, feature = "mock"))]
pub use retrieval::MockRetriever;
#[cfg(any(test, feature = "mock"))]
pub use websearch::MockWebSearch;
