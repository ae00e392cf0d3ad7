//! Cross-cutting, shared constants.
//!
//! Placeholder answers are part of the user-visible contract: clients match on
//! them to tell "nothing found" apart from a real answer, so keep them stable.

/// Number of passages kept after reranking.
pub const DEFAULT_RERANK_TOP_K: usize = 3;

/// Number of candidates pulled from the passage source before reranking.
pub const DEFAULT_SEARCH_K: usize = 5;

/// BM25 term-frequency saturation.
pub const BM25_K1: f32 = 1.5;

/// BM25 document-length normalisation strength.
pub const BM25_B: f32 = 0.75;

pub const DEFAULT_CACHE_TTL_SECS: u64 = 60 * 60;

pub const DEFAULT_CACHE_CAPACITY: u64 = 10_000;

pub const DEFAULT_WEB_MAX_RESULTS: usize = 5;

/// Web result content is truncated to this many characters before prompting.
pub const WEB_CONTENT_MAX_CHARS: usize = 2000;

pub const DEFAULT_CHUNK_SIZE: usize = 1000;

pub const DEFAULT_CHUNK_OVERLAP: usize = 200;

/// Texts shorter than this (after trimming) are indexed as a single chunk.
pub const MIN_CHUNKABLE_CHARS: usize = 100;

/// Characters of each cited passage shown in the citation list.
pub const CITATION_PREVIEW_CHARS: usize = 50;

/// Source label for content submitted from the web rather than a file.
pub const WEB_CONTENT_SOURCE: &str = "web_content";

/// Answer returned when the requested corpus holds nothing relevant.
pub const DOC_NOT_FOUND_ANSWER: &str = "The answer is not present in the given documents.";

/// Answer returned when web search yields nothing usable.
pub const WEB_NOT_FOUND_ANSWER: &str =
    "I couldn't find a definitive answer based on available web information.";

/// Share of answer words a ground-truth snippet must contain to count as support.
pub const CONTEXT_OVERLAP_THRESHOLD: f32 = 0.5;

pub const DEFAULT_LLM_MODEL: &str = "llama-3.3-70b-versatile";

pub const DEFAULT_LLM_TEMPERATURE: f64 = 0.5;

pub const DEFAULT_LLM_MAX_TOKENS: u32 = 1024;

pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 120;

pub const TAVILY_SEARCH_URL: &str = "https://api.tavily.com/search";

pub const DEFAULT_WEB_TIMEOUT_SECS: u64 = 30;
