//! Lexical reranking and confidence scoring.
//!
//! [`LexicalRanker`] scores a candidate set of [`Passage`]s against a query
//! with BM25, keeps the top-k, and derives a confidence value from the best
//! raw score over the *whole* candidate set.
//!
//! # What the confidence means
//!
//! The confidence is a lexical-overlap proxy: `max / (max + 1)` of the best
//! BM25 score. It says how strongly the retrieved text shares terms with the
//! question. It is not a calibrated probability that the generated answer is
//! correct, and a routing threshold on it is a relevance gate, not a
//! correctness guarantee.

pub mod bm25;
pub mod ranker;
pub mod types;


pub use bm25::{Bm25Params, Bm25Scorer, tokenize};
pub use ranker::{LexicalRanker, confidence_from_score};
pub use types::{Passage, RankedResult, ScoredPassage};
