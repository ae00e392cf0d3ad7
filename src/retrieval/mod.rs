//! Document retrieval: passage storage, corpus filtering and cited answers.
//!
//! [`CorpusRetriever`] is the production [`DocumentRetriever`]. It pulls
//! candidates from a [`PassageSource`], keeps the ones inside the requested
//! corpus, reranks them with the
//! [`LexicalRanker`](crate::scoring::LexicalRanker), and asks the LLM for an
//! answer grounded in the top passages. Its confidence is the ranker's.

pub mod chunk;
pub mod error;
pub mod index;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod retriever;
pub mod types;

#[cfg(test)]
mod tests;

use async_trait::async_trait;

use crate::query::CorpusSelector;

pub use chunk::chunk_text;
pub use error::{RetrievalError, RetrievalResult};
pub use index::{InMemoryPassageIndex, PassageSource};
#[cfg(any(test, feature = "mock"))]
pub use mock::MockRetriever;
pub use retriever::{CorpusRetriever, corpus_candidates, format_with_citations};
pub use types::{DocumentAnswer, RetrievalMetadata};

/// Answers a query from the document corpus.
#[async_trait]
pub trait DocumentRetriever: Send + Sync {
    /// Answers `query` from passages inside `corpus` (empty = all data).
    ///
    /// An empty corpus is not an error: the answer is the "not present"
    /// placeholder with zero confidence.
    async fn retrieve(&self, query: &str, corpus: &CorpusSelector) -> RetrievalResult<DocumentAnswer>;

    /// `false` when nothing has been indexed at all.
    fn has_documents(&self) -> bool;
}
