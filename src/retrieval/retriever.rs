use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use super::DocumentRetriever;
use super::error::RetrievalResult;
use super::index::PassageSource;
use super::types::{DocumentAnswer, RetrievalMetadata};
use crate::constants::{CITATION_PREVIEW_CHARS, DEFAULT_SEARCH_K};
use crate::llm::{AnswerGenerator, document_prompt};
use crate::query::CorpusSelector;
use crate::scoring::{LexicalRanker, Passage};

/// Pulls up to `k` candidates for `corpus` from `source`.
///
/// The corpus scopes the search itself. Anything a source returns from
/// outside it is still dropped here.
pub async fn corpus_candidates(
    source: &dyn PassageSource,
    query: &str,
    corpus: &CorpusSelector,
    k: usize,
) -> RetrievalResult<Vec<Passage>> {
    let candidates = source.search(query, corpus, k).await?;
    let total = candidates.len();
    let kept: Vec<Passage> = candidates
        .into_iter()
        .filter(|p| corpus.matches(&p.source))
        .collect();

    debug!(
        candidates = total,
        in_corpus = kept.len(),
        corpus = %corpus.joined(),
        "Filtered candidates to corpus"
    );
    Ok(kept)
}

/// Appends a numbered citation list to `answer`.
///
/// Each line reads `[Doc i] (<source>): <first 50 chars>...`. With no
/// passages the answer is returned unchanged.
pub fn format_with_citations(answer: &str, passages: &[Passage]) -> String {
    if passages.is_empty() {
        return answer.to_string();
    }

    let citations = passages
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let preview: String = p.text.chars().take(CITATION_PREVIEW_CHARS).collect();
            format!("[Doc {}] ({}): {}...", i + 1, p.source, preview)
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!("Answer: {}\n\nCitations:\n{}", answer, citations)
}

/// Document retrieval over a [`PassageSource`] with lexical reranking.
pub struct CorpusRetriever {
    source: Arc<dyn PassageSource>,
    generator: Arc<dyn AnswerGenerator>,
    ranker: LexicalRanker,
    search_k: usize,
}

impl CorpusRetriever {
    pub fn new(source: Arc<dyn PassageSource>, generator: Arc<dyn AnswerGenerator>) -> Self {
        Self {
            source,
            generator,
            ranker: LexicalRanker::default(),
            search_k: DEFAULT_SEARCH_K,
        }
    }

    pub fn with_ranker(mut self, ranker: LexicalRanker) -> Self {
        self.ranker = ranker;
        self
    }

    pub fn with_search_k(mut self, search_k: usize) -> Self {
        self.search_k = search_k;
        self
    }

    pub fn source(&self) -> &Arc<dyn PassageSource> {
        &self.source
    }
}

#[async_trait]
impl DocumentRetriever for CorpusRetriever {
    #[instrument(skip(self, query, corpus), fields(corpus_size = corpus.len()))]
    async fn retrieve(&self, query: &str, corpus: &CorpusSelector) -> RetrievalResult<DocumentAnswer> {
        let candidates =
            corpus_candidates(self.source.as_ref(), query, corpus, self.search_k).await?;

        if candidates.is_empty() {
            info!("No passages in the requested corpus");
            return Ok(DocumentAnswer::not_present());
        }

        let ranked = self.ranker.rank(query, &candidates);
        let confidence = ranked.confidence();
        let context_passages = ranked.into_passages();
        let context = context_passages
            .iter()
            .map(|p| p.text.as_str())
            .collect::<Vec<_>>()
            .join("\n");

        let metadata = RetrievalMetadata {
            candidates: candidates.len(),
            sources: DocumentAnswer::sources_of(&context_passages),
            degraded: false,
        };

        let prompt = document_prompt(&context, query);
        let answer = match self.generator.generate(&prompt).await {
            Ok(answer) => answer,
            Err(e) => {
                warn!(error = %e, model = self.generator.model_name(), "Document answer generation failed");
                let mut degraded = DocumentAnswer::degraded();
                degraded.passages = context_passages;
                degraded.metadata.candidates = metadata.candidates;
                degraded.metadata.sources = metadata.sources;
                return Ok(degraded);
            }
        };

        info!(confidence, passages = context_passages.len(), "Document answer ready");

        Ok(DocumentAnswer {
            answer: format_with_citations(&answer, &context_passages),
            confidence,
            passages: context_passages,
            metadata,
        })
    }

    fn has_documents(&self) -> bool {
        !self.source.is_empty()
    }
}

impl std::fmt::Debug for CorpusRetriever {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CorpusRetriever")
            .field("passages", &self.source.passage_count())
            .field("model", &self.generator.model_name())
            .field("top_k", &self.ranker.top_k())
            .field("search_k", &self.search_k)
            .finish()
    }
}
