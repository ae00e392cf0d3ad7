use std::cmp::Ordering;
use tracing::{debug, info};

use super::bm25::{Bm25Params, Bm25Scorer};
use super::types::{Passage, RankedResult, ScoredPassage};
use crate::constants::DEFAULT_RERANK_TOP_K;

/// Maps an unbounded raw relevance score into `[0, 1)`.
///
/// Zero only when the score is zero, i.e. there was no lexical overlap.
#[inline]
pub fn confidence_from_score(max_score: f32) -> f32 {
    if max_score > 0.0 {
        max_score / (max_score + 1.0)
    } else {
        0.0
    }
}

#[derive(Debug, Clone)]
pub struct LexicalRanker {
    top_k: usize,
    params: Bm25Params,
}

impl Default for LexicalRanker {
    fn default() -> Self {
        Self::new(DEFAULT_RERANK_TOP_K)
    }
}

impl LexicalRanker {
    pub fn new(top_k: usize) -> Self {
        Self {
            top_k,
            params: Bm25Params::default(),
        }
    }

    pub fn with_params(mut self, params: Bm25Params) -> Self {
        self.params = params;
        self
    }

    pub fn top_k(&self) -> usize {
        self.top_k
    }

    /// Ranks `candidates` against `query`, keeping the configured top-k.
    pub fn rank(&self, query: &str, candidates: &[Passage]) -> RankedResult {
        self.rank_top(query, candidates, self.top_k)
    }

    /// Ranks `candidates` against `query`, keeping at most `k` passages.
    ///
    /// The confidence is computed over every non-blank candidate before
    /// truncation. Ties keep their input order.
    pub fn rank_top(&self, query: &str, candidates: &[Passage], k: usize) -> RankedResult {
        let kept: Vec<&Passage> = candidates.iter().filter(|p| !p.is_blank()).collect();

        if kept.is_empty() {
            debug!(
                candidates = candidates.len(),
                "No non-blank candidates to rank"
            );
            return RankedResult::empty();
        }

        if query.trim().is_empty() {
            debug!("Empty query, passing candidates through unscored");
            return RankedResult::unscored(kept.into_iter().take(k).cloned().collect());
        }

        let texts: Vec<&str> = kept.iter().map(|p| p.text.as_str()).collect();
        let scorer = Bm25Scorer::new(&texts, self.params);
        let raw = scorer.scores(query);

        let max_score = raw.iter().copied().fold(0.0_f32, f32::max);
        let confidence = confidence_from_score(max_score);

        let normalized: Vec<f32> = if max_score > 0.0 {
            raw.iter().map(|s| s / max_score).collect()
        } else {
            info!(
                candidates = kept.len(),
                "No lexical overlap between query and candidates"
            );
            raw
        };

        let mut order: Vec<usize> = (0..kept.len()).collect();
        order.sort_by(|&a, &b| {
            normalized[b]
                .partial_cmp(&normalized[a])
                .unwrap_or(Ordering::Equal)
        });
        order.truncate(k);

        let ranked: Vec<ScoredPassage> = order
            .into_iter()
            .map(|idx| ScoredPassage {
                passage: kept[idx].clone(),
                score: normalized[idx],
            })
            .collect();

        debug!(
            candidates = kept.len(),
            kept = ranked.len(),
            max_score,
            confidence,
            "Lexical ranking complete"
        );

        RankedResult::scored(ranked, confidence)
    }

    /// Top-k passages only, most relevant first.
    pub fn rerank(&self, query: &str, candidates: &[Passage]) -> Vec<Passage> {
        self.rank(query, candidates).into_passages()
    }

    /// Confidence over the full candidate set.
    pub fn confidence(&self, query: &str, candidates: &[Passage]) -> f32 {
        self.rank_top(query, candidates, 0).confidence()
    }
}
