use serde::{Deserialize, Serialize};

use crate::constants::DOC_NOT_FOUND_ANSWER;
use crate::scoring::Passage;

/// What the document path produced for one query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentAnswer {
    /// Answer text, citations included.
    pub answer: String,
    /// Lexical confidence over the candidate set, in `[0, 1)`.
    pub confidence: f32,
    /// Passages used as answer context, most relevant first.
    pub passages: Vec<Passage>,
    pub metadata: RetrievalMetadata,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetrievalMetadata {
    /// Candidates left after corpus filtering, before top-k.
    pub candidates: usize,
    /// Distinct sources of the context passages, in rank order.
    pub sources: Vec<String>,
    /// Set when the answer is a placeholder standing in for a failed call.
    pub degraded: bool,
}

impl DocumentAnswer {
    /// Zero-confidence answer for a corpus with nothing relevant.
    pub fn not_present() -> Self {
        Self {
            answer: DOC_NOT_FOUND_ANSWER.to_string(),
            confidence: 0.0,
            passages: Vec::new(),
            metadata: RetrievalMetadata::default(),
        }
    }

    /// Zero-confidence placeholder after an upstream failure.
    pub fn degraded() -> Self {
        let mut answer = Self::not_present();
        answer.metadata.degraded = true;
        answer
    }

    pub fn is_degraded(&self) -> bool {
        self.metadata.degraded
    }

    /// Sources of the context passages, deduplicated, rank order kept.
    pub(crate) fn sources_of(passages: &[Passage]) -> Vec<String> {
        let mut sources: Vec<String> = Vec::new();
        for passage in passages {
            if !sources.contains(&passage.source) {
                sources.push(passage.source.clone());
            }
        }
        sources
    }
}
