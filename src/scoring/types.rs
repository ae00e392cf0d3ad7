use serde::{Deserialize, Serialize};

/// A unit of retrieved text tagged with where it came from.
///
/// The source label is a file name for indexed documents, `"web_content"` for
/// submitted web text, or a URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Passage {
    pub text: String,
    pub source: String,
}

impl Passage {
    pub fn new(text: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            source: source.into(),
        }
    }

    /// Returns `true` if the text is empty or whitespace only.
    #[inline]
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
/// Passage annotated with its normalised relevance score.
pub struct ScoredPassage {
    /// The passage, unchanged.
    pub passage: Passage,
    /// Score relative to the best candidate (`1.0` for the top hit), or `0.0`
    /// when ranking was skipped or nothing overlapped the query.
    pub score: f32,
}

/// Output of [`LexicalRanker::rank`](super::LexicalRanker::rank).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RankedResult {
    passages: Vec<ScoredPassage>,
    confidence: f32,
    scored: bool,
}

impl RankedResult {
    /// Result for an empty (or all-blank) candidate set.
    pub fn empty() -> Self {
        Self::default()
    }

    pub(crate) fn scored(passages: Vec<ScoredPassage>, confidence: f32) -> Self {
        Self {
            passages,
            confidence,
            scored: true,
        }
    }

    pub(crate) fn unscored(passages: Vec<Passage>) -> Self {
        Self {
            passages: passages
                .into_iter()
                .map(|passage| ScoredPassage {
                    passage,
                    score: 0.0,
                })
                .collect(),
            confidence: 0.0,
            scored: false,
        }
    }

    /// Ranked passages, most relevant first.
    pub fn passages(&self) -> &[ScoredPassage] {
        &self.passages
    }

    /// Consumes the result and returns the bare passages in rank order.
    pub fn into_passages(self) -> Vec<Passage> {
        self.passages.into_iter().map(|s| s.passage).collect()
    }

    /// Texts of the ranked passages in rank order.
    pub fn texts(&self) -> Vec<&str> {
        self.passages
            .iter()
            .map(|s| s.passage.text.as_str())
            .collect()
    }

    /// Confidence in `[0, 1)` computed over the full candidate set.
    pub fn confidence(&self) -> f32 {
        self.confidence
    }

    /// `false` when the query had no terms and candidates were passed through.
    pub fn is_scored(&self) -> bool {
        self.scored
    }

    pub fn len(&self) -> usize {
        self.passages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.passages.is_empty()
    }
}
