use serde::{Deserialize, Serialize};

use crate::constants::WEB_NOT_FOUND_ANSWER;

/// What the web path produced for one query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebAnswer {
    pub answer: String,
    /// Result snippets the answer was generated from.
    pub ground_truth: Vec<String>,
    /// URLs of the results that contributed snippets.
    pub sources: Vec<String>,
    /// Set when `answer` is the fixed placeholder.
    pub degraded: bool,
}

impl WebAnswer {
    /// The fixed "couldn't find" answer with no snippets or sources.
    pub fn placeholder() -> Self {
        Self {
            answer: WEB_NOT_FOUND_ANSWER.to_string(),
            ground_truth: Vec::new(),
            sources: Vec::new(),
            degraded: true,
        }
    }

    pub fn is_degraded(&self) -> bool {
        self.degraded
    }
}
