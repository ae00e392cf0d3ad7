use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::WebSearcher;
use super::error::{WebSearchError, WebSearchResult};
use super::types::WebAnswer;

/// Scripted [`WebSearcher`] for router tests.
#[derive(Debug)]
pub struct MockWebSearch {
    answer: Option<WebAnswer>,
    calls: AtomicUsize,
}

impl MockWebSearch {
    pub fn answering(answer: WebAnswer) -> Self {
        Self {
            answer: Some(answer),
            calls: AtomicUsize::new(0),
        }
    }

    /// A successful answer with one snippet per source.
    pub fn with_answer(text: impl Into<String>, snippets: &[&str], sources: &[&str]) -> Self {
        Self::answering(WebAnswer {
            answer: text.into(),
            ground_truth: snippets.iter().map(|s| s.to_string()).collect(),
            sources: sources.iter().map(|s| s.to_string()).collect(),
            degraded: false,
        })
    }

    /// Returns the placeholder, as a real searcher does after upstream failure.
    pub fn degraded() -> Self {
        Self::answering(WebAnswer::placeholder())
    }

    /// Fails every call.
    pub fn failing() -> Self {
        Self {
            answer: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl WebSearcher for MockWebSearch {
    async fn search(&self, _query: &str) -> WebSearchResult<WebAnswer> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.answer.clone().ok_or(WebSearchError::MissingApiKey)
    }
}
