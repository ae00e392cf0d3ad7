use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::DocumentRetriever;
use super::error::{RetrievalError, RetrievalResult};
use super::types::DocumentAnswer;
use crate::query::CorpusSelector;

/// Scripted [`DocumentRetriever`] for router tests.
#[derive(Debug)]
pub struct MockRetriever {
    answer: Option<DocumentAnswer>,
    has_documents: bool,
    calls: AtomicUsize,
    last_corpus: Mutex<Option<CorpusSelector>>,
}

impl MockRetriever {
    /// Always returns `answer`.
    pub fn answering(answer: DocumentAnswer) -> Self {
        Self {
            answer: Some(answer),
            has_documents: true,
            calls: AtomicUsize::new(0),
            last_corpus: Mutex::new(None),
        }
    }

    /// Returns `text` with the given confidence.
    pub fn with_confidence(text: impl Into<String>, confidence: f32) -> Self {
        let mut answer = DocumentAnswer::not_present();
        answer.answer = text.into();
        answer.confidence = confidence;
        Self::answering(answer)
    }

    /// Fails every call as an unavailable source.
    pub fn failing() -> Self {
        Self {
            answer: None,
            has_documents: true,
            calls: AtomicUsize::new(0),
            last_corpus: Mutex::new(None),
        }
    }

    /// Reports an empty corpus.
    pub fn empty() -> Self {
        let mut mock = Self::answering(DocumentAnswer::not_present());
        mock.has_documents = false;
        mock
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_corpus(&self) -> Option<CorpusSelector> {
        self.last_corpus.lock().clone()
    }
}

#[async_trait]
impl DocumentRetriever for MockRetriever {
    async fn retrieve(&self, _query: &str, corpus: &CorpusSelector) -> RetrievalResult<DocumentAnswer> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_corpus.lock() = Some(corpus.clone());

        self.answer
            .clone()
            .ok_or_else(|| RetrievalError::SourceUnavailable("mock retriever failure".to_string()))
    }

    fn has_documents(&self) -> bool {
        self.has_documents
    }
}
