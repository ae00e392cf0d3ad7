use async_trait::async_trait;
use parking_lot::RwLock;
use std::path::Path;
use tracing::{debug, info, instrument, warn};

use super::chunk::chunk_text;
use super::error::{RetrievalError, RetrievalResult};
use crate::constants::{DEFAULT_CHUNK_OVERLAP, DEFAULT_CHUNK_SIZE, WEB_CONTENT_SOURCE};
use crate::query::CorpusSelector;
use crate::scoring::{LexicalRanker, Passage};

/// Candidate lookup over the indexed corpus.
///
/// This stands where a vector store would: it returns plausible candidates
/// from inside `corpus`, and the caller reranks them.
#[async_trait]
pub trait PassageSource: Send + Sync {
    /// Returns up to `k` candidate passages for `query` drawn only from
    /// sources matched by `corpus`.
    async fn search(
        &self,
        query: &str,
        corpus: &CorpusSelector,
        k: usize,
    ) -> RetrievalResult<Vec<Passage>>;

    /// Distinct source labels currently indexed, sorted.
    fn sources(&self) -> Vec<String>;

    fn passage_count(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.passage_count() == 0
    }
}

/// Extensions picked up by [`InMemoryPassageIndex::load_dir`].
const LOADABLE_EXTENSIONS: &[&str] = &["txt", "md"];

/// In-process passage store searched lexically.
#[derive(Debug)]
pub struct InMemoryPassageIndex {
    passages: RwLock<Vec<Passage>>,
    chunk_size: usize,
    chunk_overlap: usize,
    ranker: LexicalRanker,
}

impl Default for InMemoryPassageIndex {
    fn default() -> Self {
        Self::new(DEFAULT_CHUNK_SIZE, DEFAULT_CHUNK_OVERLAP)
    }
}

impl InMemoryPassageIndex {
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        Self {
            passages: RwLock::new(Vec::new()),
            chunk_size,
            chunk_overlap,
            ranker: LexicalRanker::default(),
        }
    }

    /// Chunks `text` and indexes every chunk under `source`.
    ///
    /// Returns the number of chunks added.
    pub fn add_document(&self, source: &str, text: &str) -> RetrievalResult<usize> {
        let chunks = chunk_text(text, self.chunk_size, self.chunk_overlap);
        if chunks.is_empty() {
            return Err(RetrievalError::EmptyDocument {
                source_label: source.to_string(),
            });
        }

        let added = chunks.len();
        let mut passages = self.passages.write();
        passages.extend(chunks.into_iter().map(|chunk| Passage::new(chunk, source)));

        info!(source, chunks = added, total = passages.len(), "Indexed document");
        Ok(added)
    }

    /// Indexes text submitted from the web under the shared web label.
    pub fn add_web_content(&self, text: &str) -> RetrievalResult<usize> {
        self.add_document(WEB_CONTENT_SOURCE, text)
    }

    /// Indexes every `.txt` and `.md` file directly inside `dir`.
    ///
    /// Unreadable or empty files are skipped with a warning. A missing
    /// directory indexes nothing. Returns the number of files indexed.
    #[instrument(skip(self), fields(dir = %dir.display()))]
    pub async fn load_dir(&self, dir: &Path) -> RetrievalResult<usize> {
        if !dir.is_dir() {
            warn!("Data directory not found, starting with an empty index");
            return Ok(0);
        }

        let mut entries = tokio::fs::read_dir(dir)
            .await
            .map_err(|source| RetrievalError::Io {
                path: dir.to_path_buf(),
                source,
            })?;

        let mut paths = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|source| RetrievalError::Io {
                path: dir.to_path_buf(),
                source,
            })?
        {
            let path = entry.path();
            let loadable = path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| LOADABLE_EXTENSIONS.contains(&e));
            if loadable && path.is_file() {
                paths.push(path);
            }
        }
        paths.sort();

        let mut loaded = 0;
        for path in paths {
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };

            let text = match tokio::fs::read_to_string(&path).await {
                Ok(text) => text,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Skipping unreadable document");
                    continue;
                }
            };

            match self.add_document(name, &text) {
                Ok(_) => loaded += 1,
                Err(e) => warn!(path = %path.display(), error = %e, "Skipping document"),
            }
        }

        info!(files = loaded, passages = self.passage_count(), "Data directory loaded");
        Ok(loaded)
    }

    pub fn clear(&self) {
        self.passages.write().clear();
    }
}

#[async_trait]
impl PassageSource for InMemoryPassageIndex {
    async fn search(
        &self,
        query: &str,
        corpus: &CorpusSelector,
        k: usize,
    ) -> RetrievalResult<Vec<Passage>> {
        let passages = self.passages.read();
        let hits = if corpus.is_all() {
            self.ranker.rank_top(query, &passages, k).into_passages()
        } else {
            let scoped: Vec<Passage> = passages
                .iter()
                .filter(|p| corpus.matches(&p.source))
                .cloned()
                .collect();
            self.ranker.rank_top(query, &scoped, k).into_passages()
        };
        debug!(indexed = passages.len(), hits = hits.len(), "Passage search");
        Ok(hits)
    }

    fn sources(&self) -> Vec<String> {
        let mut sources: Vec<String> = self
            .passages
            .read()
            .iter()
            .map(|p| p.source.clone())
            .collect();
        sources.sort();
        sources.dedup();
        sources
    }

    fn passage_count(&self) -> usize {
        self.passages.read().len()
    }
}
