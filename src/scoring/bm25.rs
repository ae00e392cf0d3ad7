//! Okapi BM25 over a small, in-memory candidate set.
//!
//! The "corpus" for IDF purposes is only the candidate set handed in, never a
//! global index. Tokens are whitespace-delimited and compared verbatim.

use std::collections::HashMap;

use crate::constants::{BM25_B, BM25_K1};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bm25Params {
    pub k1: f32,
    pub b: f32,
}

impl Default for Bm25Params {
    fn default() -> Self {
        Self {
            k1: BM25_K1,
            b: BM25_B,
        }
    }
}

/// Splits on whitespace only. Case and punctuation are significant.
#[inline]
pub fn tokenize(text: &str) -> Vec<&str> {
    text.split_whitespace().collect()
}

pub struct Bm25Scorer<'a> {
    term_freqs: Vec<HashMap<&'a str, usize>>,
    doc_lens: Vec<usize>,
    doc_freq: HashMap<&'a str, usize>,
    avgdl: f32,
    params: Bm25Params,
}

impl<'a> Bm25Scorer<'a> {
    pub fn new(docs: &[&'a str], params: Bm25Params) -> Self {
        let mut term_freqs = Vec::with_capacity(docs.len());
        let mut doc_lens = Vec::with_capacity(docs.len());
        let mut doc_freq: HashMap<&'a str, usize> = HashMap::new();

        for &doc in docs {
            let tokens = tokenize(doc);
            doc_lens.push(tokens.len());

            let mut tf: HashMap<&'a str, usize> = HashMap::new();
            for token in tokens {
                *tf.entry(token).or_insert(0) += 1;
            }
            for term in tf.keys() {
                *doc_freq.entry(*term).or_insert(0) += 1;
            }
            term_freqs.push(tf);
        }

        let total: usize = doc_lens.iter().sum();
        let avgdl = if doc_lens.is_empty() {
            0.0
        } else {
            total as f32 / doc_lens.len() as f32
        };

        Self {
            term_freqs,
            doc_lens,
            doc_freq,
            avgdl,
            params,
        }
    }

    pub fn num_docs(&self) -> usize {
        self.doc_lens.len()
    }

    /// Non-negative IDF: `ln(1 + (N - n + 0.5) / (n + 0.5))`.
    ///
    /// Terms absent from every candidate get `0.0`.
    pub fn idf(&self, term: &str) -> f32 {
        let n = match self.doc_freq.get(term) {
            Some(&n) => n as f32,
            None => return 0.0,
        };
        let total = self.num_docs() as f32;
        (1.0 + (total - n + 0.5) / (n + 0.5)).ln()
    }

    /// Score of candidate `idx` against pre-tokenised query terms.
    ///
    /// Repeated query terms contribute once per occurrence.
    pub fn score_terms(&self, query_terms: &[&str], idx: usize) -> f32 {
        let tf = &self.term_freqs[idx];
        let dl = self.doc_lens[idx] as f32;
        let Bm25Params { k1, b } = self.params;
        let len_norm = if self.avgdl > 0.0 {
            1.0 - b + b * dl / self.avgdl
        } else {
            1.0
        };

        query_terms
            .iter()
            .map(|term| {
                let freq = tf.get(term).copied().unwrap_or(0) as f32;
                if freq == 0.0 {
                    return 0.0;
                }
                self.idf(term) * (freq * (k1 + 1.0)) / (freq + k1 * len_norm)
            })
            .sum()
    }

    /// Raw (unnormalised) scores for every candidate, in input order.
    pub fn scores(&self, query: &str) -> Vec<f32> {
        let terms = tokenize(query);
        (0..self.num_docs())
            .map(|idx| self.score_terms(&terms, idx))
            .collect()
    }
}
