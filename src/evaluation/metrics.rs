//! Scoring helpers shared by evaluators.

use std::collections::HashSet;

use super::error::{EvaluationError, EvaluationResult};
use crate::constants::CONTEXT_OVERLAP_THRESHOLD;

fn lowercase_words(text: &str) -> HashSet<String> {
    text.split_whitespace().map(str::to_lowercase).collect()
}

/// Share of the answer's distinct lower-cased words that also occur in `snippet`.
pub fn keyword_overlap(answer: &str, snippet: &str) -> f32 {
    let answer_words = lowercase_words(answer);
    if answer_words.is_empty() {
        return 0.0;
    }
    let snippet_words = lowercase_words(snippet);
    let shared = answer_words.intersection(&snippet_words).count();
    shared as f32 / answer_words.len() as f32
}

/// `1.0` if some snippet shares more than half of the answer's words, else `0.0`.
pub fn context_precision(answer: &str, ground_truth: &[String]) -> f32 {
    let supported = ground_truth
        .iter()
        .any(|snippet| keyword_overlap(answer, snippet) > CONTEXT_OVERLAP_THRESHOLD);
    if supported { 1.0 } else { 0.0 }
}

/// Share of the answer's distinct words found in no snippet at all.
///
/// Lexical stand-in for a judge model: `0.0` is fully supported.
pub fn lexical_hallucination(answer: &str, ground_truth: &[String]) -> f32 {
    let answer_words = lowercase_words(answer);
    if answer_words.is_empty() {
        return 0.0;
    }
    let known: HashSet<String> = ground_truth
        .iter()
        .flat_map(|snippet| lowercase_words(snippet))
        .collect();
    let unsupported = answer_words.difference(&known).count();
    unsupported as f32 / answer_words.len() as f32
}

/// Reads the first number in a judge reply and checks it lies in `[0, 1]`.
pub fn parse_judge_score(reply: &str) -> EvaluationResult<f32> {
    let unparseable = || EvaluationError::UnparseableScore {
        reply: reply.trim().to_string(),
    };

    let start = reply
        .find(|c: char| c.is_ascii_digit())
        .ok_or_else(unparseable)?;
    let number: String = reply[start..]
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    let score: f32 = number
        .trim_end_matches('.')
        .parse()
        .map_err(|_| unparseable())?;

    if (0.0..=1.0).contains(&score) {
        Ok(score)
    } else {
        Err(unparseable())
    }
}
