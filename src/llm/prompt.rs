//! Prompt templates.

use crate::constants::{DOC_NOT_FOUND_ANSWER, WEB_NOT_FOUND_ANSWER};

/// Prompt for answering from indexed document passages.
pub fn document_prompt(context: &str, question: &str) -> String {
    format!(
        "You are an assistant that answers questions from structured and unstructured documents, \
         including research papers, safety data sheets and documents containing tables or lists.\n\n\
         Follow these rules:\n\
         - If the answer is explicitly found in the provided documents, give it with relevant context.\n\
         - If the answer is in tabular form, summarise the key values in a readable structure.\n\
         - If sources conflict, mention each of them with your reasoning.\n\
         - If the answer is not found, say: '{DOC_NOT_FOUND_ANSWER}'\n\
         - Do not answer beyond the given data.\n\n\
         Context:\n{context}\n\n\
         User Query: {question}\n\n\
         Answer:"
    )
}

/// Prompt for summarising web search results.
pub fn web_prompt(web_content: &str, question: &str) -> String {
    format!(
        "You are an assistant that answers questions based on web search results.\n\n\
         Follow these rules:\n\
         - Summarise the relevant information from the provided web content.\n\
         - If the answer is not found, say: '{WEB_NOT_FOUND_ANSWER}'\n\
         - Keep the response concise and based only on the given web content.\n\
         - Do not make up information beyond what is provided.\n\n\
         Web Content:\n{web_content}\n\n\
         User Query: {question}\n\n\
         Answer:"
    )
}

/// Prompt asking a judge model how much of `answer` is unsupported by `context`.
///
/// The judge must reply with a single number in `[0, 1]`.
pub fn judge_prompt(question: &str, answer: &str, context: &[String]) -> String {
    let context = context
        .iter()
        .enumerate()
        .map(|(i, snippet)| format!("[{}] {}", i + 1, snippet))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "You grade answers for hallucination.\n\n\
         Given the question, the reference context and the answer, estimate the fraction \
         of the answer's claims that are NOT supported by the context. 0 means fully \
         supported, 1 means entirely unsupported.\n\
         Reply with a single number between 0 and 1 and nothing else.\n\n\
         Question: {question}\n\n\
         Context:\n{context}\n\n\
         Answer: {answer}\n\n\
         Score:"
    )
}
