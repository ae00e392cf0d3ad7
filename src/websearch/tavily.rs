use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

use super::WebSearcher;
use super::error::{WebSearchError, WebSearchResult};
use super::types::WebAnswer;
use crate::constants::{
    DEFAULT_WEB_MAX_RESULTS, DEFAULT_WEB_TIMEOUT_SECS, TAVILY_SEARCH_URL, WEB_CONTENT_MAX_CHARS,
};
use crate::llm::{AnswerGenerator, web_prompt};

#[derive(Debug, Serialize)]
struct SearchRequest<'a> {
    query: &'a str,
    max_results: usize,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    content: Option<String>,
}

/// [`WebSearcher`] backed by the Tavily search API.
///
/// Never fails: every upstream problem is logged and answered with
/// [`WebAnswer::placeholder`].
pub struct TavilyWebSearch {
    http: reqwest::Client,
    timeout: Duration,
    endpoint: String,
    api_key: Option<String>,
    max_results: usize,
    generator: Arc<dyn AnswerGenerator>,
}

impl TavilyWebSearch {
    pub fn new(api_key: Option<String>, generator: Arc<dyn AnswerGenerator>) -> Self {
        let timeout = Duration::from_secs(DEFAULT_WEB_TIMEOUT_SECS);
        Self {
            http: build_client(timeout),
            timeout,
            endpoint: TAVILY_SEARCH_URL.to_string(),
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            max_results: DEFAULT_WEB_MAX_RESULTS,
            generator,
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.http = build_client(timeout);
        self.timeout = timeout;
        self
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    async fn try_search(&self, query: &str) -> WebSearchResult<WebAnswer> {
        let api_key = self.api_key.as_deref().ok_or(WebSearchError::MissingApiKey)?;

        let response = self
            .http
            .post(&self.endpoint)
            .timeout(self.timeout)
            .bearer_auth(api_key)
            .json(&SearchRequest {
                query,
                max_results: self.max_results,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(WebSearchError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: SearchResponse = response.json().await?;
        info!(results = parsed.results.len(), "Web results retrieved");

        if parsed.results.is_empty() {
            warn!("No web results found");
            return Ok(WebAnswer::placeholder());
        }

        let mut snippets = Vec::new();
        let mut sources = Vec::new();
        for hit in parsed.results {
            let url = hit.url.unwrap_or_else(|| "unknown".to_string());
            match hit.content.filter(|c| !c.trim().is_empty()) {
                Some(content) => {
                    debug!(url = %url, chars = content.len(), "Extracted web content");
                    snippets.push(content.chars().take(WEB_CONTENT_MAX_CHARS).collect::<String>());
                    sources.push(url);
                }
                None => debug!(url = %url, "Web result has no content"),
            }
        }

        if snippets.is_empty() {
            warn!("No usable content in web results");
            return Ok(WebAnswer::placeholder());
        }

        let prompt = web_prompt(&snippets.join("\n"), query);
        let answer = self.generator.generate(&prompt).await?;

        Ok(WebAnswer {
            answer,
            ground_truth: snippets,
            sources,
            degraded: false,
        })
    }
}

/// Requests also carry the timeout, so the default client fallback stays bounded.
fn build_client(timeout: Duration) -> reqwest::Client {
    match reqwest::Client::builder().timeout(timeout).build() {
        Ok(client) => client,
        Err(e) => {
            warn!(error = %e, "Failed to build web search client, using defaults");
            reqwest::Client::new()
        }
    }
}

#[async_trait]
impl WebSearcher for TavilyWebSearch {
    #[instrument(skip(self, query), fields(max_results = self.max_results))]
    async fn search(&self, query: &str) -> WebSearchResult<WebAnswer> {
        match self.try_search(query).await {
            Ok(answer) => Ok(answer),
            Err(e) => {
                warn!(error = %e, "Web search failed, answering with placeholder");
                Ok(WebAnswer::placeholder())
            }
        }
    }
}

impl std::fmt::Debug for TavilyWebSearch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TavilyWebSearch")
            .field("endpoint", &self.endpoint)
            .field("has_api_key", &self.api_key.is_some())
            .field("max_results", &self.max_results)
            .field("timeout", &self.timeout)
            .field("model", &self.generator.model_name())
            .finish()
    }
}
