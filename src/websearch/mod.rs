//! Live web search fallback.

pub mod error;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod tavily;
pub mod types;


use async_trait::async_trait;

pub use error::{WebSearchError, WebSearchResult};
#[cfg(any(test, feature = "mock"))]
pub use mock::MockWebSearch;
pub use tavily::TavilyWebSearch;
pub use types::WebAnswer;

/// Answers a query from live web results.
#[async_trait]
pub trait WebSearcher: Send + Sync {
    async fn search(&self, query: &str) -> WebSearchResult<WebAnswer>;
}
