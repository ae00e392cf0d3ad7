//! Thin reqwest wrapper over the docent HTTP API.

use docent::cache::DOCENT_STATUS_HEADER;
use docent::gateway::{DocumentResponse, ErrorResponse, HealthResponse, QueryResponse, ReadyResponse};
use reqwest::StatusCode;

pub struct TestClient {
    base: String,
    http: reqwest::Client,
}

/// A parsed response body with its status line and docent status header.
pub struct Reply<T> {
    pub status: StatusCode,
    pub docent_status: String,
    pub body: T,
}

impl TestClient {
    pub fn new(base: String) -> Self {
        Self {
            base,
            http: reqwest::Client::new(),
        }
    }

    pub async fn health(&self) -> reqwest::Result<HealthResponse> {
        self.http
            .get(format!("{}/healthz", self.base))
            .send()
            .await?
            .json()
            .await
    }

    pub async fn ready(&self) -> reqwest::Result<Reply<ReadyResponse>> {
        let response = self.http.get(format!("{}/ready", self.base)).send().await?;
        Self::reply(response).await
    }

    pub async fn ingest(&self, source: &str, text: &str) -> reqwest::Result<Reply<DocumentResponse>> {
        let response = self
            .http
            .post(format!("{}/v1/documents", self.base))
            .json(&serde_json::json!({"source": source, "text": text}))
            .send()
            .await?;
        Self::reply(response).await
    }

    pub async fn query(&self, body: serde_json::Value) -> reqwest::Result<Reply<QueryResponse>> {
        let response = self
            .http
            .post(format!("{}/v1/query", self.base))
            .json(&body)
            .send()
            .await?;
        Self::reply(response).await
    }

    pub async fn query_error(&self, body: serde_json::Value) -> reqwest::Result<Reply<ErrorResponse>> {
        let response = self
            .http
            .post(format!("{}/v1/query", self.base))
            .json(&body)
            .send()
            .await?;
        Self::reply(response).await
    }

    async fn reply<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> reqwest::Result<Reply<T>> {
        let status = response.status();
        let docent_status = response
            .headers()
            .get(DOCENT_STATUS_HEADER)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        let body = response.json().await?;
        Ok(Reply {
            status,
            docent_status,
            body,
        })
    }
}
