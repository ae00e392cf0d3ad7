//! HTTP gateway (Axum) in front of the [`ConfidenceRouter`](crate::agent::ConfidenceRouter).

pub mod error;
pub mod handler;
pub mod payload;
pub mod state;


use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode, header::HeaderValue},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use std::time::Duration;
use tower_http::trace::TraceLayer;

pub use error::{ErrorResponse, GatewayError};
pub use handler::{documents_handler, query_handler};
pub use payload::{DocumentRequest, DocumentResponse, QueryRequest, QueryResponse};
pub use state::HandlerState;

use crate::cache::{
    DOCENT_STATUS_HEADER, DOCENT_STATUS_HEALTHY, DOCENT_STATUS_NOT_READY, DOCENT_STATUS_READY,
};
use crate::retrieval::PassageSource;

pub fn create_router_with_state(state: HandlerState) -> Router {
    Router::new()
        .route("/healthz", get(health_handler))
        .route("/ready", get(ready_handler))
        .route("/v1/query", post(query_handler))
        .route("/v1/documents", post(documents_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(serde::Serialize, serde::Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(serde::Serialize, serde::Deserialize)]
pub struct ReadyResponse {
    pub status: String,
    pub passages: usize,
    pub sources: Vec<String>,
}

#[tracing::instrument]
pub async fn health_handler() -> Response {
    let mut headers = HeaderMap::new();
    headers.insert(
        DOCENT_STATUS_HEADER,
        HeaderValue::from_static(DOCENT_STATUS_HEALTHY),
    );

    (
        StatusCode::OK,
        headers,
        Json(HealthResponse {
            status: "ok".to_string(),
        }),
    )
        .into_response()
}

/// Ready once at least one passage is indexed.
#[tracing::instrument(skip(state))]
pub async fn ready_handler(State(state): State<HandlerState>) -> Response {
    let passages = state.index.passage_count();
    let is_ready = passages > 0;

    let (status_code, docent_status) = if is_ready {
        (StatusCode::OK, DOCENT_STATUS_READY)
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, DOCENT_STATUS_NOT_READY)
    };

    let mut headers = HeaderMap::new();
    headers.insert(DOCENT_STATUS_HEADER, HeaderValue::from_static(docent_status));

    (
        status_code,
        headers,
        Json(ReadyResponse {
            status: docent_status.to_string(),
            passages,
            sources: state.index.sources(),
        }),
    )
        .into_response()
}

/// `true` if a server on `127.0.0.1:port` answers `/healthz` with success.
///
/// Runs on the caller's runtime so it can back the binary's
/// `--health-check` flag from inside `main`.
pub async fn check_health(port: u16) -> bool {
    let url = format!("http://127.0.0.1:{}/healthz", port);

    let client = match reqwest::Client::builder()
        .timeout(Duration::from_secs(1))
        .build()
    {
        Ok(client) => client,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to build health check client");
            return false;
        }
    };

    match client.get(&url).send().await {
        Ok(res) => res.status().is_success(),
        Err(e) => {
            tracing::debug!(%url, error = %e, "Health check request failed");
            false
        }
    }
}
