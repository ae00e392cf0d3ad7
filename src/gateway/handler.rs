use axum::{
    Json,
    extract::State,
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use tracing::{debug, info, instrument, warn};

use crate::cache::{CacheStatus, DOCENT_STATUS_HEADER, DOCENT_STATUS_STORED};
use crate::constants::WEB_CONTENT_SOURCE;
use crate::gateway::error::GatewayError;
use crate::gateway::payload::{DocumentRequest, DocumentResponse, QueryRequest, QueryResponse};
use crate::gateway::state::HandlerState;
use crate::query::{CorpusSelector, is_web_source, normalize_source_id};
use crate::retrieval::PassageSource;

/// `POST /v1/query`: runs the router under the configured timeout.
#[instrument(
    skip(state, request),
    fields(evaluate = tracing::field::Empty, sources = tracing::field::Empty)
)]
pub async fn query_handler(
    State(state): State<HandlerState>,
    Json(request): Json<serde_json::Value>,
) -> Result<Response, GatewayError> {
    let request: QueryRequest = serde_json::from_value(request)
        .map_err(|e| GatewayError::InvalidRequest(format!("Invalid request schema: {}", e)))?;

    let span = tracing::Span::current();
    span.record("evaluate", request.evaluate);
    span.record("sources", request.sources.len());

    let corpus = CorpusSelector::new(&request.sources);
    let timeout = state.request_timeout;

    let response = tokio::time::timeout(
        timeout,
        state.router.run(&request.question, &corpus, request.evaluate),
    )
    .await
    .map_err(|_| {
        warn!(timeout_secs = timeout.as_secs(), "Query run timed out");
        GatewayError::Timeout {
            secs: timeout.as_secs(),
        }
    })??;

    let status = if response.metadata.cached {
        CacheStatus::Hit
    } else {
        CacheStatus::Miss
    };
    debug!(
        source = ?response.source,
        cache = %status,
        degraded = response.metadata.degraded,
        "Query answered"
    );

    let mut headers = HeaderMap::new();
    headers.insert(
        DOCENT_STATUS_HEADER,
        HeaderValue::from_static(status.as_header_value()),
    );

    Ok((StatusCode::OK, headers, Json(QueryResponse::from(response))).into_response())
}

/// `POST /v1/documents`: chunks and indexes submitted text.
#[instrument(skip(state, request))]
pub async fn documents_handler(
    State(state): State<HandlerState>,
    Json(request): Json<serde_json::Value>,
) -> Result<Response, GatewayError> {
    let request: DocumentRequest = serde_json::from_value(request)
        .map_err(|e| GatewayError::InvalidRequest(format!("Invalid request schema: {}", e)))?;

    let source = normalize_source_id(&request.source).ok_or_else(|| {
        GatewayError::InvalidRequest("`source` must not be empty".to_string())
    })?;

    let (source, chunks) = if is_web_source(&source) {
        debug!(url = %source, "Storing submitted page as web content");
        (
            WEB_CONTENT_SOURCE.to_string(),
            state.index.add_web_content(&request.text)?,
        )
    } else {
        let chunks = state.index.add_document(&source, &request.text)?;
        (source, chunks)
    };
    let total_passages = state.index.passage_count();
    info!(source = %source, chunks, total_passages, "Document ingested");

    let mut headers = HeaderMap::new();
    headers.insert(
        DOCENT_STATUS_HEADER,
        HeaderValue::from_static(DOCENT_STATUS_STORED),
    );

    Ok((
        StatusCode::CREATED,
        headers,
        Json(DocumentResponse {
            source,
            chunks,
            total_passages,
        }),
    )
        .into_response())
}
