use axum::{
    Json,
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::agent::AgentError;
use crate::cache::DOCENT_STATUS_HEADER;
use crate::retrieval::RetrievalError;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("No data available. Upload files or submit URLs first.")]
    NoData,

    #[error("{0}")]
    UpstreamUnavailable(String),

    #[error("request timed out after {secs}s")]
    Timeout { secs: u64 },

    #[error("internal error: {0}")]
    InternalError(String),
}

impl From<AgentError> for GatewayError {
    fn from(err: AgentError) -> Self {
        match err {
            AgentError::InvalidArgument(msg) => GatewayError::InvalidRequest(msg),
            AgentError::NoData => GatewayError::NoData,
            e @ AgentError::UpstreamUnavailable { .. } => {
                GatewayError::UpstreamUnavailable(e.to_string())
            }
        }
    }
}

impl From<RetrievalError> for GatewayError {
    fn from(err: RetrievalError) -> Self {
        match err {
            RetrievalError::EmptyDocument { .. } => GatewayError::InvalidRequest(err.to_string()),
            other => GatewayError::InternalError(other.to_string()),
        }
    }
}

#[derive(serde::Serialize, serde::Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let (status, docent_status) = match &self {
            GatewayError::InvalidRequest(_) => (StatusCode::BAD_REQUEST, "invalid_request"),
            GatewayError::NoData => (StatusCode::BAD_REQUEST, "no_data"),
            GatewayError::UpstreamUnavailable(_) => (StatusCode::BAD_GATEWAY, "upstream_error"),
            GatewayError::Timeout { .. } => (StatusCode::GATEWAY_TIMEOUT, "timeout"),
            GatewayError::InternalError(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error")
            }
        };

        let mut headers = HeaderMap::new();
        headers.insert(DOCENT_STATUS_HEADER, HeaderValue::from_static(docent_status));

        let body = Json(ErrorResponse {
            error: self.to_string(),
            code: status.as_u16(),
        });

        (status, headers, body).into_response()
    }
}
