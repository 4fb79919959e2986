//! Unified API error handling with structured responses.

use std::time::Duration;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};

/// API error type with structured responses.
///
/// The timeout and unreachable variants are deliberately distinct:
/// "took too long" and "service unreachable" call for different user
/// action and must never be conflated.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Unknown agent: {0}")]
    RouteNotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Analysis backend returned {status}: {body}")]
    UpstreamHttp { status: u16, body: String },

    #[error("Request timed out after {} seconds", .0.as_secs())]
    RequestTimedOut(Duration),

    #[error("Cannot connect to analysis backend: {0}")]
    BackendUnreachable(String),

    #[error("Analysis backend sent a malformed body: {0}")]
    MalformedUpstreamBody(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn route_not_found(agent: impl Into<String>) -> Self {
        Self::RouteNotFound(agent.into())
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    pub fn upstream(status: StatusCode, body: impl Into<String>) -> Self {
        Self::UpstreamHttp {
            status: status.as_u16(),
            body: body.into(),
        }
    }

    pub fn timed_out(elapsed: Duration) -> Self {
        Self::RequestTimedOut(elapsed)
    }

    pub fn unreachable(reason: impl Into<String>) -> Self {
        Self::BackendUnreachable(reason.into())
    }

    pub fn malformed_upstream(msg: impl Into<String>) -> Self {
        Self::MalformedUpstreamBody(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    fn status_code(&self) -> StatusCode {
        match self {
            Self::RouteNotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            // Mirror the upstream status when it is a valid code.
            Self::UpstreamHttp { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            Self::RequestTimedOut(_) => StatusCode::GATEWAY_TIMEOUT,
            Self::BackendUnreachable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::MalformedUpstreamBody(_) => StatusCode::BAD_GATEWAY,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::RouteNotFound(_) => "ROUTE_NOT_FOUND",
            Self::BadRequest(_) => "BAD_REQUEST",
            Self::UpstreamHttp { .. } => "UPSTREAM_ERROR",
            Self::RequestTimedOut(_) => "REQUEST_TIMED_OUT",
            Self::BackendUnreachable(_) => "BACKEND_UNREACHABLE",
            Self::MalformedUpstreamBody(_) => "MALFORMED_UPSTREAM_BODY",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

/// Structured error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.error_code();
        let message = self.to_string();

        match &self {
            ApiError::Internal(msg) | ApiError::MalformedUpstreamBody(msg) => {
                error!(error_code = code, message = %msg, "API error");
            }
            ApiError::BackendUnreachable(msg) => {
                warn!(error_code = code, message = %msg, "Backend unreachable");
            }
            ApiError::RequestTimedOut(elapsed) => {
                warn!(error_code = code, elapsed_ms = elapsed.as_millis() as u64, "Upstream timeout");
            }
            ApiError::UpstreamHttp { status, .. } => {
                warn!(error_code = code, upstream_status = status, "Upstream error");
            }
            _ => {
                tracing::debug!(error_code = code, message = %message, "Client error");
            }
        }

        // Upstream error bodies go in details so the message stays
        // one line.
        let details = match &self {
            ApiError::UpstreamHttp { body, .. } if !body.is_empty() => Some(body.clone()),
            _ => None,
        };

        let body = ErrorResponse {
            error: message,
            code,
            details,
        };

        (status, Json(body)).into_response()
    }
}

/// Result type for API handlers.
pub type ApiResult<T> = Result<T, ApiError>;
