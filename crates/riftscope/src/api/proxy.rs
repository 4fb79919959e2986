//! Upstream invocation and response negotiation.
//!
//! `invoke` issues the backend call under the route's timeout budget;
//! `negotiate` decides, from the declared media type, whether to relay
//! the body verbatim as an event stream or to reframe it as a JSON
//! envelope.

use std::time::Instant;

use axum::{
    Json,
    body::Body,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde_json::Value;
use tracing::debug;

use riftscope_protocol::AnalysisEnvelope;

use crate::agents::AgentRoute;

use super::error::ApiError;

/// Media type that selects the pass-through branch.
const EVENT_STREAM: &str = "text/event-stream";

/// Invoke the analysis backend for one agent route.
///
/// The timeout covers the send and response headers only. Once a
/// response arrives the timer future is dropped, so slow relaying of a
/// long stream is never killed by a deadline meant for the network
/// call. If the timer fires first, dropping the in-flight send aborts
/// the upstream connection rather than leaving it running.
pub async fn invoke(
    client: &reqwest::Client,
    base_url: &str,
    route: &AgentRoute,
    payload: &Value,
) -> Result<reqwest::Response, ApiError> {
    let url = format!("{}{}", base_url.trim_end_matches('/'), route.upstream_path);
    debug!(agent = route.logical_id, url = %url, "Invoking analysis backend");

    let started = Instant::now();
    let send = client.post(&url).json(payload).send();

    let response = match tokio::time::timeout(route.timeout, send).await {
        // Timer fired: the send future was dropped and the connection
        // aborted with it.
        Err(_) => return Err(ApiError::timed_out(started.elapsed())),
        Ok(Err(err)) if err.is_timeout() => {
            return Err(ApiError::timed_out(started.elapsed()));
        }
        Ok(Err(err)) if err.is_connect() => {
            return Err(ApiError::unreachable(err.to_string()));
        }
        Ok(Err(err)) => {
            // DNS failures, resets, protocol errors: the backend was
            // not reached in any usable way.
            return Err(ApiError::unreachable(err.to_string()));
        }
        Ok(Ok(response)) => response,
    };

    if !response.status().is_success() {
        let status = response.status();
        // Drain the body as text for diagnostics. Upstream error
        // bodies are not guaranteed to be JSON, so no parsing here.
        let body = response.text().await.unwrap_or_default();
        return Err(ApiError::upstream(status, body));
    }

    Ok(response)
}

/// Convert a successful upstream response into the outward reply.
pub async fn negotiate(response: reqwest::Response) -> Result<Response, ApiError> {
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string();

    if content_type.starts_with(EVENT_STREAM) {
        // The backend's framing is the wire contract: relay the bytes
        // unmodified. Buffering here would defeat real-time delivery
        // and let a long analysis grow without bound.
        let stream = response.bytes_stream();
        let reply = Response::builder()
            .status(StatusCode::OK)
            .header(header::CONTENT_TYPE, EVENT_STREAM)
            .header(header::CACHE_CONTROL, "no-cache")
            .header(header::CONNECTION, "keep-alive")
            .body(Body::from_stream(stream))
            .map_err(|err| ApiError::internal(err.to_string()))?;
        return Ok(reply);
    }

    // Buffered branch: the body must be one JSON value.
    let body = response
        .text()
        .await
        .map_err(|err| ApiError::malformed_upstream(format!("failed to read body: {err}")))?;
    let data: Value = serde_json::from_str(&body).map_err(|err| {
        ApiError::malformed_upstream(format!("declared JSON did not parse: {err}"))
    })?;

    Ok(Json(AnalysisEnvelope::new(data)).into_response())
}
