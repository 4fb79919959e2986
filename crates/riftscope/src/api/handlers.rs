//! Gateway request handlers.

use axum::{
    Json,
    extract::{Path, State},
    response::Response,
};
use serde::Serialize;
use serde_json::Value;
use tracing::{info, instrument};

use crate::agents;

use super::error::{ApiError, ApiResult};
use super::proxy;
use super::state::AppState;

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Health check endpoint - no authentication required.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// One agent in the listing response.
#[derive(Debug, Serialize)]
pub struct AgentInfo {
    pub id: &'static str,
    pub upstream_path: &'static str,
    pub timeout_secs: u64,
}

/// List the agents this gateway can route to.
///
/// GET /api/agents
pub async fn list_agents() -> Json<Vec<AgentInfo>> {
    let agents = agents::list()
        .iter()
        .map(|route| AgentInfo {
            id: route.logical_id,
            upstream_path: route.upstream_path,
            timeout_secs: route.timeout.as_secs(),
        })
        .collect();
    Json(agents)
}

/// Invoke an agent and relay the backend's reply.
///
/// POST /api/agents/{agent}/invoke
///
/// The JSON body is forwarded to the backend verbatim. The reply is
/// either the backend's event stream relayed byte-for-byte or a
/// normalized JSON envelope, depending on what the backend declared.
#[instrument(skip(state, payload))]
pub async fn invoke_agent(
    State(state): State<AppState>,
    Path(agent): Path<String>,
    Json(payload): Json<Value>,
) -> ApiResult<Response> {
    let route = agents::resolve(&agent).ok_or_else(|| ApiError::route_not_found(agent.as_str()))?;

    info!(
        agent = route.logical_id,
        upstream_path = route.upstream_path,
        timeout_secs = route.timeout.as_secs(),
        "Agent invocation"
    );

    let response = proxy::invoke(
        &state.http,
        state.settings.analysis_base(),
        route,
        &payload,
    )
    .await?;

    proxy::negotiate(response).await
}
