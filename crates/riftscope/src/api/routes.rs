//! API route definitions.

use axum::http::{HeaderValue, Method, header};
use axum::{
    Router,
    routing::{get, post},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;

use super::handlers;
use super::state::AppState;

/// Create the gateway router.
pub fn create_router(state: AppState) -> Router {
    let cors = build_cors_layer(&state);

    // Tracing layer with request timing
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::DEBUG))
        .on_request(DefaultOnRequest::new().level(Level::DEBUG))
        .on_response(DefaultOnResponse::new().level(Level::DEBUG));

    Router::new()
        .route("/health", get(handlers::health))
        .route("/api/agents", get(handlers::list_agents))
        .route("/api/agents/{agent}/invoke", post(handlers::invoke_agent))
        .layer(cors)
        .layer(trace_layer)
        .with_state(state)
}

fn build_cors_layer(state: &AppState) -> CorsLayer {
    let methods = [Method::GET, Method::POST];
    let headers = [header::CONTENT_TYPE, header::ACCEPT];

    let origins: Vec<HeaderValue> = state
        .settings
        .allowed_origins
        .iter()
        .filter_map(|origin| {
            origin.parse::<HeaderValue>().ok().or_else(|| {
                tracing::warn!("CORS: Invalid origin in config: {}", origin);
                None
            })
        })
        .collect();

    if origins.is_empty() {
        tracing::warn!("CORS: No valid origins configured, denying all cross-origin requests");
        CorsLayer::new()
    } else {
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(methods)
            .allow_headers(headers)
    }
}
