//! Shared helpers for gateway integration tests.

use axum::Router;
use tokio::net::TcpListener;

use riftscope::api::{AppState, create_router};
use riftscope::config::Settings;

/// Serve a stub analysis backend on an ephemeral port, returning its
/// base URL.
pub async fn spawn_upstream(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

/// Build the gateway router pointed at the given backend.
pub fn test_app(analysis_url: &str) -> Router {
    let settings = Settings {
        analysis_url: analysis_url.to_string(),
        ..Settings::default()
    };
    create_router(AppState::new(settings))
}

/// A base URL that nothing listens on.
pub async fn unreachable_base_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}
