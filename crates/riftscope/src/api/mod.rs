//! HTTP API module.
//!
//! REST endpoints plus the upstream proxy logic for agent invocation.

mod error;
pub mod handlers;
pub mod proxy;
mod routes;
mod state;

// Re-export error types for external use
#[allow(unused_imports)]
pub use error::{ApiError, ApiResult, ErrorResponse};
pub use routes::create_router;
pub use state::AppState;
