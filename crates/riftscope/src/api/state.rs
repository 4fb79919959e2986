//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::Settings;

/// Shared state for the gateway router.
///
/// Nothing here is mutable after startup: the settings are read-only
/// and the reqwest client is internally pooled and clone-cheap.
#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub http: reqwest::Client,
}

impl AppState {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings: Arc::new(settings),
            http: reqwest::Client::new(),
        }
    }
}
