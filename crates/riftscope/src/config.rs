//! Gateway configuration.
//!
//! Layered the same way across deployments: compiled defaults, then an
//! optional `riftscope.toml`, then `RIFTSCOPE_*` environment
//! variables. The analysis backend address is the one setting every
//! deployment overrides; everything else has sensible local defaults.

use std::path::Path;

use anyhow::{Context, Result};
use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;

/// Local-development default for the analysis backend.
pub const DEFAULT_ANALYSIS_URL: &str = "http://localhost:8000";

/// Resolved gateway settings.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Base address of the analysis backend
    /// (`RIFTSCOPE_ANALYSIS_URL`).
    pub analysis_url: String,
    /// Bind address for the gateway itself.
    pub host: String,
    pub port: u16,
    /// Origins allowed by the CORS layer.
    pub allowed_origins: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            analysis_url: DEFAULT_ANALYSIS_URL.to_string(),
            host: "127.0.0.1".to_string(),
            port: 3100,
            allowed_origins: vec!["http://localhost:3000".to_string()],
        }
    }
}

impl Settings {
    /// Load settings from an optional TOML file plus the environment.
    pub fn load(config_file: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder()
            .set_default("analysis_url", DEFAULT_ANALYSIS_URL)?
            .set_default("host", "127.0.0.1")?
            .set_default("port", 3100_i64)?
            .set_default("allowed_origins", vec!["http://localhost:3000"])?;

        if let Some(path) = config_file {
            builder = builder.add_source(
                File::from(path).format(FileFormat::Toml).required(false),
            );
        }

        let built = builder
            .add_source(Environment::with_prefix("RIFTSCOPE"))
            .build()
            .context("failed to assemble configuration")?;

        let settings: Settings = built
            .try_deserialize()
            .context("invalid configuration values")?;
        Ok(settings)
    }

    /// Backend base with no trailing slash, safe to join with a route
    /// path.
    pub fn analysis_base(&self) -> &str {
        self.analysis_url.trim_end_matches('/')
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_local_backend() {
        let settings = Settings::default();
        assert_eq!(settings.analysis_url, "http://localhost:8000");
        assert_eq!(settings.analysis_base(), "http://localhost:8000");
    }

    #[test]
    fn trailing_slash_is_stripped_for_joins() {
        let settings = Settings {
            analysis_url: "http://backend:8000/".to_string(),
            ..Settings::default()
        };
        assert_eq!(settings.analysis_base(), "http://backend:8000");
    }
}
