//! Studio configuration.

use derive_getters::Getters;
use hokusai_core::{DEFAULT_ART_STYLE, DEFAULT_ASPECT_RATIO};
use hokusai_error::{ConfigError, HokusaiResult};
use serde::{Deserialize, Serialize};
use std::path::Path;
use typed_builder::TypedBuilder;

fn default_art_style() -> String {
    DEFAULT_ART_STYLE.to_string()
}

fn default_aspect_ratio() -> String {
    DEFAULT_ASPECT_RATIO.to_string()
}

fn default_analysis_timeout_secs() -> u64 {
    60
}

fn default_generation_timeout_secs() -> u64 {
    120
}

/// Configuration for the storyboard studio core.
#[derive(Debug, Clone, Serialize, Deserialize, Getters, TypedBuilder)]
pub struct StudioConfig {
    /// Base URL of the analysis/generation service
    #[builder(setter(into))]
    service_url: String,
    /// Base URL of the persistence backend
    #[builder(setter(into))]
    backend_url: String,
    /// API key for the persistence backend
    #[builder(setter(into))]
    backend_api_key: String,
    /// Art style passed to the analysis service
    #[serde(default = "default_art_style")]
    #[builder(default = default_art_style(), setter(into))]
    art_style: String,
    /// Aspect ratio for generated panel art
    #[serde(default = "default_aspect_ratio")]
    #[builder(default = default_aspect_ratio(), setter(into))]
    aspect_ratio: String,
    /// Ceiling on one analysis call (seconds)
    #[serde(default = "default_analysis_timeout_secs")]
    #[builder(default = default_analysis_timeout_secs())]
    analysis_timeout_secs: u64,
    /// Ceiling on one image generation call (seconds)
    #[serde(default = "default_generation_timeout_secs")]
    #[builder(default = default_generation_timeout_secs())]
    generation_timeout_secs: u64,
}

impl StudioConfig {
    /// Load configuration from a TOML file.
    #[tracing::instrument(skip(path))]
    pub fn from_file(path: impl AsRef<Path>) -> HokusaiResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        toml::from_str(&content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)).into())
    }

    /// Load configuration from the environment, honoring a `.env` file.
    ///
    /// Required: `HOKUSAI_SERVICE_URL`, `HOKUSAI_BACKEND_URL`,
    /// `HOKUSAI_BACKEND_API_KEY`. The rest fall back to defaults.
    pub fn from_env() -> HokusaiResult<Self> {
        let _ = dotenvy::dotenv();

        let required = |name: &str| -> HokusaiResult<String> {
            std::env::var(name)
                .map_err(|_| ConfigError::new(format!("{} is not set", name)).into())
        };

        Ok(Self {
            service_url: required("HOKUSAI_SERVICE_URL")?,
            backend_url: required("HOKUSAI_BACKEND_URL")?,
            backend_api_key: required("HOKUSAI_BACKEND_API_KEY")?,
            art_style: std::env::var("HOKUSAI_ART_STYLE").unwrap_or_else(|_| default_art_style()),
            aspect_ratio: std::env::var("HOKUSAI_ASPECT_RATIO")
                .unwrap_or_else(|_| default_aspect_ratio()),
            analysis_timeout_secs: std::env::var("HOKUSAI_ANALYSIS_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or_else(default_analysis_timeout_secs),
            generation_timeout_secs: std::env::var("HOKUSAI_GENERATION_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or_else(default_generation_timeout_secs),
        })
    }
}
