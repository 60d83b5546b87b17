//! Configuration types for the translation service.

use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::completion::Endpoint;
use crate::{
    DEFAULT_CONCURRENCY, DEFAULT_ENCODING, DEFAULT_MAX_TOKENS_PER_CHUNK,
    DEFAULT_REQUESTS_PER_MINUTE, DEFAULT_TEMPERATURE,
};

/// Global translation service configuration.
///
/// Loaded from built-in defaults, an optional config file and `TRANSLATOR_*`
/// environment variables, in that order of precedence (last wins).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// HTTP port
    pub port: u16,

    /// Default per-chunk token budget for requests that don't set one
    pub max_tokens_per_chunk: usize,

    /// Token encoding used for sizing and splitting
    pub encoding: String,

    /// Completion calls allowed per minute, process-wide (0 disables)
    pub requests_per_minute: u32,

    /// Concurrent completion calls within one pass
    pub concurrency: usize,

    /// Endpoint used for the initial translation (and the rest, by default)
    pub primary: EndpointConfig,

    /// Optional second endpoint for reflection and improvement
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviewer: Option<EndpointConfig>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            port: 3017,
            max_tokens_per_chunk: DEFAULT_MAX_TOKENS_PER_CHUNK,
            encoding: DEFAULT_ENCODING.to_string(),
            requests_per_minute: DEFAULT_REQUESTS_PER_MINUTE,
            concurrency: DEFAULT_CONCURRENCY,
            primary: EndpointConfig::default(),
            reviewer: None,
        }
    }
}

impl ServiceConfig {
    /// Load configuration, layering an optional file and the environment
    /// over the defaults.
    ///
    /// Nested keys use `__` in variable names, e.g. `TRANSLATOR_PRIMARY__MODEL`.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let mut builder = config::Config::builder()
            .add_source(config::Config::try_from(&Self::default())?);

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path).required(true));
        }

        builder
            .add_source(
                config::Environment::with_prefix("TRANSLATOR")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .context("failed to read configuration")?
            .try_deserialize()
            .context("invalid configuration")
    }

    /// The pipeline parameters derived from this configuration.
    pub fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            concurrency: self.concurrency,
            encoding: self.encoding.clone(),
        }
    }
}

/// One completion endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointConfig {
    pub endpoint: Endpoint,

    /// Model name; defaults per endpoint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// Base URL; required for `custom`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// API key; falls back to the endpoint's environment variable
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    #[serde(default)]
    pub json_mode: bool,
}

fn default_temperature() -> f32 {
    DEFAULT_TEMPERATURE
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            endpoint: Endpoint::OpenAi,
            model: None,
            base_url: None,
            api_key: None,
            temperature: DEFAULT_TEMPERATURE,
            json_mode: false,
        }
    }
}

/// Parameters for the translation pipeline itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Maximum concurrent completion calls within one pass (1 = sequential)
    pub concurrency: usize,

    /// Token encoding name
    pub encoding: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            encoding: DEFAULT_ENCODING.to_string(),
        }
    }
}

impl PipelineConfig {
    /// Set the concurrency.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }
}
