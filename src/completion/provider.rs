//! Endpoint catalogue and provider construction.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use super::{Agent, Agents, ModelSettings, OpenAiClient, RateLimited, RateLimiter};
use crate::error::{Result, TranslationError};
use crate::types::{EndpointConfig, ServiceConfig};

/// Known OpenAI-compatible completion endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Endpoint {
    #[serde(alias = "OpenAI")]
    OpenAi,
    #[serde(alias = "Groq")]
    Groq,
    #[serde(alias = "TogetherAI")]
    TogetherAi,
    #[serde(alias = "Ollama")]
    Ollama,
    #[serde(alias = "CUSTOM")]
    Custom,
}

impl Endpoint {
    /// Base URL used when none is configured.
    pub fn default_base_url(&self) -> Option<&'static str> {
        match self {
            Endpoint::OpenAi => Some("https://api.openai.com/v1"),
            Endpoint::Groq => Some("https://api.groq.com/openai/v1"),
            Endpoint::TogetherAi => Some("https://api.together.xyz/v1"),
            Endpoint::Ollama => Some("http://localhost:11434/v1"),
            Endpoint::Custom => None,
        }
    }

    /// Environment variable holding the API key when none is configured.
    pub fn api_key_env(&self) -> Option<&'static str> {
        match self {
            Endpoint::OpenAi => Some("OPENAI_API_KEY"),
            Endpoint::Groq => Some("GROQ_API_KEY"),
            Endpoint::TogetherAi => Some("TOGETHER_API_KEY"),
            Endpoint::Ollama | Endpoint::Custom => None,
        }
    }

    /// Model used when none is configured.
    pub fn default_model(&self) -> Option<&'static str> {
        match self {
            Endpoint::OpenAi => Some("gpt-4o"),
            Endpoint::Groq => Some("llama3-70b-8192"),
            Endpoint::TogetherAi => Some("Qwen/Qwen2-72B-Instruct"),
            Endpoint::Ollama => Some("llama3.1"),
            Endpoint::Custom => None,
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endpoint::OpenAi => write!(f, "openai"),
            Endpoint::Groq => write!(f, "groq"),
            Endpoint::TogetherAi => write!(f, "togetherai"),
            Endpoint::Ollama => write!(f, "ollama"),
            Endpoint::Custom => write!(f, "custom"),
        }
    }
}

/// Resolve the model settings for an endpoint, filling in its defaults.
pub(crate) fn resolve_settings(config: &EndpointConfig) -> Result<ModelSettings> {
    let model = config
        .model
        .clone()
        .filter(|m| !m.trim().is_empty())
        .or_else(|| config.endpoint.default_model().map(String::from))
        .ok_or_else(|| {
            TranslationError::Config(format!("endpoint '{}' requires a model", config.endpoint))
        })?;

    Ok(ModelSettings {
        model,
        temperature: config.temperature,
        json_mode: config.json_mode,
    })
}

/// Build a rate-limited agent for one configured endpoint.
fn build_agent(config: &EndpointConfig, limiter: &Arc<RateLimiter>) -> Result<Agent> {
    let base_url = config
        .base_url
        .clone()
        .or_else(|| config.endpoint.default_base_url().map(String::from))
        .ok_or_else(|| {
            TranslationError::Config(format!("endpoint '{}' requires a base_url", config.endpoint))
        })?;

    let api_key = config.api_key.clone().or_else(|| {
        config
            .endpoint
            .api_key_env()
            .and_then(|var| std::env::var(var).ok())
    });
    // Ollama ignores the key but its OpenAI shim expects one.
    let api_key = match config.endpoint {
        Endpoint::Ollama => api_key.or_else(|| Some("ollama".to_string())),
        _ => api_key,
    };

    let settings = resolve_settings(config)?;
    let client = OpenAiClient::new(&config.endpoint.to_string(), &base_url, api_key)
        .map_err(|e| TranslationError::Config(e.to_string()))?;

    info!(
        endpoint = %config.endpoint,
        base_url = %base_url,
        model = %settings.model,
        "Configured completion endpoint"
    );

    Ok(Agent::new(
        Arc::new(RateLimited::new(client, Arc::clone(limiter))),
        settings,
    ))
}

/// Build the translator and reviewer agents from service configuration.
///
/// Both endpoints share one process-wide rate limiter.
pub fn build_agents(config: &ServiceConfig) -> Result<Agents> {
    let limiter = Arc::new(RateLimiter::per_minute(config.requests_per_minute));
    let translator = build_agent(&config.primary, &limiter)?;

    match &config.reviewer {
        Some(reviewer) => Ok(Agents::with_reviewer(
            translator,
            build_agent(reviewer, &limiter)?,
        )),
        None => Ok(Agents::single(translator)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn endpoint_config(endpoint: Endpoint) -> EndpointConfig {
        EndpointConfig {
            endpoint,
            ..EndpointConfig::default()
        }
    }

    #[test]
    fn test_endpoint_defaults() {
        assert_eq!(Endpoint::Groq.default_base_url(), Some("https://api.groq.com/openai/v1"));
        assert_eq!(Endpoint::Ollama.default_model(), Some("llama3.1"));
        assert_eq!(Endpoint::TogetherAi.api_key_env(), Some("TOGETHER_API_KEY"));
        assert_eq!(Endpoint::Custom.default_base_url(), None);
    }

    #[test]
    fn test_endpoint_names_deserialize() {
        let parsed: Endpoint = serde_json::from_str("\"togetherai\"").unwrap();
        assert_eq!(parsed, Endpoint::TogetherAi);
        let parsed: Endpoint = serde_json::from_str("\"OpenAI\"").unwrap();
        assert_eq!(parsed, Endpoint::OpenAi);
        assert_eq!(Endpoint::OpenAi.to_string(), "openai");
    }

    #[test]
    fn test_resolve_settings_uses_endpoint_default_model() {
        let settings = resolve_settings(&endpoint_config(Endpoint::Groq)).unwrap();
        assert_eq!(settings.model, "llama3-70b-8192");
    }

    #[test]
    fn test_custom_endpoint_requires_model_and_url() {
        let config = endpoint_config(Endpoint::Custom);
        assert!(matches!(
            resolve_settings(&config),
            Err(TranslationError::Config(_))
        ));

        let limiter = Arc::new(RateLimiter::per_minute(60));
        let config = EndpointConfig {
            model: Some("my-model".to_string()),
            ..endpoint_config(Endpoint::Custom)
        };
        assert!(matches!(
            build_agent(&config, &limiter),
            Err(TranslationError::Config(_))
        ));
    }

    #[test]
    fn test_build_agents_with_reviewer() {
        let config = ServiceConfig {
            primary: endpoint_config(Endpoint::Ollama),
            reviewer: Some(EndpointConfig {
                model: Some("qwen2".to_string()),
                base_url: Some("http://localhost:8000/v1".to_string()),
                ..endpoint_config(Endpoint::Custom)
            }),
            ..ServiceConfig::default()
        };
        let agents = build_agents(&config).unwrap();
        assert_eq!(agents.translator.provider_name(), "ollama");
        assert_eq!(agents.reviewer.provider_name(), "custom");
        assert_eq!(agents.reviewer.settings().model, "qwen2");
    }
}
