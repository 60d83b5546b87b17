//! The external text-completion capability and the agents built on it.
//!
//! The pipeline only ever sees [`CompletionProvider`]: a black box that turns
//! a prompt plus a system message into text. Provider selection, HTTP and
//! rate limiting all live behind that trait.

mod mock;
mod openai;
mod provider;
mod rate_limit;

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use mock::MockCompletion;
pub use openai::OpenAiClient;
pub use provider::{build_agents, Endpoint};
pub use rate_limit::{RateLimited, RateLimiter};

use crate::pipeline::Prompt;
use crate::{DEFAULT_MODEL, DEFAULT_TEMPERATURE};

/// A single chat-completion call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletionRequest {
    pub prompt: String,
    pub system_message: String,
    pub model: String,
    pub temperature: f32,
    pub json_mode: bool,
}

/// Failure of the external completion capability.
#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("request to completion endpoint failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("completion endpoint returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("completion endpoint returned no content")]
    EmptyResponse,

    #[error("{0}")]
    Provider(String),
}

/// Generic trait for text-completion providers.
///
/// Implementations handle the actual model call, whether through an
/// OpenAI-compatible API or deterministic logic (mock).
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Run one completion and return the generated text.
    async fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError>;

    /// Human-readable provider name, for logging.
    fn provider_name(&self) -> &str;
}

/// Per-endpoint model parameters sent with every call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSettings {
    pub model: String,
    pub temperature: f32,
    pub json_mode: bool,
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            json_mode: false,
        }
    }
}

/// A provider bound to the model settings it is called with.
#[derive(Clone)]
pub struct Agent {
    provider: Arc<dyn CompletionProvider>,
    settings: ModelSettings,
}

impl Agent {
    pub fn new(provider: Arc<dyn CompletionProvider>, settings: ModelSettings) -> Self {
        Self { provider, settings }
    }

    pub fn settings(&self) -> &ModelSettings {
        &self.settings
    }

    pub fn provider_name(&self) -> &str {
        self.provider.provider_name()
    }

    /// Send a prompt with this agent's model settings.
    pub async fn ask(&self, prompt: Prompt) -> Result<String, CompletionError> {
        let request = CompletionRequest {
            prompt: prompt.user,
            system_message: prompt.system,
            model: self.settings.model.clone(),
            temperature: self.settings.temperature,
            json_mode: self.settings.json_mode,
        };
        self.provider.complete(&request).await
    }
}

/// The agents used by the three passes.
///
/// The initial translation always goes to `translator`; reflection and
/// improvement go to `reviewer`, which is the translator itself unless a
/// second endpoint was configured.
#[derive(Clone)]
pub struct Agents {
    pub translator: Agent,
    pub reviewer: Agent,
}

impl Agents {
    /// Use one agent for every pass.
    pub fn single(agent: Agent) -> Self {
        Self {
            reviewer: agent.clone(),
            translator: agent,
        }
    }

    /// Use a separate agent for reflection and improvement.
    pub fn with_reviewer(translator: Agent, reviewer: Agent) -> Self {
        Self {
            translator,
            reviewer,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_agent_applies_model_settings() {
        let mock = Arc::new(MockCompletion::echo());
        let settings = ModelSettings {
            model: "llama3.1".to_string(),
            temperature: 0.1,
            json_mode: true,
        };
        let agent = Agent::new(mock.clone(), settings);

        let reply = agent
            .ask(Prompt::new("You are terse.", "Say hi"))
            .await
            .unwrap();
        assert_eq!(reply, "Say hi");

        let requests = mock.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].system_message, "You are terse.");
        assert_eq!(requests[0].model, "llama3.1");
        assert!(requests[0].json_mode);
    }

    #[test]
    fn test_single_agents_share_provider() {
        let agent = Agent::new(Arc::new(MockCompletion::echo()), ModelSettings::default());
        let agents = Agents::single(agent);
        assert_eq!(agents.translator.provider_name(), agents.reviewer.provider_name());
        assert_eq!(agents.reviewer.settings().model, DEFAULT_MODEL);
    }
}
