//! Bridge configuration (code > env defaults).

use std::time::Duration;

use crate::error::{BridgeError, Result};

/// Default system prompt used when no template is configured or when
/// template rendering fails.
pub const DEFAULT_PROMPT: &str = "This smart home is controlled by an automation platform.\n\
Respond naturally to the user's request, and if applicable, suggest actions \
that the platform can perform.";

/// Default session TTL in seconds.
pub const DEFAULT_TTL_SECS: u64 = 300;

/// Default network timeout for agent calls, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Connection and behavior configuration for one bridge instance.
#[derive(Debug, Clone)]
pub struct BridgeConfig {
    /// Base URL of the agent repository (catalog host).
    pub repository: String,
    /// Optional API key, sent as `X-Api-Key` on every request.
    pub api_key: Option<String>,
    /// Preferred agent name in the catalog; first agent is used when unset
    /// or not found.
    pub agent_name: Option<String>,
    /// System prompt template rendered per turn.
    pub prompt_template: String,
    /// How long a conversation mapping survives without a new turn.
    pub session_ttl: Duration,
    /// Bound on each network call to the agent.
    pub request_timeout: Duration,
}

impl BridgeConfig {
    /// Create a config for the given repository URL with all defaults.
    pub fn new(repository: impl Into<String>) -> Self {
        Self {
            repository: repository.into(),
            api_key: None,
            agent_name: None,
            prompt_template: DEFAULT_PROMPT.to_string(),
            session_ttl: Duration::from_secs(DEFAULT_TTL_SECS),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Load from environment variables (`HEARTHLINK_REPOSITORY`,
    /// `HEARTHLINK_API_KEY`, `HEARTHLINK_AGENT_NAME`).
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv(); // load .env if present, ignore error

        let repository = std::env::var("HEARTHLINK_REPOSITORY").map_err(|_| {
            BridgeError::Configuration("HEARTHLINK_REPOSITORY is not set".to_string())
        })?;

        let mut config = Self::new(repository);
        config.api_key = std::env::var("HEARTHLINK_API_KEY").ok();
        config.agent_name = std::env::var("HEARTHLINK_AGENT_NAME").ok();
        Ok(config)
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_agent_name(mut self, name: impl Into<String>) -> Self {
        self.agent_name = Some(name.into());
        self
    }

    pub fn with_prompt_template(mut self, template: impl Into<String>) -> Self {
        self.prompt_template = template.into();
        self
    }

    pub fn with_session_ttl(mut self, ttl: Duration) -> Self {
        self.session_ttl = ttl;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}
