//! Error types for Hearthlink.

use thiserror::Error;

/// Primary error type for all bridge operations.
#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Agent returned status {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Template error: {0}")]
    Template(String),

    #[error("Agent error: {0}")]
    Protocol(String),

    #[error("Timeout after {0}ms")]
    Timeout(u64),
}

impl BridgeError {
    /// Create an API error from a status code and response body.
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// The text spoken to the user when this error terminates a turn.
    ///
    /// Faults surface as speech; they are never re-raised to the host
    /// platform's conversation loop.
    pub fn speech_text(&self) -> String {
        match self {
            Self::Configuration(_) => {
                "I'm sorry, but I'm not properly configured. Please check the integration settings."
                    .to_string()
            }
            Self::Protocol(msg) => format!("Agent error: {msg}"),
            Self::Network(err) => format!("I couldn't reach the agent: {err}"),
            Self::Api { status, .. } => {
                format!("The agent returned an unexpected status ({status}).")
            }
            Self::Timeout(ms) => {
                format!("The agent didn't respond within {} seconds.", ms / 1000)
            }
            other => format!("I encountered an error while processing your request: {other}"),
        }
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, BridgeError>;
