//! Convenience re-exports for common use.

pub use crate::bridge::{AgentTurnResult, ConversationBridge};
pub use crate::catalog::AgentCard;
pub use crate::config::BridgeConfig;
pub use crate::context::{HomeContextProvider, HomeSnapshot, PromptRenderer};
pub use crate::error::{BridgeError, Result};
pub use crate::protocol::{TaskState, TurnReply};
pub use crate::session::SessionTracker;
pub use crate::transport::Transport;
