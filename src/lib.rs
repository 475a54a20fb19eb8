//! Hearthlink — A2A conversation bridge for smart-home platforms.
//!
//! Lets an automation platform delegate natural-language turns to an agent
//! service reachable over HTTP JSON-RPC, discovering agents from a remote
//! catalog and keeping multi-turn continuity via a TTL-bounded session
//! tracker.
//!
//! # Quick Start
//!
//! ```no_run
//! use hearthlink::prelude::*;
//! use hearthlink::context::StaticHomeContext;
//!
//! # async fn example() -> hearthlink::error::Result<()> {
//! let config = BridgeConfig::new("https://agents.example").with_agent_name("butler");
//! let mut bridge =
//!     ConversationBridge::discover(config, Box::new(StaticHomeContext::default())).await?;
//! let result = bridge.process_turn(None, "Turn on the kitchen light", "en").await;
//! println!("{}", result.speech_text);
//! # Ok(())
//! # }
//! ```

pub mod bridge;
pub mod catalog;
pub mod config;
pub mod context;
pub mod error;
pub mod prelude;
pub mod protocol;
pub mod session;
pub mod transport;
