//! Conversation bridge: orchestrates one turn from platform utterance to
//! platform result.

use std::sync::Arc;

use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::catalog;
use crate::config::{BridgeConfig, DEFAULT_PROMPT};
use crate::context::{BasicPromptRenderer, HomeContextProvider, HomeSnapshot, PromptRenderer};
use crate::error::{BridgeError, Result};
use crate::protocol::{self, TurnReply};
use crate::session::SessionTracker;
use crate::transport::{HttpTransport, Transport};

/// The platform-facing outcome of one conversation turn.
///
/// Every turn produces one of these; faults are folded into `speech_text`
/// with `continue_conversation = false` rather than raised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentTurnResult {
    pub speech_text: String,
    /// Handle the platform should address the next turn to. Echoes the
    /// incoming handle, or a freshly generated one for a fresh exchange.
    pub conversation_handle: String,
    /// True while the agent expects another user turn in the same task.
    pub continue_conversation: bool,
}

/// Bridges the platform's conversation loop to one remote agent.
///
/// Owns the session tracker exclusively; the host is expected to process
/// turns for one bridge sequentially.
pub struct ConversationBridge {
    agent_url: String,
    prompt_template: String,
    transport: Arc<dyn Transport>,
    renderer: Box<dyn PromptRenderer>,
    home: Box<dyn HomeContextProvider>,
    tracker: SessionTracker,
}

impl ConversationBridge {
    /// Assemble a bridge from an already-resolved agent URL and collaborators.
    pub fn new(
        config: &BridgeConfig,
        agent_url: impl Into<String>,
        transport: Arc<dyn Transport>,
        renderer: Box<dyn PromptRenderer>,
        home: Box<dyn HomeContextProvider>,
    ) -> Self {
        Self {
            agent_url: agent_url.into(),
            prompt_template: config.prompt_template.clone(),
            transport,
            renderer,
            home,
            tracker: SessionTracker::new(config.session_ttl),
        }
    }

    /// Discover an agent from the configured repository catalog and build a
    /// bridge wired to it over HTTP.
    pub async fn discover(
        config: BridgeConfig,
        home: Box<dyn HomeContextProvider>,
    ) -> Result<Self> {
        let transport = HttpTransport::new(config.api_key.as_deref(), config.request_timeout)?;
        let agents = catalog::fetch_agents(transport.client(), &config.repository).await?;
        let card = catalog::select_agent(&agents, config.agent_name.as_deref())?;
        let agent_url = catalog::resolve_agent_url(&config.repository, &card.url);
        info!(agent = %card.name, version = %card.version, url = %agent_url, "agent resolved");

        Ok(Self::new(
            &config,
            agent_url,
            Arc::new(transport),
            Box::new(BasicPromptRenderer),
            home,
        ))
    }

    /// Inspect the tracked session for a handle, pruning expired entries.
    pub fn tracked_session(&mut self, handle: &str) -> Option<&crate::session::TrackedSession> {
        self.tracker.get(handle)
    }

    /// Process one conversation turn. Never returns an error: every fault
    /// becomes a spoken-text result with `continue_conversation = false`.
    pub async fn process_turn(
        &mut self,
        handle: Option<&str>,
        utterance: &str,
        language: &str,
    ) -> AgentTurnResult {
        let effective_handle = handle
            .map(str::to_string)
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        match self
            .run_turn(&effective_handle, handle.is_some(), utterance, language)
            .await
        {
            Ok(result) => result,
            Err(err) => {
                error!(error = %err, "conversation turn failed");
                AgentTurnResult {
                    speech_text: err.speech_text(),
                    conversation_handle: effective_handle,
                    continue_conversation: false,
                }
            }
        }
    }

    async fn run_turn(
        &mut self,
        handle: &str,
        known_handle: bool,
        utterance: &str,
        language: &str,
    ) -> Result<AgentTurnResult> {
        if self.agent_url.is_empty() {
            return Err(BridgeError::Configuration(
                "agent endpoint is not configured".into(),
            ));
        }

        // Resolve session: an unknown or expired handle starts fresh.
        let tracked = if known_handle {
            self.tracker.get(handle).cloned()
        } else {
            None
        };
        let (context_id, task_id) = match tracked {
            Some(session) => (session.context_id, session.task_id),
            None => (Uuid::new_v4().to_string(), None),
        };

        let prompt = self.render_prompt(language).await;
        let request = protocol::encode_turn(&prompt, utterance, &context_id, task_id.as_deref());

        debug!(context_id = %context_id, task_id = ?task_id, "sending turn to agent");
        let (status, body) = self.transport.post(&self.agent_url, &request).await?;
        if status != 200 {
            return Err(BridgeError::api(status, "agent request failed"));
        }

        let reply = protocol::decode_turn(&body, &context_id, task_id.as_deref());
        match reply {
            TurnReply::Error { message } => Err(BridgeError::Protocol(message)),
            TurnReply::Message { context_id, text } => {
                self.tracker.store(handle, context_id, None);
                Ok(AgentTurnResult {
                    speech_text: text,
                    conversation_handle: handle.to_string(),
                    continue_conversation: false,
                })
            }
            TurnReply::Task {
                context_id,
                task_id,
                state,
                text,
            } => {
                let continues = state.expects_continuation();
                // A finished task's id is cleared so the next turn starts a
                // fresh remote task under the same handle.
                let kept_task = if continues { task_id } else { None };
                self.tracker.store(handle, context_id, kept_task);
                Ok(AgentTurnResult {
                    speech_text: text,
                    conversation_handle: handle.to_string(),
                    continue_conversation: continues,
                })
            }
        }
    }

    /// Render the system prompt; template and snapshot faults fall back to
    /// the default prompt instead of aborting the turn.
    async fn render_prompt(&self, language: &str) -> String {
        let snapshot = match self.home.snapshot().await {
            Ok(snapshot) => snapshot,
            Err(err) => {
                warn!(error = %err, "home snapshot unavailable, rendering without context");
                HomeSnapshot::default()
            }
        };

        match self
            .renderer
            .render(&self.prompt_template, &snapshot, language)
            .await
        {
            Ok(prompt) => prompt,
            Err(err) => {
                warn!(error = %err, "prompt template failed, using default prompt");
                DEFAULT_PROMPT.to_string()
            }
        }
    }
}
