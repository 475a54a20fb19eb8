//! Shared test helpers: capture-style mock transport and collaborators.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;

use hearthlink::bridge::ConversationBridge;
use hearthlink::config::BridgeConfig;
use hearthlink::context::{
    BasicPromptRenderer, ExposedEntity, HomeSnapshot, PromptRenderer, StaticHomeContext,
};
use hearthlink::error::{BridgeError, Result};
use hearthlink::transport::Transport;

pub const AGENT_URL: &str = "https://agents.example/agents/butler";

/// Transport that captures posted requests and replays queued responses.
#[derive(Default)]
pub struct MockTransport {
    responses: Mutex<VecDeque<Result<(u16, Value)>>>,
    requests: Mutex<Vec<(String, Value)>>,
}

impl MockTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Queue a 200 response with the given JSON body.
    pub fn queue_body(&self, body: Value) {
        self.responses.lock().unwrap().push_back(Ok((200, body)));
    }

    /// Queue a non-success status.
    pub fn queue_status(&self, status: u16) {
        self.responses
            .lock()
            .unwrap()
            .push_back(Ok((status, Value::Null)));
    }

    /// Queue a transport-level failure.
    pub fn queue_error(&self, err: BridgeError) {
        self.responses.lock().unwrap().push_back(Err(err));
    }

    pub fn requests(&self) -> Vec<(String, Value)> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> Option<Value> {
        self.requests
            .lock()
            .unwrap()
            .last()
            .map(|(_, body)| body.clone())
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn post(&self, url: &str, body: &Value) -> Result<(u16, Value)> {
        self.requests
            .lock()
            .unwrap()
            .push((url.to_string(), body.clone()));
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok((200, Value::Null)))
    }
}

/// Renderer that always fails, for template-fault recovery tests.
pub struct FailingRenderer;

#[async_trait]
impl PromptRenderer for FailingRenderer {
    async fn render(
        &self,
        _template: &str,
        _snapshot: &HomeSnapshot,
        _language: &str,
    ) -> Result<String> {
        Err(BridgeError::Template("boom".into()))
    }
}

pub fn test_snapshot() -> HomeSnapshot {
    HomeSnapshot {
        platform_name: "Test Home".to_string(),
        areas: vec!["Kitchen".to_string()],
        entities: vec![ExposedEntity {
            entity_id: "light.kitchen".to_string(),
            name: "Kitchen Light".to_string(),
            state: "off".to_string(),
            aliases: vec![],
            area: Some("Kitchen".to_string()),
        }],
    }
}

/// A bridge wired to the mock transport with default collaborators.
pub fn test_bridge(transport: Arc<MockTransport>) -> ConversationBridge {
    ConversationBridge::new(
        &BridgeConfig::new("https://agents.example"),
        AGENT_URL,
        transport,
        Box::new(BasicPromptRenderer),
        Box::new(StaticHomeContext::new(test_snapshot())),
    )
}
