//! Wire codec for the JSON-RPC agent protocol.
//!
//! Pure functions: [`encode_turn`] builds the outbound `message/send`
//! envelope, [`decode_turn`] classifies the heterogeneous reply shapes
//! (error, plain message, stateful task) into one tagged union.

use serde::Deserialize;
use serde_json::{json, Value};

/// Separator folding the system prompt and the user utterance into one text
/// part; the protocol has no role separation below the message level.
pub const PROMPT_SEPARATOR: &str = "\n\nUser: ";

/// Spoken when a reply carried no text parts at all.
pub const NO_CONTENT_FALLBACK: &str = "I received your message but didn't generate a response.";

/// Lifecycle state of a remote task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskState {
    Working,
    InputRequired,
    Completed,
    #[serde(other)]
    Other,
}

impl TaskState {
    /// Whether the agent expects another user turn addressed to this task.
    pub fn expects_continuation(self) -> bool {
        matches!(self, Self::Working | Self::InputRequired)
    }
}

/// A decoded agent reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnReply {
    /// JSON-RPC level error.
    Error { message: String },
    /// Stateless single-shot reply.
    Message { context_id: String, text: String },
    /// Stateful reply; the task survives across turns while its state
    /// signals continuation.
    Task {
        context_id: String,
        task_id: Option<String>,
        state: TaskState,
        text: String,
    },
}

impl TurnReply {
    /// True only for a task reply whose state expects another turn.
    pub fn expects_continuation(&self) -> bool {
        match self {
            Self::Task { state, .. } => state.expects_continuation(),
            _ => false,
        }
    }

    /// The context id to thread subsequent turns under, if any.
    pub fn context_id(&self) -> Option<&str> {
        match self {
            Self::Message { context_id, .. } | Self::Task { context_id, .. } => Some(context_id),
            Self::Error { .. } => None,
        }
    }
}

/// Build the JSON-RPC `message/send` request body for one turn.
///
/// `task_id` is serialized as explicit `null` when absent; the wire format
/// requires the field to be present.
pub fn encode_turn(
    prompt: &str,
    utterance: &str,
    context_id: &str,
    task_id: Option<&str>,
) -> Value {
    json!({
        "jsonrpc": "2.0",
        "method": "message/send",
        "params": {
            "message": {
                "kind": "message",
                "role": "user",
                "parts": [
                    {
                        "kind": "text",
                        "text": format!("{prompt}{PROMPT_SEPARATOR}{utterance}"),
                        "metadata": null,
                    }
                ],
                "messageId": null,
                "contextId": context_id,
                "taskId": task_id,
                "metadata": null,
                "referenceTaskIds": [],
                "extensions": [],
            }
        },
        "id": 1,
    })
}

#[derive(Debug, Deserialize)]
struct RpcError {
    message: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RpcResult {
    id: Option<String>,
    #[serde(rename = "contextId")]
    context_id: Option<String>,
    status: Option<RpcStatus>,
    #[serde(default)]
    parts: Vec<RpcPart>,
}

#[derive(Debug, Deserialize)]
struct RpcStatus {
    state: Option<TaskState>,
    message: Option<RpcStatusMessage>,
}

#[derive(Debug, Default, Deserialize)]
struct RpcStatusMessage {
    #[serde(default)]
    parts: Vec<RpcPart>,
}

#[derive(Debug, Default, Deserialize)]
struct RpcPart {
    #[serde(default)]
    kind: String,
    #[serde(default)]
    text: String,
}

/// Concatenate the text of every `kind == "text"` part, in order.
fn collect_text(parts: &[RpcPart]) -> String {
    parts
        .iter()
        .filter(|part| part.kind == "text")
        .map(|part| part.text.as_str())
        .collect()
}

fn non_empty_or_fallback(text: String) -> String {
    if text.is_empty() {
        NO_CONTENT_FALLBACK.to_string()
    } else {
        text
    }
}

/// Classify a raw reply body into a [`TurnReply`].
///
/// `prior_context_id` and `prior_task_id` are the identifiers already known
/// for this conversation; the reply's fields fall back to them when absent.
/// Replies whose accumulated text is empty are normalized to
/// [`NO_CONTENT_FALLBACK`]; that is not an error.
pub fn decode_turn(
    body: &Value,
    prior_context_id: &str,
    prior_task_id: Option<&str>,
) -> TurnReply {
    if let Some(error) = body.get("error") {
        let message = serde_json::from_value::<RpcError>(error.clone())
            .ok()
            .and_then(|e| e.message)
            .unwrap_or_else(|| "Unknown error".to_string());
        return TurnReply::Error { message };
    }

    let result: RpcResult = body
        .get("result")
        .and_then(|value| serde_json::from_value(value.clone()).ok())
        .unwrap_or_default();

    let context_id = result
        .context_id
        .unwrap_or_else(|| prior_context_id.to_string());

    match result.status {
        Some(status) => {
            let task_id = result
                .id
                .or_else(|| prior_task_id.map(str::to_string));
            let state = status.state.unwrap_or(TaskState::Completed);
            let text = collect_text(&status.message.unwrap_or_default().parts);
            TurnReply::Task {
                context_id,
                task_id,
                state,
                text: non_empty_or_fallback(text),
            }
        }
        None => TurnReply::Message {
            context_id,
            text: non_empty_or_fallback(collect_text(&result.parts)),
        },
    }
}
