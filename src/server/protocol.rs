//! A2A protocol types (JSON-RPC 2.0 style envelopes).

use crate::agent::AgentRegistry;
use crate::config::Settings;
use crate::error::{Result, TrenaError};
use serde::{Deserialize, Serialize};

/// Task state reported for every successfully processed task.
pub const STATE_COMPLETED: &str = "completed";

/// Fallback task id when the request does not carry one.
pub const UNKNOWN_TASK_ID: &str = "unknown";

/// Discovery document served at `/.well-known/agent.json`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentCard {
    pub name: String,
    pub display_name: String,
    pub description: String,
    pub version: String,
    pub endpoint_url: String,
    pub authentication: Authentication,
    pub capabilities: Vec<String>,
    pub skills: Vec<Skill>,
}

impl AgentCard {
    /// Build the card for a registry's root agent.
    ///
    /// Skills are derived from the root's declared children, one per
    /// specialist, with plain-text input and output fields.
    pub fn for_registry(settings: &Settings, registry: &AgentRegistry) -> Result<Self> {
        let endpoint_url = settings.endpoint_url();
        url::Url::parse(&endpoint_url)
            .map_err(|e| TrenaError::Config(format!("Invalid endpoint URL {}: {}", endpoint_url, e)))?;

        let root = registry.root();
        let skills = root
            .sub_agents
            .iter()
            .filter_map(|name| registry.get(name))
            .map(|child| Skill {
                name: child.name.clone(),
                description: child.description.clone(),
                inputs: vec![SkillField {
                    name: "message".to_string(),
                    kind: "string".to_string(),
                    description: "User request in plain text".to_string(),
                }],
                outputs: vec![SkillField {
                    name: "response".to_string(),
                    kind: "string".to_string(),
                    description: "The agent's final response".to_string(),
                }],
            })
            .collect();

        Ok(Self {
            name: "Trena Wellness Coach".to_string(),
            display_name: "Trena Wellness Coach".to_string(),
            description: root.description.clone(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            endpoint_url,
            authentication: Authentication::none(),
            // The streaming flag is advertised for protocol peers even though
            // /tasks/send answers synchronously.
            capabilities: vec!["streaming".to_string()],
            skills,
        })
    }
}

/// Authentication descriptor. This layer performs none.
#[derive(Debug, Clone, Serialize)]
pub struct Authentication {
    #[serde(rename = "type")]
    pub kind: String,
}

impl Authentication {
    pub fn none() -> Self {
        Self {
            kind: "none".to_string(),
        }
    }
}

/// One advertised skill with typed inputs and outputs.
#[derive(Debug, Clone, Serialize)]
pub struct Skill {
    pub name: String,
    pub description: String,
    pub inputs: Vec<SkillField>,
    pub outputs: Vec<SkillField>,
}

/// A typed field in a skill manifest.
#[derive(Debug, Clone, Serialize)]
pub struct SkillField {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub description: String,
}

/// Inbound task submission envelope.
#[derive(Debug, Default, Deserialize)]
pub struct TaskRequest {
    #[serde(default)]
    pub params: TaskParams,
}

#[derive(Debug, Default, Deserialize)]
pub struct TaskParams {
    #[serde(default, rename = "taskId")]
    pub task_id: Option<String>,
    #[serde(default)]
    pub message: Option<TaskMessage>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TaskMessage {
    #[serde(default)]
    pub parts: Vec<MessagePart>,
}

/// One text part of a message.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct MessagePart {
    #[serde(default)]
    pub text: String,
}

impl TaskRequest {
    /// The task id, or the fixed fallback when absent.
    pub fn task_id(&self) -> String {
        self.params
            .task_id
            .clone()
            .unwrap_or_else(|| UNKNOWN_TASK_ID.to_string())
    }

    /// The first message part's text; empty when absent.
    pub fn message_text(&self) -> String {
        self.params
            .message
            .as_ref()
            .and_then(|message| message.parts.first())
            .map(|part| part.text.clone())
            .unwrap_or_default()
    }
}

/// Outbound task response envelope.
#[derive(Debug, Serialize)]
pub struct TaskResponse {
    pub jsonrpc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<TaskResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<TaskError>,
}

#[derive(Debug, Serialize)]
pub struct TaskResult {
    #[serde(rename = "taskId")]
    pub task_id: String,
    pub state: String,
    pub messages: Vec<AgentMessage>,
}

#[derive(Debug, Serialize)]
pub struct AgentMessage {
    pub role: String,
    pub parts: Vec<MessagePart>,
}

#[derive(Debug, Serialize)]
pub struct TaskError {
    pub code: i32,
    pub message: String,
}

impl TaskResponse {
    /// Success envelope carrying the agent's answer.
    pub fn completed(task_id: &str, answer: &str) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            result: Some(TaskResult {
                task_id: task_id.to_string(),
                state: STATE_COMPLETED.to_string(),
                messages: vec![AgentMessage {
                    role: "agent".to_string(),
                    parts: vec![MessagePart {
                        text: answer.to_string(),
                    }],
                }],
            }),
            error: None,
        }
    }

    /// Error envelope. The transport call still completes normally; callers
    /// detect failure by inspecting the `error` key.
    pub fn failure(message: &str) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            result: None,
            error: Some(TaskError {
                code: -1,
                message: message.to_string(),
            }),
        }
    }
}
