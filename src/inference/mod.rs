//! Chat-model backend abstraction.
//!
//! Provides a trait-based interface so the agent run loop can be driven by
//! any hosted chat model, and by stubs in tests.

mod openai;

pub use openai::OpenAiChatModel;

use crate::error::Result;
use async_trait::async_trait;
use serde_json::Value;

/// A single message in a chat exchange.
#[derive(Debug, Clone)]
pub enum ChatMessage {
    /// Instruction text governing the exchange.
    System { content: String },
    /// End-user input.
    User { content: String },
    /// Model output, possibly requesting tool invocations.
    Assistant {
        content: Option<String>,
        tool_calls: Vec<ToolInvocation>,
    },
    /// Observation returned for one requested tool invocation.
    ToolResult {
        tool_call_id: String,
        content: String,
    },
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self::System {
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::User {
            content: content.into(),
        }
    }

    pub fn tool_result(tool_call_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self::ToolResult {
            tool_call_id: tool_call_id.into(),
            content: content.into(),
        }
    }
}

/// A tool the model may invoke, described with a JSON schema.
#[derive(Debug, Clone)]
pub struct ToolSpec {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

/// A tool invocation requested by the model.
#[derive(Debug, Clone)]
pub struct ToolInvocation {
    /// Backend-assigned id, echoed back with the observation.
    pub id: String,
    pub name: String,
    /// JSON-encoded arguments.
    pub arguments: String,
}

/// One completed inference step.
#[derive(Debug, Clone)]
pub struct ChatTurn {
    pub content: Option<String>,
    pub tool_calls: Vec<ToolInvocation>,
}

/// A full inference request.
#[derive(Debug, Clone)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub tools: Vec<ToolSpec>,
    pub temperature: f32,
}

/// Trait for chat-model backends.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Run one inference step and return the model's turn.
    async fn complete(&self, request: ChatRequest) -> Result<ChatTurn>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_constructors() {
        match ChatMessage::system("be helpful") {
            ChatMessage::System { content } => assert_eq!(content, "be helpful"),
            _ => panic!("Expected system message"),
        }

        match ChatMessage::tool_result("call_1", "done") {
            ChatMessage::ToolResult {
                tool_call_id,
                content,
            } => {
                assert_eq!(tool_call_id, "call_1");
                assert_eq!(content, "done");
            }
            _ => panic!("Expected tool result message"),
        }
    }
}
