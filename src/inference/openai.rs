//! OpenAI-protocol chat model implementation.
//!
//! Works against the OpenAI API or any OpenAI-compatible gateway fronting
//! another hosted model.

use super::{ChatMessage, ChatModel, ChatRequest, ChatTurn, ToolInvocation};
use crate::error::{Result, TrenaError};
use crate::openai::create_client;
use async_openai::types::{
    ChatCompletionMessageToolCall, ChatCompletionRequestAssistantMessageArgs,
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
    ChatCompletionRequestToolMessageArgs, ChatCompletionRequestUserMessageArgs,
    ChatCompletionTool, ChatCompletionToolType, CreateChatCompletionRequestArgs, FunctionCall,
    FunctionObject,
};
use async_trait::async_trait;
use tracing::{debug, instrument};

/// Chat model backed by an OpenAI-protocol endpoint.
pub struct OpenAiChatModel {
    client: async_openai::Client<async_openai::config::OpenAIConfig>,
}

impl OpenAiChatModel {
    /// Create a new chat model against the default endpoint.
    pub fn new() -> Self {
        Self::with_api_base(None)
    }

    /// Create a new chat model against a specific API base.
    pub fn with_api_base(api_base: Option<&str>) -> Self {
        Self {
            client: create_client(api_base),
        }
    }
}

impl Default for OpenAiChatModel {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChatModel for OpenAiChatModel {
    #[instrument(skip(self, request), fields(model = %request.model))]
    async fn complete(&self, request: ChatRequest) -> Result<ChatTurn> {
        let messages = convert_messages(&request.messages)?;

        let mut builder = CreateChatCompletionRequestArgs::default();
        builder
            .model(&request.model)
            .messages(messages)
            .temperature(request.temperature);

        if !request.tools.is_empty() {
            let tools: Vec<ChatCompletionTool> = request
                .tools
                .iter()
                .map(|t| ChatCompletionTool {
                    r#type: ChatCompletionToolType::Function,
                    function: FunctionObject {
                        name: t.name.clone(),
                        description: Some(t.description.clone()),
                        parameters: Some(t.parameters.clone()),
                        strict: None,
                    },
                })
                .collect();
            builder.tools(tools);
        }

        let api_request = builder
            .build()
            .map_err(|e| TrenaError::Inference(format!("Failed to build request: {}", e)))?;

        let response = self
            .client
            .chat()
            .create(api_request)
            .await
            .map_err(|e| TrenaError::Inference(format!("Chat API error: {}", e)))?;

        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| TrenaError::Inference("No response from model".to_string()))?;

        let tool_calls = choice
            .message
            .tool_calls
            .unwrap_or_default()
            .into_iter()
            .map(|call| ToolInvocation {
                id: call.id,
                name: call.function.name,
                arguments: call.function.arguments,
            })
            .collect::<Vec<_>>();

        debug!(
            "Model turn: {} tool call(s), content: {}",
            tool_calls.len(),
            choice.message.content.is_some()
        );

        Ok(ChatTurn {
            content: choice.message.content,
            tool_calls,
        })
    }
}

/// Convert backend-neutral messages into the OpenAI request format.
fn convert_messages(messages: &[ChatMessage]) -> Result<Vec<ChatCompletionRequestMessage>> {
    let mut converted = Vec::with_capacity(messages.len());

    for message in messages {
        let request_message: ChatCompletionRequestMessage = match message {
            ChatMessage::System { content } => ChatCompletionRequestSystemMessageArgs::default()
                .content(content.clone())
                .build()
                .map_err(|e| TrenaError::Inference(e.to_string()))?
                .into(),
            ChatMessage::User { content } => ChatCompletionRequestUserMessageArgs::default()
                .content(content.clone())
                .build()
                .map_err(|e| TrenaError::Inference(e.to_string()))?
                .into(),
            ChatMessage::Assistant {
                content,
                tool_calls,
            } => {
                let mut builder = ChatCompletionRequestAssistantMessageArgs::default();
                if let Some(text) = content {
                    builder.content(text.clone());
                }
                if !tool_calls.is_empty() {
                    let calls: Vec<ChatCompletionMessageToolCall> = tool_calls
                        .iter()
                        .map(|call| ChatCompletionMessageToolCall {
                            id: call.id.clone(),
                            r#type: ChatCompletionToolType::Function,
                            function: FunctionCall {
                                name: call.name.clone(),
                                arguments: call.arguments.clone(),
                            },
                        })
                        .collect();
                    builder.tool_calls(calls);
                }
                builder
                    .build()
                    .map_err(|e| TrenaError::Inference(e.to_string()))?
                    .into()
            }
            ChatMessage::ToolResult {
                tool_call_id,
                content,
            } => ChatCompletionRequestToolMessageArgs::default()
                .tool_call_id(tool_call_id)
                .content(content.clone())
                .build()
                .map_err(|e| TrenaError::Inference(e.to_string()))?
                .into(),
        };

        converted.push(request_message);
    }

    Ok(converted)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_messages_preserves_order() {
        let messages = vec![
            ChatMessage::system("instruction"),
            ChatMessage::user("hello"),
            ChatMessage::tool_result("call_1", "observation"),
        ];

        let converted = convert_messages(&messages).unwrap();
        assert_eq!(converted.len(), 3);
    }
}
