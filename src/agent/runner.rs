//! Agent run loop with tool calling and model-driven delegation.

use super::spec::{AgentRegistry, AgentSpec};
use super::tools::{parse_tool_call, tool_definitions, ToolContext, ToolResult};
use crate::error::{Result, TrenaError};
use crate::inference::{ChatMessage, ChatModel, ChatRequest, ToolInvocation, ToolSpec};
use crate::session::{SessionEvent, SessionStore};
use chrono::Utc;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Name of the synthetic tool that lets the model hand a turn to a declared
/// child agent. Host code never picks the target itself.
pub const DELEGATE_TOOL: &str = "delegate_to_agent";

/// One event emitted during an agent run.
#[derive(Debug, Clone)]
pub struct RunEvent {
    /// Agent that produced the event.
    pub author: String,
    /// Text content of the event.
    pub content: String,
    /// Whether this event is the terminal response for the turn.
    pub final_response: bool,
}

/// Drives a bounded exchange of model inference and tool invocation for one
/// agent tree.
pub struct Runner {
    model: Arc<dyn ChatModel>,
    registry: Arc<AgentRegistry>,
    tools: ToolContext,
    sessions: Arc<dyn SessionStore>,
    default_model: String,
    temperature: f32,
    max_iterations: usize,
}

impl Runner {
    /// Create a new runner.
    pub fn new(
        model: Arc<dyn ChatModel>,
        registry: Arc<AgentRegistry>,
        tools: ToolContext,
        sessions: Arc<dyn SessionStore>,
        default_model: &str,
        temperature: f32,
        max_iterations: usize,
    ) -> Self {
        Self {
            model,
            registry,
            tools,
            sessions,
            default_model: default_model.to_string(),
            temperature,
            max_iterations,
        }
    }

    /// The agent registry this runner serves.
    pub fn registry(&self) -> &AgentRegistry {
        &self.registry
    }

    /// Run the root agent with a user message inside the given session.
    pub async fn run(&self, session_id: Uuid, message: &str) -> Result<Vec<RunEvent>> {
        let root = self.registry.root().name.clone();
        self.run_agent(&root, session_id, message).await
    }

    /// Run a named agent with a user message inside the given session.
    ///
    /// Events come back in emission order. When the iteration bound is hit
    /// before the model produces a final answer, the collected events are
    /// returned without a final event; the caller decides what that means.
    pub async fn run_agent(
        &self,
        agent_name: &str,
        session_id: Uuid,
        message: &str,
    ) -> Result<Vec<RunEvent>> {
        let mut active: AgentSpec = self
            .registry
            .get(agent_name)
            .cloned()
            .ok_or_else(|| TrenaError::UnknownAgent(agent_name.to_string()))?;

        self.record(session_id, "user", message, false).await;

        let mut messages = vec![
            ChatMessage::system(active.instruction.clone()),
            ChatMessage::user(message),
        ];
        let mut events = Vec::new();

        for iteration in 1..=self.max_iterations {
            debug!("Run iteration {} (agent: {})", iteration, active.name);

            let turn = self
                .model
                .complete(ChatRequest {
                    model: self.model_for(&active),
                    messages: messages.clone(),
                    tools: self.tool_specs(&active),
                    temperature: self.temperature,
                })
                .await?;

            if turn.tool_calls.is_empty() {
                let content = turn.content.unwrap_or_default();
                let event = RunEvent {
                    author: active.name.clone(),
                    content: content.clone(),
                    final_response: true,
                };
                self.record(session_id, &active.name, &content, true).await;
                events.push(event);
                return Ok(events);
            }

            messages.push(ChatMessage::Assistant {
                content: turn.content.clone(),
                tool_calls: turn.tool_calls.clone(),
            });

            for call in &turn.tool_calls {
                let observation = if call.name == DELEGATE_TOOL {
                    self.handle_delegation(call, &mut active, &mut messages, &mut events)
                } else {
                    let result = self.invoke_tool(session_id, call).await;
                    events.push(RunEvent {
                        author: active.name.clone(),
                        content: result.message.clone(),
                        final_response: false,
                    });
                    result.to_observation()
                };
                messages.push(ChatMessage::tool_result(call.id.clone(), observation));
            }
        }

        warn!(
            "Agent {} exhausted {} iterations without a final response",
            agent_name, self.max_iterations
        );
        Ok(events)
    }

    /// Execute one tool call, recovering parse failures as error results.
    async fn invoke_tool(&self, session_id: Uuid, call: &ToolInvocation) -> ToolResult {
        info!("Agent calling tool: {} with args: {}", call.name, call.arguments);

        match parse_tool_call(&call.name, &call.arguments) {
            Ok(tool) => self.tools.for_session(session_id).execute(&tool).await,
            Err(e) => ToolResult::error(format!("Failed to parse tool call: {}", e)),
        }
    }

    /// Hand the turn to the child agent the model named, if it was declared.
    fn handle_delegation(
        &self,
        call: &ToolInvocation,
        active: &mut AgentSpec,
        messages: &mut Vec<ChatMessage>,
        events: &mut Vec<RunEvent>,
    ) -> String {
        let target = serde_json::from_str::<Value>(&call.arguments)
            .ok()
            .and_then(|args| args["agent_name"].as_str().map(str::to_string))
            .unwrap_or_default();

        if !active.sub_agents.iter().any(|name| name == &target) {
            return ToolResult::error(format!("Unknown sub-agent: {}", target)).to_observation();
        }

        let child = match self.registry.get(&target) {
            Some(child) => child.clone(),
            None => {
                return ToolResult::error(format!("Unknown sub-agent: {}", target)).to_observation()
            }
        };

        info!("Delegating turn from {} to {}", active.name, child.name);
        events.push(RunEvent {
            author: active.name.clone(),
            content: format!("Delegated to {}", child.name),
            final_response: false,
        });

        // The child's instruction governs the rest of the turn.
        messages[0] = ChatMessage::system(child.instruction.clone());
        *active = child;

        ToolResult::success(format!("Transferred to agent {}", target)).to_observation()
    }

    fn model_for(&self, spec: &AgentSpec) -> String {
        if spec.model.is_empty() {
            self.default_model.clone()
        } else {
            spec.model.clone()
        }
    }

    /// Bound tool specs, plus the delegation tool when children are declared.
    fn tool_specs(&self, spec: &AgentSpec) -> Vec<ToolSpec> {
        let mut specs = tool_definitions(&spec.tools);

        if !spec.sub_agents.is_empty() {
            specs.push(ToolSpec {
                name: DELEGATE_TOOL.to_string(),
                description: "Hand the conversation to a specialized agent. \
                    Use the delegation rules in your instructions to pick one."
                    .to_string(),
                parameters: serde_json::json!({
                    "type": "object",
                    "properties": {
                        "agent_name": {
                            "type": "string",
                            "description": "Name of the agent to delegate to",
                            "enum": spec.sub_agents,
                        }
                    },
                    "required": ["agent_name"]
                }),
            });
        }

        specs
    }

    /// Best-effort session bookkeeping; a failing store never blocks the run.
    async fn record(&self, session_id: Uuid, author: &str, content: &str, final_response: bool) {
        let event = SessionEvent {
            author: author.to_string(),
            content: content.to_string(),
            final_response,
            recorded_at: Utc::now(),
        };
        if let Err(e) = self.sessions.append_event(session_id, event).await {
            warn!("Could not record session event: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::{AgentSpec, ToolName};
    use crate::config::MediaSettings;
    use crate::inference::ChatTurn;
    use crate::media::{MediaGenerator, VideoOperation, VideoRequest};
    use crate::session::MemorySessionStore;
    use crate::storage::MemoryObjectStore;
    use crate::warehouse::MemoryWarehouse;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct StubMedia;

    #[async_trait]
    impl MediaGenerator for StubMedia {
        async fn start_video(&self, _request: &VideoRequest) -> Result<String> {
            Ok("operations/123".to_string())
        }

        async fn poll_video(&self, _operation: &str) -> Result<VideoOperation> {
            Ok(VideoOperation {
                done: true,
                video: Some(b"video".to_vec()),
            })
        }

        async fn generate_image(&self, _prompt: &str) -> Result<Vec<u8>> {
            Ok(b"image".to_vec())
        }
    }

    /// Chat model that replays scripted turns.
    struct ScriptedModel {
        turns: Mutex<Vec<ChatTurn>>,
    }

    impl ScriptedModel {
        fn new(turns: Vec<ChatTurn>) -> Self {
            Self {
                turns: Mutex::new(turns),
            }
        }
    }

    #[async_trait]
    impl ChatModel for ScriptedModel {
        async fn complete(&self, _request: ChatRequest) -> Result<ChatTurn> {
            let mut turns = self.turns.lock().unwrap();
            if turns.is_empty() {
                // Out of script: a tool-free, content-free turn.
                return Ok(ChatTurn {
                    content: None,
                    tool_calls: Vec::new(),
                });
            }
            Ok(turns.remove(0))
        }
    }

    fn final_turn(text: &str) -> ChatTurn {
        ChatTurn {
            content: Some(text.to_string()),
            tool_calls: Vec::new(),
        }
    }

    fn tool_turn(name: &str, arguments: &str) -> ChatTurn {
        ChatTurn {
            content: None,
            tool_calls: vec![ToolInvocation {
                id: "call_1".to_string(),
                name: name.to_string(),
                arguments: arguments.to_string(),
            }],
        }
    }

    fn test_registry() -> AgentRegistry {
        AgentRegistry::new(
            "coach",
            vec![
                AgentSpec::new("coach", "test-model", "You are a coach.")
                    .with_sub_agents(&["data_analyst"]),
                AgentSpec::new("data_analyst", "test-model", "You answer data questions.")
                    .with_tools(&[ToolName::ListUsers]),
            ],
        )
        .unwrap()
    }

    fn test_runner(model: ScriptedModel, max_iterations: usize) -> (Runner, Arc<MemorySessionStore>) {
        let sessions = Arc::new(MemorySessionStore::new());
        let tools = ToolContext::new(
            Arc::new(StubMedia),
            Arc::new(MemoryObjectStore::new()),
            Arc::new(MemoryWarehouse::new()),
            sessions.clone(),
            MediaSettings::default(),
            std::env::temp_dir().join("trena-runner-tests"),
        );
        let runner = Runner::new(
            Arc::new(model),
            Arc::new(test_registry()),
            tools,
            sessions.clone(),
            "test-model",
            0.0,
            max_iterations,
        );
        (runner, sessions)
    }

    #[tokio::test]
    async fn test_direct_answer_is_final_event() {
        let (runner, sessions) = test_runner(ScriptedModel::new(vec![final_turn("hi there")]), 5);
        let session = sessions.create("trena", "a2a_user").await.unwrap();

        let events = runner.run(session.id, "hello").await.unwrap();
        assert_eq!(events.len(), 1);
        assert!(events[0].final_response);
        assert_eq!(events[0].content, "hi there");
        assert_eq!(events[0].author, "coach");
    }

    #[tokio::test]
    async fn test_tool_call_then_answer() {
        let (runner, sessions) = test_runner(
            ScriptedModel::new(vec![
                tool_turn("list_users", "{}"),
                final_turn("Nobody is registered yet."),
            ]),
            5,
        );
        let session = sessions.create("trena", "a2a_user").await.unwrap();

        let events = runner
            .run_agent("data_analyst", session.id, "who is registered?")
            .await
            .unwrap();

        assert_eq!(events.len(), 2);
        assert!(!events[0].final_response);
        assert!(events[1].final_response);
        assert_eq!(events[1].content, "Nobody is registered yet.");
    }

    #[tokio::test]
    async fn test_delegation_switches_agent() {
        let (runner, sessions) = test_runner(
            ScriptedModel::new(vec![
                tool_turn(DELEGATE_TOOL, r#"{"agent_name": "data_analyst"}"#),
                final_turn("Delegated answer."),
            ]),
            5,
        );
        let session = sessions.create("trena", "a2a_user").await.unwrap();

        let events = runner.run(session.id, "ask the analyst").await.unwrap();

        assert_eq!(events.len(), 2);
        assert_eq!(events[0].author, "coach");
        assert!(!events[0].final_response);
        assert_eq!(events[1].author, "data_analyst");
        assert!(events[1].final_response);
    }

    #[tokio::test]
    async fn test_delegation_to_undeclared_agent_is_rejected() {
        let (runner, sessions) = test_runner(
            ScriptedModel::new(vec![
                tool_turn(DELEGATE_TOOL, r#"{"agent_name": "ghost"}"#),
                final_turn("Could not delegate."),
            ]),
            5,
        );
        let session = sessions.create("trena", "a2a_user").await.unwrap();

        let events = runner.run(session.id, "ask a ghost").await.unwrap();
        let last = events.last().unwrap();
        assert_eq!(last.author, "coach");
        assert_eq!(last.content, "Could not delegate.");
    }

    #[tokio::test]
    async fn test_iteration_bound_returns_events_without_final() {
        // Model asks for the same tool forever.
        let (runner, sessions) = test_runner(
            ScriptedModel::new(vec![
                tool_turn("list_users", "{}"),
                tool_turn("list_users", "{}"),
                tool_turn("list_users", "{}"),
            ]),
            2,
        );
        let session = sessions.create("trena", "a2a_user").await.unwrap();

        let events = runner
            .run_agent("data_analyst", session.id, "loop forever")
            .await
            .unwrap();

        assert_eq!(events.len(), 2);
        assert!(events.iter().all(|e| !e.final_response));
    }

    #[tokio::test]
    async fn test_unknown_agent_is_an_error() {
        let (runner, sessions) = test_runner(ScriptedModel::new(vec![]), 5);
        let session = sessions.create("trena", "a2a_user").await.unwrap();
        let result = runner.run_agent("ghost", session.id, "hello").await;
        assert!(matches!(result, Err(TrenaError::UnknownAgent(_))));
    }
}
