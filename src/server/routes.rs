//! HTTP routes and handlers for the task dispatch server.

use super::protocol::{TaskRequest, TaskResponse};
use crate::agent::Runner;
use crate::error::{Result, TrenaError};
use crate::session::SessionStore;
use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info};

/// Synthetic identity for sessions created by the protocol layer; no
/// authentication happens here.
pub const A2A_USER_ID: &str = "a2a_user";

/// Shared application state.
pub struct AppState {
    pub runner: Runner,
    pub sessions: Arc<dyn SessionStore>,
    pub app_name: String,
    pub run_timeout: Duration,
    /// Discovery document, serialized once so every call returns identical
    /// bytes.
    pub card_json: String,
}

/// Build the router for the task dispatch server.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/.well-known/agent.json", get(agent_card))
        .route("/health", get(health))
        .route("/tasks/send", post(send_task))
        .layer(cors)
        .with_state(state)
}

// === Handlers ===

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

/// Serve the static discovery document. No side effects.
async fn agent_card(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/json")],
        state.card_json.clone(),
    )
}

/// Submit one task and answer synchronously with the agent's final response.
///
/// Failures are reported in-band through the JSON-RPC error envelope; the
/// transport call itself completes normally either way.
async fn send_task(
    State(state): State<Arc<AppState>>,
    Json(request): Json<TaskRequest>,
) -> Json<TaskResponse> {
    let task_id = request.task_id();
    let text = request.message_text();

    info!("Task {} received ({} chars)", task_id, text.len());

    match run_task(&state, &text).await {
        Ok(answer) => Json(TaskResponse::completed(&task_id, &answer)),
        Err(e) => {
            error!("Task {} failed: {}", task_id, e);
            Json(TaskResponse::failure(&format!("Task failed: {}", e)))
        }
    }
}

/// Run one task to completion inside a fresh session.
///
/// Events are consumed in emission order; the first final event with
/// non-empty content wins. A run that ends without one answers with empty
/// text.
async fn run_task(state: &AppState, text: &str) -> Result<String> {
    let session = state.sessions.create(&state.app_name, A2A_USER_ID).await?;

    let events = tokio::time::timeout(state.run_timeout, state.runner.run(session.id, text))
        .await
        .map_err(|_| {
            TrenaError::Agent(format!(
                "Run exceeded the {}s budget",
                state.run_timeout.as_secs()
            ))
        })??;

    let answer = events
        .iter()
        .find(|event| event.final_response && !event.content.is_empty())
        .map(|event| event.content.clone())
        .unwrap_or_default();

    Ok(answer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::wellness_registry;
    use crate::config::Settings;
    use crate::error::Result;
    use crate::inference::{ChatMessage, ChatModel, ChatRequest, ChatTurn};
    use crate::server::{build_runner, AgentCard};
    use async_trait::async_trait;
    use serde_json::json;

    /// Model that immediately answers with fixed text.
    struct FixedModel {
        answer: Option<String>,
    }

    #[async_trait]
    impl ChatModel for FixedModel {
        async fn complete(&self, _request: ChatRequest) -> Result<ChatTurn> {
            Ok(ChatTurn {
                content: self.answer.clone(),
                tool_calls: Vec::new(),
            })
        }
    }

    /// Model that answers with the user's own message.
    struct EchoModel;

    #[async_trait]
    impl ChatModel for EchoModel {
        async fn complete(&self, request: ChatRequest) -> Result<ChatTurn> {
            let last_user = request
                .messages
                .iter()
                .rev()
                .find_map(|message| match message {
                    ChatMessage::User { content } => Some(content.clone()),
                    _ => None,
                })
                .unwrap_or_default();
            Ok(ChatTurn {
                content: Some(format!("echo: {}", last_user)),
                tool_calls: Vec::new(),
            })
        }
    }

    /// Model that always fails.
    struct FailingModel;

    #[async_trait]
    impl ChatModel for FailingModel {
        async fn complete(&self, _request: ChatRequest) -> Result<ChatTurn> {
            Err(TrenaError::Inference("backend unavailable".to_string()))
        }
    }

    fn test_state(model: Arc<dyn ChatModel>) -> Arc<AppState> {
        let mut settings = Settings::default();
        settings.storage.provider = "memory".to_string();
        settings.warehouse.provider = "memory".to_string();

        let registry = Arc::new(wellness_registry(&settings));
        let (runner, sessions) = build_runner(&settings, registry.clone(), model);
        let card = AgentCard::for_registry(&settings, &registry).unwrap();

        Arc::new(AppState {
            runner,
            sessions,
            app_name: settings.server.app_name.clone(),
            run_timeout: Duration::from_secs(5),
            card_json: serde_json::to_string(&card).unwrap(),
        })
    }

    fn request(body: serde_json::Value) -> TaskRequest {
        serde_json::from_value(body).unwrap()
    }

    #[tokio::test]
    async fn test_discovery_is_idempotent_and_static() {
        let state = test_state(Arc::new(FixedModel { answer: None }));

        let first = agent_card(State(state.clone())).await.into_response();
        let second = agent_card(State(state.clone())).await.into_response();

        let first = axum::body::to_bytes(first.into_body(), usize::MAX).await.unwrap();
        let second = axum::body::to_bytes(second.into_body(), usize::MAX).await.unwrap();
        assert_eq!(first, second);

        let card: serde_json::Value = serde_json::from_slice(&first).unwrap();
        assert_eq!(card["authentication"]["type"], "none");
        assert_eq!(card["capabilities"], json!(["streaming"]));
        assert!(!card["skills"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_submit_task_success_envelope() {
        let state = test_state(Arc::new(FixedModel {
            answer: Some("hi there".to_string()),
        }));

        let response = send_task(
            State(state),
            Json(request(json!({
                "params": {
                    "taskId": "t1",
                    "message": { "parts": [{ "text": "hello" }] }
                }
            }))),
        )
        .await;

        assert_eq!(
            serde_json::to_value(&response.0).unwrap(),
            json!({
                "jsonrpc": "2.0",
                "result": {
                    "taskId": "t1",
                    "state": "completed",
                    "messages": [
                        { "role": "agent", "parts": [{ "text": "hi there" }] }
                    ]
                }
            })
        );
    }

    #[tokio::test]
    async fn test_missing_task_id_falls_back_to_unknown() {
        let state = test_state(Arc::new(FixedModel {
            answer: Some("ok".to_string()),
        }));

        let response = send_task(
            State(state),
            Json(request(json!({
                "params": { "message": { "parts": [{ "text": "hello" }] } }
            }))),
        )
        .await;

        let value = serde_json::to_value(&response.0).unwrap();
        assert_eq!(value["result"]["taskId"], "unknown");
    }

    #[tokio::test]
    async fn test_empty_message_still_completes() {
        let state = test_state(Arc::new(FixedModel {
            answer: Some("ok".to_string()),
        }));

        let response = send_task(State(state), Json(request(json!({})))).await;

        let value = serde_json::to_value(&response.0).unwrap();
        assert_eq!(value["result"]["state"], "completed");
        assert!(value.get("error").is_none());
    }

    #[tokio::test]
    async fn test_run_without_qualifying_final_event_answers_empty() {
        // A final turn with no content: final_response is set but the text
        // is empty, so it never qualifies as the answer.
        let state = test_state(Arc::new(FixedModel { answer: None }));

        let response = send_task(
            State(state),
            Json(request(json!({
                "params": {
                    "taskId": "t2",
                    "message": { "parts": [{ "text": "hello" }] }
                }
            }))),
        )
        .await;

        let value = serde_json::to_value(&response.0).unwrap();
        assert_eq!(value["result"]["taskId"], "t2");
        assert_eq!(value["result"]["state"], "completed");
        assert_eq!(value["result"]["messages"][0]["parts"][0]["text"], "");
    }

    #[tokio::test]
    async fn test_processing_error_becomes_error_envelope() {
        let state = test_state(Arc::new(FailingModel));

        let response = send_task(
            State(state),
            Json(request(json!({
                "params": {
                    "taskId": "t3",
                    "message": { "parts": [{ "text": "hello" }] }
                }
            }))),
        )
        .await;

        let value = serde_json::to_value(&response.0).unwrap();
        assert!(value.get("result").is_none());
        assert_eq!(value["error"]["code"], -1);
        assert!(value["error"]["message"]
            .as_str()
            .unwrap()
            .starts_with("Task failed:"));
    }

    #[tokio::test]
    async fn test_concurrent_tasks_keep_their_ids_and_answers() {
        let state = test_state(Arc::new(EchoModel));

        let first = send_task(
            State(state.clone()),
            Json(request(json!({
                "params": {
                    "taskId": "task-a",
                    "message": { "parts": [{ "text": "alpha" }] }
                }
            }))),
        );
        let second = send_task(
            State(state.clone()),
            Json(request(json!({
                "params": {
                    "taskId": "task-b",
                    "message": { "parts": [{ "text": "beta" }] }
                }
            }))),
        );

        let (first, second) = tokio::join!(first, second);

        let first = serde_json::to_value(&first.0).unwrap();
        let second = serde_json::to_value(&second.0).unwrap();

        assert_eq!(first["result"]["taskId"], "task-a");
        assert_eq!(
            first["result"]["messages"][0]["parts"][0]["text"],
            "echo: alpha"
        );
        assert_eq!(second["result"]["taskId"], "task-b");
        assert_eq!(
            second["result"]["messages"][0]["parts"][0]["text"],
            "echo: beta"
        );

        // One fresh session per task.
        assert_eq!(state.sessions.count().await.unwrap(), 2);
    }
}
