//! A2A task dispatch server.
//!
//! Translates inbound task submissions into agent runs and run output into a
//! minimal JSON-RPC style response envelope. One session per task; no state
//! survives a restart.

mod protocol;
mod routes;

pub use protocol::{
    AgentCard, AgentMessage, Authentication, MessagePart, Skill, SkillField, TaskError,
    TaskRequest, TaskResponse, TaskResult, STATE_COMPLETED, UNKNOWN_TASK_ID,
};
pub use routes::{AppState, A2A_USER_ID};

use crate::agent::{AgentRegistry, Runner, ToolContext};
use crate::cli::Output;
use crate::config::Settings;
use crate::error::Result;
use crate::inference::{ChatModel, OpenAiChatModel};
use crate::media::GenAiMediaGenerator;
use crate::session::{MemorySessionStore, SessionStore};
use crate::storage::{GcsObjectStore, MemoryObjectStore, ObjectStore};
use crate::warehouse::{BigQueryWarehouse, MemoryWarehouse, Warehouse};
use axum::Router;
use std::sync::Arc;
use std::time::Duration;

/// Wire a runner and session store from settings.
///
/// All backends are constructed here, once, and passed by reference; there
/// are no module-level singletons.
pub fn build_runner(
    settings: &Settings,
    registry: Arc<AgentRegistry>,
    model: Arc<dyn ChatModel>,
) -> (Runner, Arc<dyn SessionStore>) {
    let media = Arc::new(GenAiMediaGenerator::new(
        &settings.media.api_base,
        &settings.media.video_model,
        &settings.media.image_model,
    ));

    let storage: Arc<dyn ObjectStore> = match settings.storage.provider.as_str() {
        "memory" => Arc::new(MemoryObjectStore::new()),
        _ => Arc::new(GcsObjectStore::new(&settings.storage.bucket)),
    };

    let warehouse: Arc<dyn Warehouse> = match settings.warehouse.provider.as_str() {
        "memory" => Arc::new(MemoryWarehouse::new()),
        _ => Arc::new(BigQueryWarehouse::new(
            &settings.warehouse.project,
            &settings.warehouse.dataset,
            &settings.warehouse.table,
        )),
    };

    let sessions: Arc<dyn SessionStore> = Arc::new(MemorySessionStore::new());

    let tools = ToolContext::new(
        media,
        storage,
        warehouse,
        sessions.clone(),
        settings.media.clone(),
        settings.data_dir(),
    );

    let runner = Runner::new(
        model,
        registry,
        tools,
        sessions.clone(),
        &settings.model.default_model,
        settings.model.temperature,
        settings.agents.max_iterations,
    );

    (runner, sessions)
}

/// The task dispatch server.
pub struct TaskServer {
    settings: Settings,
    state: Arc<AppState>,
}

impl TaskServer {
    /// Build a server with real backends from settings.
    pub fn from_settings(settings: Settings, registry: Arc<AgentRegistry>) -> Result<Self> {
        let model = Arc::new(OpenAiChatModel::with_api_base(
            settings.model.api_base.as_deref(),
        ));
        let (runner, sessions) = build_runner(&settings, registry, model);
        Self::with_runner(settings, runner, sessions)
    }

    /// Build a server around an existing runner (used for injecting fakes).
    pub fn with_runner(
        settings: Settings,
        runner: Runner,
        sessions: Arc<dyn SessionStore>,
    ) -> Result<Self> {
        let card = AgentCard::for_registry(&settings, runner.registry())?;
        let card_json = serde_json::to_string(&card)?;

        let state = Arc::new(AppState {
            runner,
            sessions,
            app_name: settings.server.app_name.clone(),
            run_timeout: Duration::from_secs(settings.server.run_timeout_seconds),
            card_json,
        });

        Ok(Self { settings, state })
    }

    /// The axum router for this server.
    pub fn router(&self) -> Router {
        routes::router(self.state.clone())
    }

    /// Bind and serve until the process is stopped.
    pub async fn run(self) -> Result<()> {
        let addr = format!(
            "{}:{}",
            self.settings.server.host, self.settings.server.port
        );
        let listener = tokio::net::TcpListener::bind(&addr).await?;

        Output::header("Trena A2A Server");
        println!();
        Output::success(&format!("Listening on http://{}", addr));
        println!();
        println!("Endpoints:");
        Output::kv("Discovery", "GET  /.well-known/agent.json");
        Output::kv("Health", "GET  /health");
        Output::kv("Submit Task", "POST /tasks/send");
        println!();
        Output::info("Press Ctrl+C to stop the server.");

        axum::serve(listener, self.router()).await?;

        Ok(())
    }
}
