//! Tool definitions and implementations for the agent system.
//!
//! Every tool is an adapter around one external side-effecting operation and
//! returns a uniform [`ToolResult`]. Failures are recovered here and surfaced
//! to the model as structured error payloads; they never abort a run.

use crate::config::MediaSettings;
use crate::error::{Result, TrenaError};
use crate::inference::ToolSpec;
use crate::media::{MediaGenerator, VideoRequest};
use crate::session::{ArtifactRef, SessionStore};
use crate::storage::{ObjectStore, StoredObject};
use crate::warehouse::{is_valid_email, FitnessRecord, Warehouse};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Available tools for the agents.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "name", rename_all = "snake_case")]
pub enum ToolCall {
    /// Generate a workout video from a text prompt.
    GenerateWorkoutVideo {
        prompt: String,
        #[serde(default)]
        aspect_ratio: String,
        #[serde(default)]
        negative_prompt: String,
    },

    /// Generate a motivational progress image.
    GenerateProgressImage {
        description: String,
        #[serde(default = "default_visual_style")]
        visual_style: String,
    },

    /// Generate a diet-plan infographic from a user's stored data.
    GenerateDietImage {
        email: String,
        #[serde(default = "default_meal_type")]
        meal_type: String,
    },

    /// Fetch a user's most recent fitness record.
    GetFitnessData { email: String },

    /// List registered user emails.
    ListUsers,

    /// Register a new user record.
    RegisterUser {
        email: String,
        name: String,
        age: u32,
        weight: f64,
        target_weight: f64,
        height: f64,
        goal: String,
        #[serde(default = "default_restrictions")]
        dietary_restrictions: String,
        #[serde(default = "default_activity_level")]
        activity_level: String,
        #[serde(default = "default_exercise_frequency")]
        exercise_frequency: u32,
    },
}

fn default_visual_style() -> String {
    "motivational poster".to_string()
}

fn default_meal_type() -> String {
    "full day meal plan".to_string()
}

fn default_restrictions() -> String {
    "none".to_string()
}

fn default_activity_level() -> String {
    "moderate".to_string()
}

fn default_exercise_frequency() -> u32 {
    3
}

/// Outcome of a tool invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolStatus {
    Success,
    Error,
}

/// Uniform result record produced by every tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResult {
    pub status: ToolStatus,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl ToolResult {
    /// Successful result with a message.
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            status: ToolStatus::Success,
            message: message.into(),
            filename: None,
            uri: None,
            public_url: None,
            data: None,
        }
    }

    /// Error result with a message.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: ToolStatus::Error,
            message: message.into(),
            filename: None,
            uri: None,
            public_url: None,
            data: None,
        }
    }

    /// Attach the generated artifact's filename.
    pub fn with_filename(mut self, filename: &str) -> Self {
        self.filename = Some(filename.to_string());
        self
    }

    /// Attach storage locations.
    pub fn with_storage(mut self, stored: &StoredObject) -> Self {
        self.uri = Some(stored.uri.clone());
        self.public_url = stored.public_url.clone();
        self
    }

    /// Attach a structured data payload.
    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    /// Whether the invocation succeeded.
    pub fn is_success(&self) -> bool {
        self.status == ToolStatus::Success
    }

    /// Render the result as an observation for the model.
    pub fn to_observation(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| self.message.clone())
    }
}

/// Timestamp-derived artifact name, unique per invocation.
fn artifact_name(prefix: &str, extension: &str) -> String {
    format!(
        "{}_{}.{}",
        prefix,
        Utc::now().format("%Y%m%d_%H%M%S%3f"),
        extension
    )
}

/// Tool execution context with access to the injected backends.
#[derive(Clone)]
pub struct ToolContext {
    media: Arc<dyn MediaGenerator>,
    storage: Arc<dyn ObjectStore>,
    warehouse: Arc<dyn Warehouse>,
    sessions: Arc<dyn SessionStore>,
    media_settings: MediaSettings,
    data_dir: PathBuf,
    session_id: Option<Uuid>,
}

impl ToolContext {
    /// Create a new tool context.
    pub fn new(
        media: Arc<dyn MediaGenerator>,
        storage: Arc<dyn ObjectStore>,
        warehouse: Arc<dyn Warehouse>,
        sessions: Arc<dyn SessionStore>,
        media_settings: MediaSettings,
        data_dir: PathBuf,
    ) -> Self {
        Self {
            media,
            storage,
            warehouse,
            sessions,
            media_settings,
            data_dir,
            session_id: None,
        }
    }

    /// Scope the context to a session so artifacts are recorded on it.
    pub fn for_session(&self, session_id: Uuid) -> Self {
        let mut ctx = self.clone();
        ctx.session_id = Some(session_id);
        ctx
    }

    /// Execute a tool call. Infrastructure failures come back as error
    /// results, never as panics or propagated errors.
    pub async fn execute(&self, tool: &ToolCall) -> ToolResult {
        match tool {
            ToolCall::GenerateWorkoutVideo {
                prompt,
                aspect_ratio,
                negative_prompt,
            } => {
                self.execute_generate_workout_video(prompt, aspect_ratio, negative_prompt)
                    .await
            }
            ToolCall::GenerateProgressImage {
                description,
                visual_style,
            } => {
                self.execute_generate_progress_image(description, visual_style)
                    .await
            }
            ToolCall::GenerateDietImage { email, meal_type } => {
                self.execute_generate_diet_image(email, meal_type).await
            }
            ToolCall::GetFitnessData { email } => self.execute_get_fitness_data(email).await,
            ToolCall::ListUsers => self.execute_list_users().await,
            ToolCall::RegisterUser {
                email,
                name,
                age,
                weight,
                target_weight,
                height,
                goal,
                dietary_restrictions,
                activity_level,
                exercise_frequency,
            } => {
                self.execute_register_user(
                    email,
                    name,
                    *age,
                    *weight,
                    *target_weight,
                    *height,
                    goal,
                    dietary_restrictions,
                    activity_level,
                    *exercise_frequency,
                )
                .await
            }
        }
    }

    async fn execute_generate_workout_video(
        &self,
        prompt: &str,
        aspect_ratio: &str,
        negative_prompt: &str,
    ) -> ToolResult {
        let aspect_ratio = if aspect_ratio.is_empty() {
            self.media_settings.aspect_ratio.clone()
        } else {
            aspect_ratio.to_string()
        };

        let request = VideoRequest {
            prompt: prompt.to_string(),
            aspect_ratio,
            negative_prompt: if negative_prompt.is_empty() {
                None
            } else {
                Some(negative_prompt.to_string())
            },
        };

        info!("Starting video generation");

        let operation = match self.media.start_video(&request).await {
            Ok(op) => op,
            Err(e) => return ToolResult::error(format!("Video generation failed: {}", e)),
        };

        let interval = Duration::from_secs(self.media_settings.poll_interval_seconds);
        let max_attempts = self.media_settings.max_poll_attempts;
        let mut completed = None;

        for attempt in 1..=max_attempts {
            tokio::time::sleep(interval).await;

            match self.media.poll_video(&operation).await {
                Ok(op) if op.done => {
                    completed = Some(op);
                    break;
                }
                Ok(_) => debug!("Video still generating (poll {}/{})", attempt, max_attempts),
                Err(e) => return ToolResult::error(format!("Video generation failed: {}", e)),
            }
        }

        let operation = match completed {
            Some(op) => op,
            None => {
                return ToolResult::error(format!(
                    "Video generation did not complete within {} polls",
                    max_attempts
                ))
            }
        };

        let bytes = match operation.video {
            Some(bytes) => bytes,
            None => return ToolResult::error("Video generation failed - no video was produced"),
        };

        let filename = artifact_name("workout_video", "mp4");
        let stored = self.persist_artifact(&filename, &bytes, "video/mp4").await;

        let mut message = format!("Video generated successfully! Saved as {}", filename);
        if let Some(stored) = &stored {
            message.push_str(&format!(" and uploaded to {}", stored.uri));
        }

        let mut result = ToolResult::success(message).with_filename(&filename);
        if let Some(stored) = &stored {
            result = result.with_storage(stored);
        }
        result
    }

    async fn execute_generate_progress_image(
        &self,
        description: &str,
        visual_style: &str,
    ) -> ToolResult {
        let prompt = format!(
            "Create a funny and innovative {} about gym progress: {}\n\n\
             Make it:\n\
             - Humorous and motivational\n\
             - Visually engaging with bright colors\n\
             - Include some witty text or quotes about fitness\n\
             - Show progression or achievement in a creative way\n\n\
             Style: Modern, colorful, and energetic with a touch of humor",
            visual_style, description
        );

        info!("Generating progress image");

        let bytes = match self.media.generate_image(&prompt).await {
            Ok(bytes) => bytes,
            Err(e) => return ToolResult::error(format!("Image generation failed: {}", e)),
        };

        let filename = artifact_name("gym_progress", "png");
        let stored = self.persist_artifact(&filename, &bytes, "image/png").await;

        let mut message = format!("Progress image created! Saved as {}", filename);
        if let Some(stored) = &stored {
            message.push_str(&format!(" and uploaded to {}", stored.uri));
        }

        let mut result = ToolResult::success(message).with_filename(&filename);
        if let Some(stored) = &stored {
            result = result.with_storage(stored);
        }
        result
    }

    async fn execute_generate_diet_image(&self, email: &str, meal_type: &str) -> ToolResult {
        if !is_valid_email(email) {
            return ToolResult::error(format!("Invalid email address: {}", email));
        }

        let record = match self.warehouse.latest_record(email).await {
            Ok(Some(record)) => record,
            Ok(None) => return ToolResult::error(format!("No data found for {}", email)),
            Err(e) => return ToolResult::error(format!("Failed to fetch data: {}", e)),
        };

        let prompt = format!(
            "Create a beautiful, appetizing {} infographic for {}:\n\n\
             Goal: {}\n\
             Weight: {}kg -> {}kg\n\
             Activity: {}\n\
             Restrictions: {}\n\n\
             Make it:\n\
             - Visually appealing with food photos\n\
             - Include calorie counts and macros\n\
             - Show breakfast, lunch, dinner, snacks\n\
             - Professional nutrition infographic style",
            meal_type,
            record.name,
            record.goal,
            record.weight,
            record.target_weight,
            record.activity_level,
            record.dietary_restrictions
        );

        info!("Generating diet plan image for {}", email);

        let bytes = match self.media.generate_image(&prompt).await {
            Ok(bytes) => bytes,
            Err(e) => return ToolResult::error(format!("Image generation failed: {}", e)),
        };

        let filename = artifact_name("diet_plan", "png");
        let stored = self.persist_artifact(&filename, &bytes, "image/png").await;

        let mut message = format!("Diet plan image created for {}!", record.name);
        if let Some(stored) = &stored {
            message.push_str(&format!(" Uploaded to {}", stored.uri));
        }

        let mut result = ToolResult::success(message)
            .with_filename(&filename)
            .with_data(serde_json::json!({ "user_goal": record.goal }));
        if let Some(stored) = &stored {
            result = result.with_storage(stored);
        }
        result
    }

    async fn execute_get_fitness_data(&self, email: &str) -> ToolResult {
        if !is_valid_email(email) {
            return ToolResult::error(format!("Invalid email address: {}", email));
        }

        match self.warehouse.latest_record(email).await {
            Ok(Some(record)) => match serde_json::to_value(&record) {
                Ok(data) => {
                    ToolResult::success(format!("Fetched latest fitness record for {}", record.name))
                        .with_data(data)
                }
                Err(e) => ToolResult::error(format!("Failed to fetch data: {}", e)),
            },
            Ok(None) => ToolResult::error(format!("No data found for {}", email)),
            Err(e) => ToolResult::error(format!("Failed to fetch data: {}", e)),
        }
    }

    async fn execute_list_users(&self) -> ToolResult {
        match self.warehouse.list_users().await {
            Ok(users) => ToolResult::success(format!("Found {} registered user(s)", users.len()))
                .with_data(serde_json::json!(users)),
            Err(e) => ToolResult::error(format!("Failed to list users: {}", e)),
        }
    }

    async fn execute_register_user(
        &self,
        email: &str,
        name: &str,
        age: u32,
        weight: f64,
        target_weight: f64,
        height: f64,
        goal: &str,
        dietary_restrictions: &str,
        activity_level: &str,
        exercise_frequency: u32,
    ) -> ToolResult {
        if !is_valid_email(email) {
            return ToolResult::error(format!("Invalid email address: {}", email));
        }

        let bmi = if height > 0.0 {
            let meters = height / 100.0;
            ((weight / (meters * meters)) * 10.0).round() / 10.0
        } else {
            0.0
        };

        let record = FitnessRecord {
            email: email.to_string(),
            name: name.to_string(),
            age,
            weight,
            target_weight,
            height,
            goal: goal.to_string(),
            dietary_restrictions: dietary_restrictions.to_string(),
            activity_level: activity_level.to_string(),
            exercise_frequency,
            bmi,
            date: Utc::now().date_naive(),
        };

        match self.warehouse.register_user(&record).await {
            Ok(()) => ToolResult::success(format!("Registered {} ({})", name, email))
                .with_data(serde_json::json!({ "email": email, "bmi": bmi })),
            Err(e) => ToolResult::error(format!("Registration failed: {}", e)),
        }
    }

    /// Best-effort persistence of a generated artifact: local file, object
    /// storage upload, and session artifact record are each independently
    /// guarded so one failure never blocks the others.
    async fn persist_artifact(
        &self,
        filename: &str,
        bytes: &[u8],
        content_type: &str,
    ) -> Option<StoredObject> {
        if let Err(e) = std::fs::create_dir_all(&self.data_dir)
            .and_then(|_| std::fs::write(self.data_dir.join(filename), bytes))
        {
            warn!("Could not save {} locally: {}", filename, e);
        }

        let stored = match self.storage.put(filename, bytes, content_type).await {
            Ok(stored) => Some(stored),
            Err(e) => {
                warn!("Could not upload {}: {}", filename, e);
                None
            }
        };

        if let Some(session_id) = self.session_id {
            let artifact = ArtifactRef {
                filename: filename.to_string(),
                uri: stored.as_ref().map(|s| s.uri.clone()),
                recorded_at: Utc::now(),
            };
            if let Err(e) = self.sessions.add_artifact(session_id, artifact).await {
                warn!("Could not record artifact {} on session: {}", filename, e);
            }
        }

        stored
    }
}

/// Chat tool specs for an agent's bound tool set.
pub fn tool_definitions(tools: &[crate::agent::ToolName]) -> Vec<ToolSpec> {
    use crate::agent::ToolName;

    tools
        .iter()
        .map(|tool| match tool {
            ToolName::GenerateWorkoutVideo => ToolSpec {
                name: "generate_workout_video".to_string(),
                description: "Generate a short workout video from a text prompt. \
                    Use this when the user asks for a video or visual workout content."
                    .to_string(),
                parameters: serde_json::json!({
                    "type": "object",
                    "properties": {
                        "prompt": {
                            "type": "string",
                            "description": "Text description of the video to generate"
                        },
                        "aspect_ratio": {
                            "type": "string",
                            "description": "Video aspect ratio, 16:9 or 9:16",
                            "enum": ["16:9", "9:16"]
                        },
                        "negative_prompt": {
                            "type": "string",
                            "description": "What NOT to include in the video"
                        }
                    },
                    "required": ["prompt"]
                }),
            },
            ToolName::GenerateProgressImage => ToolSpec {
                name: "generate_progress_image".to_string(),
                description: "Generate a motivational image about the user's gym progress."
                    .to_string(),
                parameters: serde_json::json!({
                    "type": "object",
                    "properties": {
                        "description": {
                            "type": "string",
                            "description": "Description of the progress to visualize"
                        },
                        "visual_style": {
                            "type": "string",
                            "description": "Image style (e.g. motivational poster, cartoon, infographic)"
                        }
                    },
                    "required": ["description"]
                }),
            },
            ToolName::GenerateDietImage => ToolSpec {
                name: "generate_diet_image".to_string(),
                description: "Generate a diet-plan infographic from the user's stored data. \
                    Requires the user's registered email."
                    .to_string(),
                parameters: serde_json::json!({
                    "type": "object",
                    "properties": {
                        "email": {
                            "type": "string",
                            "description": "Registered user email"
                        },
                        "meal_type": {
                            "type": "string",
                            "description": "Type of meal plan to visualize (default: full day meal plan)"
                        }
                    },
                    "required": ["email"]
                }),
            },
            ToolName::GetFitnessData => ToolSpec {
                name: "get_fitness_data".to_string(),
                description: "Fetch a user's most recent fitness record by email.".to_string(),
                parameters: serde_json::json!({
                    "type": "object",
                    "properties": {
                        "email": {
                            "type": "string",
                            "description": "Registered user email"
                        }
                    },
                    "required": ["email"]
                }),
            },
            ToolName::ListUsers => ToolSpec {
                name: "list_users".to_string(),
                description: "List all registered user emails.".to_string(),
                parameters: serde_json::json!({
                    "type": "object",
                    "properties": {}
                }),
            },
            ToolName::RegisterUser => ToolSpec {
                name: "register_user".to_string(),
                description: "Register a new user with their fitness profile. \
                    Check the registered users first to avoid duplicates."
                    .to_string(),
                parameters: serde_json::json!({
                    "type": "object",
                    "properties": {
                        "email": { "type": "string", "description": "User email" },
                        "name": { "type": "string", "description": "Full name" },
                        "age": { "type": "integer", "description": "Age in years" },
                        "weight": { "type": "number", "description": "Current weight in kg" },
                        "target_weight": { "type": "number", "description": "Target weight in kg" },
                        "height": { "type": "number", "description": "Height in cm" },
                        "goal": { "type": "string", "description": "Fitness goal" },
                        "dietary_restrictions": { "type": "string", "description": "Dietary restrictions, if any" },
                        "activity_level": { "type": "string", "description": "Daily activity level" },
                        "exercise_frequency": { "type": "integer", "description": "Workouts per week" }
                    },
                    "required": ["email", "name", "age", "weight", "target_weight", "height", "goal"]
                }),
            },
        })
        .collect()
}

/// Parse a tool call from the model's invocation format.
pub fn parse_tool_call(name: &str, arguments: &str) -> Result<ToolCall> {
    let trimmed = arguments.trim();
    let mut args: Value = if trimmed.is_empty() {
        serde_json::json!({})
    } else {
        serde_json::from_str(trimmed)
            .map_err(|e| TrenaError::Agent(format!("Invalid tool arguments: {}", e)))?
    };

    if !args.is_object() {
        return Err(TrenaError::InvalidInput(format!(
            "Tool arguments must be an object, got: {}",
            args
        )));
    }

    args["name"] = serde_json::json!(name);
    serde_json::from_value(args)
        .map_err(|e| TrenaError::Agent(format!("Invalid arguments for {}: {}", name, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::VideoOperation;
    use crate::session::MemorySessionStore;
    use crate::storage::MemoryObjectStore;
    use crate::warehouse::MemoryWarehouse;
    use async_trait::async_trait;
    use chrono::NaiveDate;

    struct StubMedia {
        video_done: bool,
    }

    #[async_trait]
    impl MediaGenerator for StubMedia {
        async fn start_video(&self, _request: &VideoRequest) -> Result<String> {
            Ok("operations/123".to_string())
        }

        async fn poll_video(&self, _operation: &str) -> Result<VideoOperation> {
            Ok(VideoOperation {
                done: self.video_done,
                video: self.video_done.then(|| b"fake video".to_vec()),
            })
        }

        async fn generate_image(&self, _prompt: &str) -> Result<Vec<u8>> {
            Ok(b"fake image".to_vec())
        }
    }

    fn test_context(media: StubMedia, warehouse: MemoryWarehouse) -> ToolContext {
        let mut settings = MediaSettings::default();
        settings.poll_interval_seconds = 0;
        settings.max_poll_attempts = 2;

        let data_dir = tempfile::tempdir().unwrap().into_path();
        ToolContext::new(
            Arc::new(media),
            Arc::new(MemoryObjectStore::new()),
            Arc::new(warehouse),
            Arc::new(MemorySessionStore::new()),
            settings,
            data_dir,
        )
    }

    fn sample_record() -> FitnessRecord {
        FitnessRecord {
            email: "kari@example.com".to_string(),
            name: "Kari".to_string(),
            age: 34,
            weight: 72.0,
            target_weight: 65.0,
            height: 170.0,
            goal: "lose weight".to_string(),
            dietary_restrictions: "none".to_string(),
            activity_level: "moderate".to_string(),
            exercise_frequency: 3,
            bmi: 24.9,
            date: NaiveDate::from_ymd_opt(2025, 3, 2).unwrap(),
        }
    }

    #[test]
    fn test_parse_video_tool_applies_defaults() {
        let tool = parse_tool_call("generate_workout_video", r#"{"prompt": "squats"}"#).unwrap();
        match tool {
            ToolCall::GenerateWorkoutVideo {
                prompt,
                aspect_ratio,
                negative_prompt,
            } => {
                assert_eq!(prompt, "squats");
                assert!(aspect_ratio.is_empty());
                assert!(negative_prompt.is_empty());
            }
            _ => panic!("Expected GenerateWorkoutVideo tool"),
        }
    }

    #[test]
    fn test_parse_no_arg_tool_accepts_empty_arguments() {
        let tool = parse_tool_call("list_users", "").unwrap();
        assert!(matches!(tool, ToolCall::ListUsers));
    }

    #[test]
    fn test_parse_unknown_tool_fails() {
        assert!(parse_tool_call("teleport_user", "{}").is_err());
    }

    #[test]
    fn test_tool_result_observation_shape() {
        let result = ToolResult::success("done").with_filename("clip.mp4");
        let observation: Value = serde_json::from_str(&result.to_observation()).unwrap();
        assert_eq!(observation["status"], "success");
        assert_eq!(observation["filename"], "clip.mp4");
        assert!(observation.get("uri").is_none());
    }

    #[test]
    fn test_artifact_name_format() {
        let name = artifact_name("workout_video", "mp4");
        assert!(name.starts_with("workout_video_"));
        assert!(name.ends_with(".mp4"));
    }

    #[test]
    fn test_tool_definitions_cover_bound_set() {
        use crate::agent::ToolName;

        let specs = tool_definitions(&[ToolName::GetFitnessData, ToolName::ListUsers]);
        let names: Vec<&str> = specs.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["get_fitness_data", "list_users"]);
    }

    #[tokio::test]
    async fn test_get_fitness_data_rejects_bad_email() {
        let ctx = test_context(StubMedia { video_done: true }, MemoryWarehouse::new());
        let result = ctx
            .execute(&ToolCall::GetFitnessData {
                email: "not-an-email".to_string(),
            })
            .await;
        assert_eq!(result.status, ToolStatus::Error);
    }

    #[tokio::test]
    async fn test_get_fitness_data_missing_user_is_error_result() {
        let ctx = test_context(StubMedia { video_done: true }, MemoryWarehouse::new());
        let result = ctx
            .execute(&ToolCall::GetFitnessData {
                email: "kari@example.com".to_string(),
            })
            .await;
        assert_eq!(result.status, ToolStatus::Error);
        assert!(result.message.contains("No data found"));
    }

    #[tokio::test]
    async fn test_get_fitness_data_returns_record_payload() {
        let warehouse = MemoryWarehouse::with_records(vec![sample_record()]);
        let ctx = test_context(StubMedia { video_done: true }, warehouse);
        let result = ctx
            .execute(&ToolCall::GetFitnessData {
                email: "kari@example.com".to_string(),
            })
            .await;
        assert!(result.is_success());
        assert_eq!(result.data.unwrap()["name"], "Kari");
    }

    #[tokio::test]
    async fn test_video_poll_loop_is_bounded() {
        let ctx = test_context(StubMedia { video_done: false }, MemoryWarehouse::new());
        let result = ctx
            .execute(&ToolCall::GenerateWorkoutVideo {
                prompt: "squats".to_string(),
                aspect_ratio: String::new(),
                negative_prompt: String::new(),
            })
            .await;
        assert_eq!(result.status, ToolStatus::Error);
        assert!(result.message.contains("did not complete"));
    }

    #[tokio::test]
    async fn test_video_generation_success_names_artifact() {
        let ctx = test_context(StubMedia { video_done: true }, MemoryWarehouse::new());
        let result = ctx
            .execute(&ToolCall::GenerateWorkoutVideo {
                prompt: "squats".to_string(),
                aspect_ratio: "9:16".to_string(),
                negative_prompt: String::new(),
            })
            .await;
        assert!(result.is_success());
        let filename = result.filename.unwrap();
        assert!(filename.starts_with("workout_video_"));
        assert!(filename.ends_with(".mp4"));
        assert_eq!(result.uri.as_deref(), Some(&*format!("memory://{}", filename)));
    }

    #[tokio::test]
    async fn test_register_user_computes_bmi() {
        let ctx = test_context(StubMedia { video_done: true }, MemoryWarehouse::new());
        let result = ctx
            .execute(&ToolCall::RegisterUser {
                email: "ola@example.com".to_string(),
                name: "Ola".to_string(),
                age: 28,
                weight: 80.0,
                target_weight: 75.0,
                height: 180.0,
                goal: "build muscle".to_string(),
                dietary_restrictions: "none".to_string(),
                activity_level: "high".to_string(),
                exercise_frequency: 4,
            })
            .await;
        assert!(result.is_success());
        assert_eq!(result.data.unwrap()["bmi"], 24.7);
    }
}
