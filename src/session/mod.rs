//! Per-task conversational sessions.
//!
//! Every inbound task gets its own session; the store is the only shared
//! mutable state in the service and is pluggable for multi-instance
//! deployments.

mod memory;

pub use memory::MemorySessionStore;

use crate::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A recorded exchange inside a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionEvent {
    /// Agent or role that produced the content.
    pub author: String,
    /// Text content of the event.
    pub content: String,
    /// Whether this event closed out the turn.
    pub final_response: bool,
    /// When the event was recorded.
    pub recorded_at: DateTime<Utc>,
}

/// Reference to an artifact produced during a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactRef {
    /// Artifact filename.
    pub filename: String,
    /// Storage URI, when the upload succeeded.
    pub uri: Option<String>,
    /// When the artifact was recorded.
    pub recorded_at: DateTime<Utc>,
}

/// A conversational session owned by one task.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// Unique session ID.
    pub id: Uuid,
    /// Application that created the session.
    pub app_name: String,
    /// User identity the session is scoped to.
    pub user_id: String,
    /// Recorded events, in emission order.
    pub events: Vec<SessionEvent>,
    /// Artifacts produced during the session.
    pub artifacts: Vec<ArtifactRef>,
    /// When the session was created.
    pub created_at: DateTime<Utc>,
}

impl Session {
    /// Create a new empty session.
    pub fn new(app_name: &str, user_id: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            app_name: app_name.to_string(),
            user_id: user_id.to_string(),
            events: Vec::new(),
            artifacts: Vec::new(),
            created_at: Utc::now(),
        }
    }
}

/// Trait for session store implementations.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Create a new session scoped to an application and user.
    async fn create(&self, app_name: &str, user_id: &str) -> Result<Session>;

    /// Fetch a session by ID.
    async fn get(&self, id: Uuid) -> Result<Option<Session>>;

    /// Append an event to a session.
    async fn append_event(&self, id: Uuid, event: SessionEvent) -> Result<()>;

    /// Record an artifact produced during a session.
    async fn add_artifact(&self, id: Uuid, artifact: ArtifactRef) -> Result<()>;

    /// Number of live sessions.
    async fn count(&self) -> Result<usize>;
}
