//! In-memory session store implementation.
//!
//! Sessions live for the process lifetime only; a restart drops them.

use super::{ArtifactRef, Session, SessionEvent, SessionStore};
use crate::error::{Result, TrenaError};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;
use uuid::Uuid;

/// In-memory session store.
pub struct MemorySessionStore {
    sessions: RwLock<HashMap<Uuid, Session>>,
}

impl MemorySessionStore {
    /// Create a new in-memory session store.
    pub fn new() -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for MemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn create(&self, app_name: &str, user_id: &str) -> Result<Session> {
        let session = Session::new(app_name, user_id);
        let mut sessions = self.sessions.write().unwrap();
        sessions.insert(session.id, session.clone());
        Ok(session)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Session>> {
        let sessions = self.sessions.read().unwrap();
        Ok(sessions.get(&id).cloned())
    }

    async fn append_event(&self, id: Uuid, event: SessionEvent) -> Result<()> {
        let mut sessions = self.sessions.write().unwrap();
        let session = sessions
            .get_mut(&id)
            .ok_or_else(|| TrenaError::Session(format!("No such session: {}", id)))?;
        session.events.push(event);
        Ok(())
    }

    async fn add_artifact(&self, id: Uuid, artifact: ArtifactRef) -> Result<()> {
        let mut sessions = self.sessions.write().unwrap();
        let session = sessions
            .get_mut(&id)
            .ok_or_else(|| TrenaError::Session(format!("No such session: {}", id)))?;
        session.artifacts.push(artifact);
        Ok(())
    }

    async fn count(&self) -> Result<usize> {
        let sessions = self.sessions.read().unwrap();
        Ok(sessions.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_create_and_get() {
        let store = MemorySessionStore::new();
        tokio_test::block_on(async {
            let session = store.create("trena", "a2a_user").await.unwrap();
            let fetched = store.get(session.id).await.unwrap().unwrap();
            assert_eq!(fetched.app_name, "trena");
            assert_eq!(fetched.user_id, "a2a_user");
            assert!(fetched.events.is_empty());
        });
    }

    #[test]
    fn test_sessions_are_isolated() {
        let store = MemorySessionStore::new();
        tokio_test::block_on(async {
            let a = store.create("trena", "a2a_user").await.unwrap();
            let b = store.create("trena", "a2a_user").await.unwrap();
            assert_ne!(a.id, b.id);

            store
                .append_event(
                    a.id,
                    SessionEvent {
                        author: "coach".to_string(),
                        content: "only in a".to_string(),
                        final_response: true,
                        recorded_at: Utc::now(),
                    },
                )
                .await
                .unwrap();

            let a = store.get(a.id).await.unwrap().unwrap();
            let b = store.get(b.id).await.unwrap().unwrap();
            assert_eq!(a.events.len(), 1);
            assert!(b.events.is_empty());
            assert_eq!(store.count().await.unwrap(), 2);
        });
    }

    #[test]
    fn test_append_to_missing_session_fails() {
        let store = MemorySessionStore::new();
        tokio_test::block_on(async {
            let result = store
                .append_event(
                    Uuid::new_v4(),
                    SessionEvent {
                        author: "coach".to_string(),
                        content: String::new(),
                        final_response: false,
                        recorded_at: Utc::now(),
                    },
                )
                .await;
            assert!(result.is_err());
        });
    }
}
