//! Object storage abstraction for generated artifacts.
//!
//! Uploads are best-effort: a failed upload must never demote a successful
//! generation, so callers treat errors from this module as recoverable.

mod gcs;
mod memory;

pub use gcs::GcsObjectStore;
pub use memory::MemoryObjectStore;

use crate::error::Result;
use async_trait::async_trait;

/// A stored artifact and where to find it.
#[derive(Debug, Clone)]
pub struct StoredObject {
    /// Provider-native URI (e.g. gs://bucket/name).
    pub uri: String,
    /// Publicly retrievable URL, when the provider exposes one.
    pub public_url: Option<String>,
}

/// Trait for object storage backends.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Upload a named blob and return where it landed.
    async fn put(&self, name: &str, bytes: &[u8], content_type: &str) -> Result<StoredObject>;
}
