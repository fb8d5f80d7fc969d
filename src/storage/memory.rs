//! In-memory object store implementation.
//!
//! Useful for testing and local development.

use super::{ObjectStore, StoredObject};
use crate::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;

/// In-memory object store.
pub struct MemoryObjectStore {
    objects: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryObjectStore {
    /// Create a new in-memory object store.
    pub fn new() -> Self {
        Self {
            objects: RwLock::new(HashMap::new()),
        }
    }

    /// Number of stored objects.
    pub fn len(&self) -> usize {
        self.objects.read().unwrap().len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Fetch a stored object's bytes.
    pub fn get(&self, name: &str) -> Option<Vec<u8>> {
        self.objects.read().unwrap().get(name).cloned()
    }
}

impl Default for MemoryObjectStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn put(&self, name: &str, bytes: &[u8], _content_type: &str) -> Result<StoredObject> {
        let mut objects = self.objects.write().unwrap();
        objects.insert(name.to_string(), bytes.to_vec());
        Ok(StoredObject {
            uri: format!("memory://{}", name),
            public_url: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_put_and_get() {
        let store = MemoryObjectStore::new();
        tokio_test::block_on(async {
            let stored = store.put("clip.mp4", b"bytes", "video/mp4").await.unwrap();
            assert_eq!(stored.uri, "memory://clip.mp4");
            assert_eq!(store.get("clip.mp4").unwrap(), b"bytes");
            assert_eq!(store.len(), 1);
        });
    }
}
