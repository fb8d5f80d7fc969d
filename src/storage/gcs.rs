//! Google Cloud Storage implementation over the JSON upload API.

use super::{ObjectStore, StoredObject};
use crate::error::{Result, TrenaError};
use async_trait::async_trait;
use tracing::{debug, instrument};

/// Environment variable holding the OAuth bearer token for storage calls.
const TOKEN_ENV: &str = "GCS_ACCESS_TOKEN";

/// Object store backed by a GCS bucket.
pub struct GcsObjectStore {
    client: reqwest::Client,
    bucket: String,
    upload_base: String,
}

impl GcsObjectStore {
    /// Create a store for the given bucket.
    pub fn new(bucket: &str) -> Self {
        Self::with_upload_base(bucket, "https://storage.googleapis.com/upload/storage/v1")
    }

    /// Create a store against a custom upload endpoint (for emulators).
    pub fn with_upload_base(bucket: &str, upload_base: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            bucket: bucket.to_string(),
            upload_base: upload_base.trim_end_matches('/').to_string(),
        }
    }

    fn bearer_token() -> Result<String> {
        std::env::var(TOKEN_ENV)
            .map_err(|_| TrenaError::Storage(format!("{} is not set", TOKEN_ENV)))
    }
}

#[async_trait]
impl ObjectStore for GcsObjectStore {
    #[instrument(skip(self, bytes), fields(bucket = %self.bucket, size = bytes.len()))]
    async fn put(&self, name: &str, bytes: &[u8], content_type: &str) -> Result<StoredObject> {
        let token = Self::bearer_token()?;
        let url = format!(
            "{}/b/{}/o?uploadType=media&name={}",
            self.upload_base, self.bucket, name
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(token)
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(bytes.to_vec())
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(TrenaError::Storage(format!(
                "Upload of {} failed with {}: {}",
                name, status, body
            )));
        }

        debug!("Uploaded {} to bucket {}", name, self.bucket);

        Ok(StoredObject {
            uri: format!("gs://{}/{}", self.bucket, name),
            public_url: Some(format!(
                "https://storage.googleapis.com/{}/{}",
                self.bucket, name
            )),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uri_shapes() {
        let store = GcsObjectStore::new("my-bucket");
        assert_eq!(store.bucket, "my-bucket");
        assert!(store.upload_base.starts_with("https://storage.googleapis.com"));
    }
}
