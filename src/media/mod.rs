//! Generative media backend abstraction.
//!
//! Video generation is a long-running operation: submit, then poll until the
//! backend reports it done. Image generation returns synchronously.

mod genai;

pub use genai::GenAiMediaGenerator;

use crate::error::Result;
use async_trait::async_trait;

/// A video generation request.
#[derive(Debug, Clone)]
pub struct VideoRequest {
    /// Text description of the video to generate.
    pub prompt: String,
    /// Aspect ratio, "16:9" or "9:16".
    pub aspect_ratio: String,
    /// What NOT to include in the video.
    pub negative_prompt: Option<String>,
}

/// State of a long-running video operation.
#[derive(Debug, Clone)]
pub struct VideoOperation {
    /// Whether the backend reports the operation complete.
    pub done: bool,
    /// Video bytes, present once done and successful.
    pub video: Option<Vec<u8>>,
}

/// Trait for generative media backends.
#[async_trait]
pub trait MediaGenerator: Send + Sync {
    /// Submit an asynchronous video generation request; returns the
    /// operation id to poll.
    async fn start_video(&self, request: &VideoRequest) -> Result<String>;

    /// Check a video operation's completion status.
    async fn poll_video(&self, operation: &str) -> Result<VideoOperation>;

    /// Generate an image and return its bytes.
    async fn generate_image(&self, prompt: &str) -> Result<Vec<u8>>;
}
