//! Hosted generative-media implementation over the REST API.

use super::{MediaGenerator, VideoOperation, VideoRequest};
use crate::error::{Result, TrenaError};
use async_trait::async_trait;
use base64::Engine;
use serde_json::{json, Value};
use tracing::{debug, instrument};

/// Environment variable holding the API key for media generation calls.
const API_KEY_ENV: &str = "GENAI_API_KEY";

/// Media generator backed by the hosted generative API.
pub struct GenAiMediaGenerator {
    client: reqwest::Client,
    api_base: String,
    video_model: String,
    image_model: String,
}

impl GenAiMediaGenerator {
    /// Create a generator with the configured API base and models.
    pub fn new(api_base: &str, video_model: &str, image_model: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_base: api_base.trim_end_matches('/').to_string(),
            video_model: video_model.to_string(),
            image_model: image_model.to_string(),
        }
    }

    fn api_key() -> Result<String> {
        std::env::var(API_KEY_ENV)
            .map_err(|_| TrenaError::Media(format!("{} is not set", API_KEY_ENV)))
    }

    async fn post_json(&self, url: &str, body: &Value) -> Result<Value> {
        let response = self.client.post(url).json(body).send().await?;
        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(TrenaError::Media(format!(
                "Request failed with {}: {}",
                status, text
            )));
        }
        Ok(response.json().await?)
    }
}

/// Decode a base64 payload field.
fn decode_base64(data: &str) -> Result<Vec<u8>> {
    base64::engine::general_purpose::STANDARD
        .decode(data)
        .map_err(|e| TrenaError::Media(format!("Invalid base64 payload: {}", e)))
}

/// Pull the generated video out of a completed operation payload.
///
/// The backend returns either inline base64 bytes or a download URI; inline
/// bytes win when both are present.
fn extract_video_sample(payload: &Value) -> (Option<String>, Option<String>) {
    let sample = &payload["response"]["generateVideoResponse"]["generatedSamples"][0]["video"];
    let encoded = sample["bytesBase64Encoded"].as_str().map(str::to_string);
    let uri = sample["uri"].as_str().map(str::to_string);
    (encoded, uri)
}

#[async_trait]
impl MediaGenerator for GenAiMediaGenerator {
    #[instrument(skip(self, request), fields(model = %self.video_model))]
    async fn start_video(&self, request: &VideoRequest) -> Result<String> {
        let key = Self::api_key()?;
        let url = format!(
            "{}/models/{}:predictLongRunning?key={}",
            self.api_base, self.video_model, key
        );

        let mut parameters = json!({ "aspectRatio": request.aspect_ratio });
        if let Some(negative) = &request.negative_prompt {
            if !negative.is_empty() {
                parameters["negativePrompt"] = json!(negative);
            }
        }

        let body = json!({
            "instances": [{ "prompt": request.prompt }],
            "parameters": parameters,
        });

        let payload = self.post_json(&url, &body).await?;
        payload["name"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| TrenaError::Media("No operation id in response".to_string()))
    }

    #[instrument(skip(self))]
    async fn poll_video(&self, operation: &str) -> Result<VideoOperation> {
        let key = Self::api_key()?;
        let url = format!("{}/{}?key={}", self.api_base, operation, key);

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(TrenaError::Media(format!(
                "Operation poll failed with {}: {}",
                status, text
            )));
        }

        let payload: Value = response.json().await?;
        let done = payload["done"].as_bool().unwrap_or(false);
        if !done {
            return Ok(VideoOperation { done: false, video: None });
        }

        let (encoded, uri) = extract_video_sample(&payload);
        let video = match (encoded, uri) {
            (Some(data), _) => Some(decode_base64(&data)?),
            (None, Some(uri)) => {
                debug!("Downloading generated video from {}", uri);
                let bytes = self.client.get(&uri).send().await?.bytes().await?;
                Some(bytes.to_vec())
            }
            (None, None) => None,
        };

        Ok(VideoOperation { done: true, video })
    }

    #[instrument(skip(self, prompt), fields(model = %self.image_model))]
    async fn generate_image(&self, prompt: &str) -> Result<Vec<u8>> {
        let key = Self::api_key()?;
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.api_base, self.image_model, key
        );

        let body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
        });

        let payload = self.post_json(&url, &body).await?;

        let parts = payload["candidates"][0]["content"]["parts"]
            .as_array()
            .cloned()
            .unwrap_or_default();

        for part in &parts {
            if let Some(data) = part["inlineData"]["data"].as_str() {
                return decode_base64(data);
            }
        }

        Err(TrenaError::Media(
            "No image was produced".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_video_sample_prefers_inline_bytes() {
        let payload = json!({
            "done": true,
            "response": { "generateVideoResponse": { "generatedSamples": [
                { "video": { "bytesBase64Encoded": "aGVp", "uri": "https://example.com/v.mp4" } }
            ]}}
        });

        let (encoded, uri) = extract_video_sample(&payload);
        assert_eq!(encoded.as_deref(), Some("aGVp"));
        assert_eq!(uri.as_deref(), Some("https://example.com/v.mp4"));
        assert_eq!(decode_base64("aGVp").unwrap(), b"hei");
    }

    #[test]
    fn test_extract_video_sample_handles_missing_video() {
        let payload = json!({ "done": true, "response": {} });
        let (encoded, uri) = extract_video_sample(&payload);
        assert!(encoded.is_none());
        assert!(uri.is_none());
    }
}
