//! Chat API client configuration with sensible defaults.

use async_openai::{config::OpenAIConfig, Client};
use std::time::Duration;

/// Default timeout for chat API requests (5 minutes).
const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Create a chat API client with configured timeout.
///
/// Uses a 5-minute timeout by default to prevent hung API calls.
pub fn create_client(api_base: Option<&str>) -> Client<OpenAIConfig> {
    create_client_with_timeout(api_base, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
}

/// Create a chat API client with a custom timeout.
///
/// `api_base` overrides the endpoint so OpenAI-compatible gateways can front
/// other hosted models.
pub fn create_client_with_timeout(
    api_base: Option<&str>,
    timeout: Duration,
) -> Client<OpenAIConfig> {
    let http_client = reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .expect("Failed to create HTTP client");

    let config = match api_base {
        Some(base) => OpenAIConfig::default().with_api_base(base),
        None => OpenAIConfig::default(),
    };

    Client::with_config(config).with_http_client(http_client)
}
