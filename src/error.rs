//! Error types for Trena.

use thiserror::Error;

/// Library-level error type for Trena operations.
#[derive(Error, Debug)]
pub enum TrenaError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Inference error: {0}")]
    Inference(String),

    #[error("Agent error: {0}")]
    Agent(String),

    #[error("Unknown agent: {0}")]
    UnknownAgent(String),

    #[error("Media generation failed: {0}")]
    Media(String),

    #[error("Object storage error: {0}")]
    Storage(String),

    #[error("Warehouse query failed: {0}")]
    Warehouse(String),

    #[error("Session error: {0}")]
    Session(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type alias for Trena operations.
pub type Result<T> = std::result::Result<T, TrenaError>;
