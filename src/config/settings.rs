//! Configuration settings for Trena.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub server: ServerSettings,
    pub model: ModelSettings,
    pub agents: AgentSettings,
    pub media: MediaSettings,
    pub storage: StorageSettings,
    pub warehouse: WarehouseSettings,
}


/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Directory for storing application data (generated artifacts).
    pub data_dir: String,
    /// Directory for temporary files.
    pub temp_dir: String,
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            data_dir: "~/.trena".to_string(),
            temp_dir: "/tmp/trena".to_string(),
            log_level: "info".to_string(),
        }
    }
}

/// Task dispatch server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Host to bind to.
    pub host: String,
    /// Port to bind to.
    pub port: u16,
    /// Application name used for sessions created by the server.
    pub app_name: String,
    /// Public endpoint URL advertised in the discovery document.
    /// Defaults to http://localhost:{port} when empty.
    pub public_url: String,
    /// Wall-clock budget for one task's agent run, in seconds.
    pub run_timeout_seconds: u64,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            app_name: "trena".to_string(),
            public_url: String::new(),
            run_timeout_seconds: 300,
        }
    }
}

/// Chat-model settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelSettings {
    /// API base URL for an OpenAI-compatible gateway. None = provider default.
    pub api_base: Option<String>,
    /// Default model for agents that do not name one.
    pub default_model: String,
    /// Sampling temperature.
    pub temperature: f32,
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            api_base: None,
            default_model: "gemini-2.5-flash".to_string(),
            temperature: 0.7,
        }
    }
}

/// Agent run loop settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentSettings {
    /// Maximum inference/tool iterations per run.
    pub max_iterations: usize,
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self { max_iterations: 15 }
    }
}

/// Generative media settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MediaSettings {
    /// Base URL of the generative media API.
    pub api_base: String,
    /// Model for video generation.
    pub video_model: String,
    /// Model for image generation.
    pub image_model: String,
    /// Default aspect ratio for generated videos.
    pub aspect_ratio: String,
    /// Seconds to wait between polls of a long-running video operation.
    pub poll_interval_seconds: u64,
    /// Maximum number of polls before the operation is reported as failed.
    pub max_poll_attempts: u32,
}

impl Default for MediaSettings {
    fn default() -> Self {
        Self {
            api_base: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            video_model: "veo-3.0-generate-001".to_string(),
            image_model: "gemini-2.5-flash-image".to_string(),
            aspect_ratio: "16:9".to_string(),
            poll_interval_seconds: 20,
            max_poll_attempts: 30,
        }
    }
}

/// Object storage settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// Storage provider (gcs, memory).
    pub provider: String,
    /// Bucket for uploaded artifacts.
    pub bucket: String,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            provider: "gcs".to_string(),
            bucket: "trena-artifacts".to_string(),
        }
    }
}

/// Tabular warehouse settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WarehouseSettings {
    /// Warehouse provider (bigquery, memory).
    pub provider: String,
    /// Cloud project that owns the dataset.
    pub project: String,
    /// Dataset holding user fitness data.
    pub dataset: String,
    /// Table holding user fitness data.
    pub table: String,
}

impl Default for WarehouseSettings {
    fn default() -> Self {
        Self {
            provider: "bigquery".to_string(),
            project: String::new(),
            dataset: "health_data".to_string(),
            table: "user_fitness_data".to_string(),
        }
    }
}

impl Settings {
    /// Load settings from the default configuration file.
    pub fn load() -> crate::error::Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or default location if None.
    pub fn load_from(path: Option<&PathBuf>) -> crate::error::Result<Self> {
        let config_path = match path {
            Some(p) => p.clone(),
            None => Self::default_config_path(),
        };

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let settings: Settings = toml::from_str(&content)?;
            Ok(settings)
        } else {
            Ok(Settings::default())
        }
    }

    /// Save settings to the default configuration file.
    pub fn save(&self) -> crate::error::Result<()> {
        self.save_to(&Self::default_config_path())
    }

    /// Save settings to a specific path.
    pub fn save_to(&self, path: &PathBuf) -> crate::error::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::error::TrenaError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("trena")
            .join("config.toml")
    }

    /// Expand shell variables in paths (e.g., ~).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }

    /// Get the expanded data directory path.
    pub fn data_dir(&self) -> PathBuf {
        Self::expand_path(&self.general.data_dir)
    }

    /// Get the expanded temp directory path.
    pub fn temp_dir(&self) -> PathBuf {
        Self::expand_path(&self.general.temp_dir)
    }

    /// The endpoint URL advertised in the discovery document.
    pub fn endpoint_url(&self) -> String {
        if self.server.public_url.is_empty() {
            format!("http://localhost:{}", self.server.port)
        } else {
            self.server.public_url.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.agents.max_iterations, 15);
        assert_eq!(settings.media.poll_interval_seconds, 20);
        assert!(settings.media.max_poll_attempts > 0);
    }

    #[test]
    fn test_endpoint_url_fallback() {
        let mut settings = Settings::default();
        assert_eq!(settings.endpoint_url(), "http://localhost:8080");

        settings.server.public_url = "https://coach.example.com".to_string();
        assert_eq!(settings.endpoint_url(), "https://coach.example.com");
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let settings: Settings = toml::from_str("[server]\nport = 9090\n").unwrap();
        assert_eq!(settings.server.port, 9090);
        assert_eq!(settings.server.app_name, "trena");
    }
}
