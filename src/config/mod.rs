//! Configuration module for Trena.
//!
//! Handles loading and managing application settings.

mod settings;

pub use settings::{
    AgentSettings, GeneralSettings, MediaSettings, ModelSettings, ServerSettings, Settings,
    StorageSettings, WarehouseSettings,
};
