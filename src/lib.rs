//! Trena - Agent-Based Wellness Coaching
//!
//! A service that wires a tree of LLM agents for wellness coaching and exposes
//! the root agent over a minimal A2A task protocol.
//!
//! The name "Trena" comes from the Norwegian/Scandinavian word for "train."
//!
//! # Overview
//!
//! Trena allows you to:
//! - Define agents declaratively (instruction, model, tools, child agents)
//! - Serve an agent over HTTP with discovery and synchronous task submission
//! - Generate workout videos and progress/diet images through tool adapters
//! - Look up and register user fitness data in a tabular warehouse
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - `config` - Configuration management
//! - `inference` - Chat-model backend abstraction
//! - `agent` - Agent specs, registry, and the run loop
//! - `agents` - The declarative wellness agent tree
//! - `media` - Generative media backend (video, image)
//! - `storage` - Object storage abstraction
//! - `warehouse` - Tabular user-data backend
//! - `session` - Per-task conversational sessions
//! - `server` - A2A task dispatch server
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use trena::agents::wellness_registry;
//! use trena::config::Settings;
//! use trena::server::TaskServer;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let registry = Arc::new(wellness_registry(&settings));
//!     let server = TaskServer::from_settings(settings, registry)?;
//!     server.run().await?;
//!     Ok(())
//! }
//! ```

pub mod agent;
pub mod agents;
pub mod cli;
pub mod config;
pub mod error;
pub mod inference;
pub mod media;
pub mod openai;
pub mod server;
pub mod session;
pub mod storage;
pub mod warehouse;

pub use error::{Result, TrenaError};
