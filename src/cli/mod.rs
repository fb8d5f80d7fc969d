//! CLI module for Trena.

pub mod commands;
mod output;

pub use output::Output;

use clap::{Parser, Subcommand};

/// Trena - Agent-Based Wellness Coaching
///
/// Serves a tree of wellness coaching agents over a minimal A2A task
/// protocol. The name "Trena" comes from the Norwegian/Scandinavian word
/// for "train."
#[derive(Parser, Debug)]
#[command(name = "trena")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the A2A task dispatch server
    Serve {
        /// Host to bind to
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Send one message through an agent and print the final response
    Ask {
        /// The message to send
        message: String,

        /// Agent to run (default: the root coach)
        #[arg(short, long)]
        agent: Option<String>,
    },

    /// List the configured agents
    Agents,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Print the effective configuration
    Show,

    /// Print the configuration file path
    Path,

    /// Write the default configuration file
    Init,
}
