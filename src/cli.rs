//! Command-line interface definition for Apiary
//!
//! This module defines the CLI structure using clap's derive API,
//! providing commands to run the HTTP facade and to talk to the
//! chat-bot relay directly.

use clap::{Parser, Subcommand};

/// Apiary - HTTP facade over a handful of third-party services
///
/// Serves video metadata, dictionary lookups, paste posting, chat-bot
/// relaying and player stats behind one set of JSON endpoints.
#[derive(Parser, Debug, Clone)]
#[command(name = "apiary")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/config.yaml")]
    pub config: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for Apiary
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Run the HTTP server
    Serve {
        /// Override the bind address from config
        #[arg(long)]
        host: Option<String>,

        /// Override the port from config
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Send one question through the chat-bot relay
    Ask {
        /// Question to send
        question: String,

        /// Continue an existing conversation
        #[arg(short, long)]
        session: Option<String>,
    },
}

impl Cli {
    /// Parse command line arguments
    ///
    /// # Returns
    ///
    /// Returns the parsed CLI structure
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

impl Default for Cli {
    fn default() -> Self {
        Self {
            config: Some("config/config.yaml".to_string()),
            verbose: false,
            command: Commands::Serve {
                host: None,
                port: None,
            },
        }
    }
}
