//! Apiary - HTTP facade library
//!
//! This library provides a small REST facade over several third-party
//! services, the centrepiece being a stateful chat-bot conversation relay.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - `transport`: Outbound HTTP abstraction (reqwest implementation, test fake)
//! - `relay`: Chat-bot sessions, request encoding and reply decoding
//! - `services`: Video, dictionary, insult, paste and player-stats clients
//! - `server`: axum router and handlers
//! - `commands`: CLI command handlers
//! - `config`: Configuration management and validation
//! - `error`: Error types and result aliases
//! - `cli`: Command-line interface definition
//!
//! # Example
//!
//! ```no_run
//! use apiary::Config;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config/config.yaml", &Default::default())?;
//!     config.validate()?;
//!     apiary::server::serve(config).await
//! }
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod relay;
pub mod server;
pub mod services;
pub mod transport;

// Re-export commonly used types
pub use config::Config;
pub use error::{ApiaryError, Result};
pub use relay::{ConversationRelay, RelayReply};

#[cfg(test)]
pub mod test_utils;
