//! Chat-bot conversation relay
//!
//! The chat-bot service has no formal API; the relay imitates its web
//! client. Each exchange:
//!
//! 1. primes cookies once per process ([`ConversationRelay::ensure_initialized`]),
//! 2. resolves or creates the session ([`session::SessionStore`]),
//! 3. encodes the ordered field set with the latest history and the MD5
//!    checksum ([`encoder`]),
//! 4. posts it and decodes the carriage-return delimited reply ([`decoder`]),
//! 5. records the question and answer in the session history.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use apiary::config::RelayConfig;
//! use apiary::relay::ConversationRelay;
//! use apiary::transport::http::ReqwestTransport;
//!
//! # async fn example() -> apiary::error::Result<()> {
//! let transport = Arc::new(ReqwestTransport::new(Duration::from_secs(30))?);
//! let relay = ConversationRelay::new(&RelayConfig::default(), transport);
//! let reply = relay.ask("hello", None).await?;
//! let follow_up = relay.ask("how are you?", Some(&reply.session_id)).await?;
//! println!("{}", follow_up.answer);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod decoder;
pub mod encoder;
pub mod fields;
pub mod session;

pub use client::{ConversationRelay, RelayReply};
pub use decoder::DecodedReply;
pub use session::{Session, SessionStore};
