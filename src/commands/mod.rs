/*!
Command handlers for the CLI

- `serve` -- run the HTTP facade
- `ask`   -- send one question through the chat-bot relay and print the reply
*/

use crate::config::Config;
use crate::error::Result;
use crate::relay::ConversationRelay;
use crate::transport::http::ReqwestTransport;
use std::sync::Arc;
use std::time::Duration;

// Server command handler
pub mod serve {
    use super::*;

    /// Run the HTTP server until Ctrl-C
    pub async fn run_serve(config: Config) -> Result<()> {
        tracing::info!(
            "Starting HTTP facade on {}:{}",
            config.server.host,
            config.server.port
        );
        crate::server::serve(config).await
    }
}

// One-shot relay command handler
pub mod ask {
    use super::*;

    /// Ask one question and print `answer` followed by the session id
    ///
    /// # Arguments
    ///
    /// * `config` - Loaded configuration
    /// * `question` - Text to send
    /// * `session` - Conversation id to continue. Sessions live in memory,
    ///   so a fresh process only reuses the id, not the history.
    pub async fn run_ask(config: Config, question: String, session: Option<String>) -> Result<()> {
        let reply = ask_once(&config, &question, session.as_deref()).await?;
        println!("{}", reply.answer);
        println!("session: {}", reply.session_id);
        Ok(())
    }

    /// Build a relay from `config` and make a single exchange
    pub async fn ask_once(
        config: &Config,
        question: &str,
        session: Option<&str>,
    ) -> Result<crate::relay::RelayReply> {
        let transport = Arc::new(ReqwestTransport::new(Duration::from_secs(
            config.relay.timeout_seconds,
        ))?);
        let relay = ConversationRelay::new(&config.relay, transport);
        relay.ask(question, session).await
    }
}
