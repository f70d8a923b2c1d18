//! Conversation relay
//!
//! Ties the session store, encoder and decoder together into one
//! request/response cycle against the chat-bot endpoint.

use std::sync::{Arc, Mutex, MutexGuard};

use bytes::Bytes;
use chrono::Duration;
use tokio::sync::OnceCell;

use super::decoder::{self, DecodedReply};
use super::encoder;
use super::fields::{CONTINUATION, STIMULUS};
use super::session::{Session, SessionStore, MAX_SESSION_TTL_MINUTES};
use crate::config::RelayConfig;
use crate::error::{ApiaryError, Result};
use crate::transport::HttpTransport;

/// Resource path of the chat endpoint, including its fixed query parameter
pub const RELAY_RESOURCE: &str = "/webservicemin?uc=165&";

const USER_AGENT: &str = "Mozilla/4.0 (compatible; MSIE 8.0; Windows NT 6.0)";
const ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";
const ACCEPT_CHARSET: &str = "ISO-8859-1,utf-8;q=0.7,*;q=0.7";
const ACCEPT_LANGUAGE: &str = "en-us,en;q=0.8,en-us;q=0.5,en;q=0.3";
const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Answer to one question
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayReply {
    /// Bot answer
    pub answer: String,
    /// Session the exchange belongs to (newly generated when none was given)
    pub session_id: String,
}

/// Shared client for the chat-bot service
///
/// One instance serves every conversation. Session state lives behind a
/// mutex that is never held across a network call, so exchanges on
/// different sessions interleave freely.
#[derive(Debug)]
pub struct ConversationRelay {
    transport: Arc<dyn HttpTransport>,
    sessions: Mutex<SessionStore>,
    root_url: String,
    endpoint: String,
    browser_headers: Vec<(String, String)>,
    strict_continuation: bool,
    primed: OnceCell<()>,
}

impl ConversationRelay {
    /// Create a relay from configuration
    ///
    /// # Arguments
    ///
    /// * `config` - Relay section of the configuration
    /// * `transport` - Outbound transport; it must keep cookies between calls
    pub fn new(config: &RelayConfig, transport: Arc<dyn HttpTransport>) -> Self {
        let base = config.base_url.trim_end_matches('/');
        let root_url = format!("{}/", base);

        let browser_headers = vec![
            ("User-Agent".to_string(), USER_AGENT.to_string()),
            ("Accept".to_string(), ACCEPT.to_string()),
            ("Accept-Charset".to_string(), ACCEPT_CHARSET.to_string()),
            ("Accept-Language".to_string(), ACCEPT_LANGUAGE.to_string()),
            ("Cache-Control".to_string(), "no-cache".to_string()),
            ("Pragma".to_string(), "no-cache".to_string()),
            ("Referer".to_string(), root_url.clone()),
        ];

        Self {
            transport,
            sessions: Mutex::new(SessionStore::new(Duration::minutes(
                config.session_ttl_minutes.clamp(1, MAX_SESSION_TTL_MINUTES),
            ))),
            endpoint: format!("{}{}", base, RELAY_RESOURCE),
            root_url,
            browser_headers,
            strict_continuation: config.strict_continuation,
            primed: OnceCell::new(),
        }
    }

    /// Fetch the service root once so the transport holds its cookies
    ///
    /// Idempotent: only the first successful call does any I/O. A failed
    /// attempt is retried on the next call.
    pub async fn ensure_initialized(&self) -> Result<()> {
        self.primed
            .get_or_try_init(|| async {
                tracing::debug!("Priming relay cookies from {}", self.root_url);
                self.transport
                    .get(&self.root_url, &self.browser_headers)
                    .await
                    .map(|_| ())
            })
            .await?;
        Ok(())
    }

    /// Ask a question, optionally continuing an existing conversation
    ///
    /// # Arguments
    ///
    /// * `question` - Text to send
    /// * `session_id` - Conversation to continue; `None` or empty starts a new one
    ///
    /// # Errors
    ///
    /// - [`ApiaryError::RemoteDenied`] when the service refuses the exchange.
    ///   The session is left untouched and can be used again.
    /// - [`ApiaryError::Transport`] on network failure or a non-2xx status.
    /// - [`ApiaryError::MalformedResponse`] when the reply cannot be parsed.
    pub async fn ask(&self, question: &str, session_id: Option<&str>) -> Result<RelayReply> {
        self.ensure_initialized().await?;

        let (session_id, body) = self.prepare(question, session_id)?;
        tracing::debug!(session = %session_id, "Relaying question ({} body bytes)", body.len());

        let mut headers = self.browser_headers.clone();
        headers.push(("Content-Type".to_string(), FORM_CONTENT_TYPE.to_string()));

        let response = self
            .transport
            .post(&self.endpoint, Bytes::from(body), &headers)
            .await?
            .error_for_status("chat relay")?;

        let reply = decoder::decode(&decoder::latin1_to_string(&response.body))?;
        let answer = self.commit(&session_id, question, reply)?;

        Ok(RelayReply { answer, session_id })
    }

    /// Copy of a session's current state
    ///
    /// # Errors
    ///
    /// Fails like [`ask`](Self::ask) when the session store lock is poisoned
    pub fn session(&self, session_id: &str) -> Result<Option<Session>> {
        Ok(self.lock_sessions()?.get(session_id).cloned())
    }

    /// Number of sessions held
    pub fn session_count(&self) -> Result<usize> {
        Ok(self.lock_sessions()?.len())
    }

    /// Resolve the session, set the question and build the body
    fn prepare(&self, question: &str, session_id: Option<&str>) -> Result<(String, String)> {
        let mut store = self.lock_sessions()?;
        let id = store.get_or_create(session_id);
        let session = store
            .get_mut(&id)
            .ok_or_else(|| anyhow::anyhow!("Session {} vanished during creation", id))?;

        session.fields.set(STIMULUS, question);
        let body = encoder::encode(&mut session.fields, &session.history);
        Ok((id, body))
    }

    /// Apply a decoded reply to the session and return the answer
    fn commit(&self, session_id: &str, question: &str, reply: DecodedReply) -> Result<String> {
        let mut store = self.lock_sessions()?;
        // The session may have expired while the request was in flight
        let id = store.get_or_create(Some(session_id));
        let session = store
            .get_mut(&id)
            .ok_or_else(|| anyhow::anyhow!("Session {} vanished during update", id))?;

        let has_token = session
            .fields
            .get(CONTINUATION)
            .is_some_and(|token| !token.is_empty());
        if has_token || !self.strict_continuation {
            session.fields.set(CONTINUATION, reply.continuation_token);
        }

        session.record_exchange(question, &reply.answer);
        Ok(reply.answer)
    }

    fn lock_sessions(&self) -> Result<MutexGuard<'_, SessionStore>> {
        self.sessions
            .lock()
            .map_err(|_| ApiaryError::Upstream("Session store lock poisoned".to_string()).into())
    }
}
