//! In-memory conversation session store
//!
//! Sessions are keyed by an opaque id and expire after a fixed idle period.
//! There is no background timer: every store access sweeps expired sessions
//! first, which keeps memory bounded at the cost of O(n) work per request.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};

use super::fields::FieldSet;

/// Default idle lifetime of a session
pub const DEFAULT_SESSION_TTL_MINUTES: i64 = 30;

/// Longest accepted idle lifetime (one year)
pub const MAX_SESSION_TTL_MINUTES: i64 = 365 * 24 * 60;

/// Generate a fresh session id
///
/// Ids are uppercase hex (a simple-format v4 UUID), so they embed in form
/// bodies without escaping.
pub fn generate_session_id() -> String {
    uuid::Uuid::new_v4().simple().to_string().to_uppercase()
}

/// State of one conversation
#[derive(Debug, Clone)]
pub struct Session {
    /// Opaque identifier
    pub id: String,
    /// Absolute expiry; refreshed on every access
    pub expires_at: DateTime<Utc>,
    /// Every question and answer, oldest first
    pub history: Vec<String>,
    /// Protocol fields sent with every request
    pub fields: FieldSet,
}

impl Session {
    fn new(id: String, expires_at: DateTime<Utc>) -> Self {
        Self {
            id,
            expires_at,
            history: Vec::new(),
            fields: FieldSet::default(),
        }
    }

    /// Whether the session had expired at `now`
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at < now
    }

    /// Append one exchange: the question, then the answer
    pub fn record_exchange(&mut self, question: &str, answer: &str) {
        self.history.push(question.to_string());
        self.history.push(answer.to_string());
    }
}

/// Table of live sessions with sweep-on-access expiry
#[derive(Debug)]
pub struct SessionStore {
    sessions: HashMap<String, Session>,
    ttl: Duration,
}

impl SessionStore {
    /// Create an empty store whose sessions live for `ttl` after last use
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: HashMap::new(),
            ttl,
        }
    }

    /// Resolve a session id, creating the session when needed
    ///
    /// A missing or empty `id` gets a freshly generated one. Expired sessions
    /// are swept before the lookup, so an expired id starts over with an
    /// empty history.
    ///
    /// # Returns
    ///
    /// The effective session id (equal to `id` when one was supplied)
    pub fn get_or_create(&mut self, id: Option<&str>) -> String {
        self.get_or_create_at(id, Utc::now())
    }

    /// [`get_or_create`](Self::get_or_create) against an explicit clock
    pub fn get_or_create_at(&mut self, id: Option<&str>, now: DateTime<Utc>) -> String {
        self.sweep(now);

        let id = match id.filter(|id| !id.is_empty()) {
            Some(id) => id.to_string(),
            None => generate_session_id(),
        };

        let expires_at = self.expiry_from(now);
        self.sessions
            .entry(id.clone())
            .and_modify(|session| session.expires_at = expires_at)
            .or_insert_with(|| Session::new(id.clone(), expires_at));

        id
    }

    /// Refresh the expiry of an existing session
    ///
    /// Returns `false` when the session does not exist (or had already
    /// expired and was swept).
    pub fn touch(&mut self, id: &str) -> bool {
        self.touch_at(id, Utc::now())
    }

    /// [`touch`](Self::touch) against an explicit clock
    pub fn touch_at(&mut self, id: &str, now: DateTime<Utc>) -> bool {
        self.sweep(now);
        let expires_at = self.expiry_from(now);
        match self.sessions.get_mut(id) {
            Some(session) => {
                session.expires_at = expires_at;
                true
            }
            None => false,
        }
    }

    /// Session by id, without sweeping or refreshing
    pub fn get(&self, id: &str) -> Option<&Session> {
        self.sessions.get(id)
    }

    /// Mutable session by id, without sweeping or refreshing
    pub fn get_mut(&mut self, id: &str) -> Option<&mut Session> {
        self.sessions.get_mut(id)
    }

    /// Number of sessions currently held (expired ones included until the next sweep)
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Whether the store holds no sessions
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Expiry for a session used at `now`, saturating at the latest representable instant
    fn expiry_from(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now.checked_add_signed(self.ttl)
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }

    /// Drop every session whose expiry is before `now`
    ///
    /// # Returns
    ///
    /// Number of sessions removed
    fn sweep(&mut self, now: DateTime<Utc>) -> usize {
        let before = self.sessions.len();
        self.sessions.retain(|_, session| !session.is_expired_at(now));
        before - self.sessions.len()
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(Duration::minutes(DEFAULT_SESSION_TTL_MINUTES))
    }
}
