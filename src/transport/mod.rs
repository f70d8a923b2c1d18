//! Outbound HTTP transport abstraction and implementations
//!
//! Every upstream call the crate makes goes through the [`HttpTransport`]
//! trait. Concrete implementations live in submodules:
//!
//! - [`http::ReqwestTransport`] -- a `reqwest` client with a cookie store and
//!   a per-call timeout.
//! - [`fake::FakeTransport`] -- in-process fake used in tests (cfg(test)
//!   only).
//!
//! # Design
//!
//! Callers hand over a fully built URL,
//! the header list and (for POST) the raw body, and get back the status code
//! plus the raw body bytes. Decoding the body is left to the caller because
//! the chat-bot relay needs the bytes untouched.

use bytes::Bytes;
use serde::de::DeserializeOwned;

use crate::error::{ApiaryError, Result};

/// Ordered list of header name/value pairs sent with a request
pub type Headers = [(String, String)];

/// Status code and raw body returned by a transport call
#[derive(Debug, Clone)]
pub struct TransportResponse {
    /// HTTP status code
    pub status: u16,
    /// Raw response body
    pub body: Bytes,
}

impl TransportResponse {
    /// Create a new response from a status code and body
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Returns `true` for 2xx status codes
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Body decoded as UTF-8, replacing invalid sequences
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Body decoded as JSON
    ///
    /// # Errors
    ///
    /// Returns [`ApiaryError::Serialization`] if the body is not valid JSON
    /// for `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_slice(&self.body).map_err(|e| ApiaryError::Serialization(e).into())
    }

    /// Fail with [`ApiaryError::Transport`] unless the status is 2xx
    ///
    /// # Arguments
    ///
    /// * `context` - Short description of the call, used in the error message
    pub fn error_for_status(self, context: &str) -> Result<Self> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(ApiaryError::Transport(format!(
                "{} returned HTTP {}",
                context, self.status
            ))
            .into())
        }
    }
}

/// Abstraction over outbound HTTP
///
/// Both calls are suspension points. Implementations report network-level
/// failures as [`ApiaryError::Transport`]; a non-2xx status is *not* an
/// error at this layer.
#[async_trait::async_trait]
pub trait HttpTransport: Send + Sync + std::fmt::Debug {
    /// Issue a GET request
    ///
    /// # Arguments
    ///
    /// * `url` - Absolute URL including any query string
    /// * `headers` - Extra request headers
    async fn get(&self, url: &str, headers: &Headers) -> Result<TransportResponse>;

    /// Issue a POST request with a raw body
    ///
    /// # Arguments
    ///
    /// * `url` - Absolute URL including any query string
    /// * `body` - Request body, sent as-is
    /// * `headers` - Extra request headers
    async fn post(&self, url: &str, body: Bytes, headers: &Headers) -> Result<TransportResponse>;
}

/// Build `base?k=v&...` with form-encoded parameters
///
/// # Errors
///
/// Returns [`ApiaryError::Config`] if `base` is not a valid URL.
pub fn url_with_params(base: &str, params: &[(&str, &str)]) -> Result<String> {
    let url = url::Url::parse_with_params(base, params)
        .map_err(|e| ApiaryError::Config(format!("Invalid endpoint URL {}: {}", base, e)))?;
    Ok(url.to_string())
}

pub mod http;

#[cfg(test)]
pub mod fake;
