//! `reqwest`-backed transport
//!
//! One shared client carries the cookie jar for the whole process, which is
//! what lets the chat-bot relay prime its cookies once and reuse them.

use std::time::Duration;

use bytes::Bytes;
use reqwest::Client;

use crate::error::{ApiaryError, Result};
use crate::transport::{Headers, HttpTransport, TransportResponse};

/// Production [`HttpTransport`] built on `reqwest`
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Create a transport with a cookie store and the given per-call timeout
    ///
    /// # Errors
    ///
    /// Returns error if HTTP client initialization fails
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .cookie_store(true)
            .build()
            .map_err(|e| ApiaryError::Transport(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }

    async fn finish(
        &self,
        request: reqwest::RequestBuilder,
        method: &str,
        url: &str,
        headers: &Headers,
    ) -> Result<TransportResponse> {
        let request = headers
            .iter()
            .fold(request, |req, (name, value)| req.header(name.as_str(), value.as_str()));

        let response = request.send().await.map_err(|e| {
            tracing::debug!("{} {} failed: {}", method, url, e);
            ApiaryError::Transport(format!("{} {} failed: {}", method, url, e))
        })?;

        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(|e| {
            ApiaryError::Transport(format!("Failed to read response body from {}: {}", url, e))
        })?;

        tracing::debug!("{} {} -> {} ({} bytes)", method, url, status, body.len());
        Ok(TransportResponse { status, body })
    }
}

#[async_trait::async_trait]
impl HttpTransport for ReqwestTransport {
    async fn get(&self, url: &str, headers: &Headers) -> Result<TransportResponse> {
        self.finish(self.client.get(url), "GET", url, headers).await
    }

    async fn post(&self, url: &str, body: Bytes, headers: &Headers) -> Result<TransportResponse> {
        self.finish(self.client.post(url).body(body), "POST", url, headers)
            .await
    }
}
