//! Paste service client

use std::sync::Arc;

use bytes::Bytes;
use serde::Deserialize;

use crate::config::HastebinConfig;
use crate::error::Result;
use crate::transport::HttpTransport;

#[derive(Debug, Deserialize)]
struct DocumentResponse {
    key: String,
}

/// Posts documents and hands back their public URL
#[derive(Debug, Clone)]
pub struct HastebinClient {
    transport: Arc<dyn HttpTransport>,
    base_url: String,
}

impl HastebinClient {
    /// Create a client from configuration
    pub fn new(config: &HastebinConfig, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            transport,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Store `data` and return `{base_url}/{key}`
    pub async fn post(&self, data: &str) -> Result<String> {
        let url = format!("{}/documents", self.base_url);
        let response = self
            .transport
            .post(&url, Bytes::from(data.to_string()), &[])
            .await?
            .error_for_status("hastebin post")?;

        let document: DocumentResponse = response.json()?;
        tracing::debug!("Stored paste {}", document.key);
        Ok(format!("{}/{}", self.base_url, document.key))
    }
}
