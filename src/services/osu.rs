//! osu! player stats

use std::sync::Arc;

use crate::config::OsuConfig;
use crate::error::Result;
use crate::transport::{url_with_params, HttpTransport};

/// Client for the osu! user endpoint
#[derive(Debug, Clone)]
pub struct OsuClient {
    transport: Arc<dyn HttpTransport>,
    api_key: String,
    user_url: String,
}

impl OsuClient {
    /// Create a client from configuration
    pub fn new(config: &OsuConfig, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            transport,
            api_key: config.api_key.clone(),
            user_url: config.user_url.clone(),
        }
    }

    /// Raw user record(s) for a user name or id
    pub async fn user(&self, user: &str) -> Result<serde_json::Value> {
        let url = url_with_params(&self.user_url, &[("k", self.api_key.as_str()), ("u", user)])?;
        self.transport
            .get(&url, &[])
            .await?
            .error_for_status("osu user lookup")?
            .json()
    }
}
