//! Urban Dictionary lookups

use std::sync::Arc;

use serde::Deserialize;

use crate::config::DictionaryConfig;
use crate::error::{ApiaryError, Result};
use crate::transport::{url_with_params, HttpTransport};

#[derive(Debug, Deserialize)]
struct DefineResponse {
    #[serde(default)]
    list: Vec<DefineEntry>,
}

#[derive(Debug, Deserialize)]
struct DefineEntry {
    definition: String,
}

/// Client for the definition endpoint
#[derive(Debug, Clone)]
pub struct DictionaryClient {
    transport: Arc<dyn HttpTransport>,
    define_url: String,
}

impl DictionaryClient {
    /// Create a client from configuration
    pub fn new(config: &DictionaryConfig, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            transport,
            define_url: config.define_url.clone(),
        }
    }

    /// Top definition for `term`
    ///
    /// # Errors
    ///
    /// Returns [`ApiaryError::NotFound`] when the term has no definitions,
    /// or a transport/serialization error when the lookup fails.
    pub async fn define(&self, term: &str) -> Result<String> {
        let url = url_with_params(&self.define_url, &[("term", term)])?;
        let response = self
            .transport
            .get(&url, &[])
            .await?
            .error_for_status("dictionary lookup")?;

        let parsed: DefineResponse = response.json()?;
        parsed
            .list
            .into_iter()
            .next()
            .map(|entry| entry.definition)
            .ok_or_else(|| ApiaryError::NotFound(format!("no definition for {}", term)).into())
    }
}
