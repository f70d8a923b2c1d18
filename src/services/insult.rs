//! Insult generator scraper
//!
//! The generator has no API; the insult is the text content of the page's
//! `<div class="wrap">` element.

use std::sync::{Arc, OnceLock};

use regex::Regex;

use crate::config::InsultConfig;
use crate::error::{ApiaryError, Result};
use crate::transport::HttpTransport;

fn wrap_div() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?is)<div[^>]*class\s*=\s*["']wrap["'][^>]*>(.*?)</div>"#)
            .expect("wrap div pattern is valid")
    })
}

fn tag() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)<[^>]*>").expect("tag pattern is valid"))
}

/// Pull the insult text out of the generator page
///
/// Returns `None` when the page has no `wrap` div or it is empty.
pub fn extract_insult(html: &str) -> Option<String> {
    let inner = wrap_div().captures(html)?.get(1)?.as_str();
    let text = tag().replace_all(inner, "");
    let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
    (!text.is_empty()).then_some(text)
}

/// Fetches a fresh insult on every call
#[derive(Debug, Clone)]
pub struct InsultClient {
    transport: Arc<dyn HttpTransport>,
    url: String,
}

impl InsultClient {
    /// Create a client from configuration
    pub fn new(config: &InsultConfig, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            transport,
            url: config.url.clone(),
        }
    }

    /// Generate one insult
    ///
    /// # Errors
    ///
    /// Returns [`ApiaryError::Upstream`] when the page layout no longer
    /// contains the insult.
    pub async fn generate(&self) -> Result<String> {
        let page = self
            .transport
            .get(&self.url, &[])
            .await?
            .error_for_status("insult generator")?
            .text();

        extract_insult(&page).ok_or_else(|| {
            ApiaryError::Upstream("insult page has no wrap element".to_string()).into()
        })
    }
}
