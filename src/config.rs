//! Configuration management for Apiary
//!
//! This module handles loading, parsing, validating, and managing
//! configuration from files, environment variables, and CLI overrides.

use crate::cli::{Cli, Commands};
use crate::error::{ApiaryError, Result};
use crate::relay::session::MAX_SESSION_TTL_MINUTES;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure for Apiary
///
/// Holds the listener settings, the chat-bot relay settings and the
/// endpoint/API-key table for every upstream service.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// HTTP listener configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Conversation relay configuration
    #[serde(default)]
    pub relay: RelayConfig,
    /// Upstream service endpoints and keys
    #[serde(default)]
    pub services: ServicesConfig,
}

/// HTTP listener configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Interface to bind
    #[serde(default = "default_server_host")]
    pub host: String,

    /// Port to bind
    #[serde(default = "default_server_port")]
    pub port: u16,

    /// Plain-text endpoint returning the caller's public address, logged at startup
    #[serde(default = "default_ip_lookup_url")]
    pub ip_lookup_url: String,
}

fn default_server_host() -> String {
    "0.0.0.0".to_string()
}

fn default_server_port() -> u16 {
    1234
}

fn default_ip_lookup_url() -> String {
    "http://ip.42.pl/raw".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_server_host(),
            port: default_server_port(),
            ip_lookup_url: default_ip_lookup_url(),
        }
    }
}

/// Chat-bot relay configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelayConfig {
    /// Scheme and host of the chat-bot service, without trailing slash
    #[serde(default = "default_relay_base_url")]
    pub base_url: String,

    /// Per-call timeout for relay requests (seconds)
    #[serde(default = "default_relay_timeout")]
    pub timeout_seconds: u64,

    /// Idle lifetime of a conversation session (minutes)
    #[serde(default = "default_session_ttl")]
    pub session_ttl_minutes: i64,

    /// Only overwrite a session's continuation token once it is already set.
    ///
    /// This mirrors what the upstream web client does; when disabled the
    /// token returned by every successful exchange is stored.
    #[serde(default)]
    pub strict_continuation: bool,
}

fn default_relay_base_url() -> String {
    "http://www.cleverbot.com".to_string()
}

fn default_relay_timeout() -> u64 {
    30
}

fn default_session_ttl() -> i64 {
    30
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            base_url: default_relay_base_url(),
            timeout_seconds: default_relay_timeout(),
            session_ttl_minutes: default_session_ttl(),
            strict_continuation: false,
        }
    }
}

/// Endpoint table for the single-round-trip services
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ServicesConfig {
    /// YouTube metadata lookups
    #[serde(default)]
    pub youtube: YoutubeConfig,
    /// Urban Dictionary definitions
    #[serde(default)]
    pub dictionary: DictionaryConfig,
    /// Insult generator page
    #[serde(default)]
    pub insult: InsultConfig,
    /// Paste service
    #[serde(default)]
    pub hastebin: HastebinConfig,
    /// osu! player stats
    #[serde(default)]
    pub osu: OsuConfig,
}

/// YouTube configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YoutubeConfig {
    /// Google API key used for search and video details
    #[serde(default)]
    pub api_key: String,

    /// oEmbed endpoint used for titles
    #[serde(default = "default_youtube_oembed_url")]
    pub oembed_url: String,

    /// Data API search endpoint
    #[serde(default = "default_youtube_search_url")]
    pub search_url: String,

    /// Data API videos endpoint
    #[serde(default = "default_youtube_videos_url")]
    pub videos_url: String,

    /// Thumbnail URL template, `{id}` is replaced with the video id
    #[serde(default = "default_youtube_thumbnail_url")]
    pub thumbnail_url: String,
}

fn default_youtube_oembed_url() -> String {
    "https://www.youtube.com/oembed".to_string()
}

fn default_youtube_search_url() -> String {
    "https://content.googleapis.com/youtube/v3/search".to_string()
}

fn default_youtube_videos_url() -> String {
    "https://www.googleapis.com/youtube/v3/videos".to_string()
}

fn default_youtube_thumbnail_url() -> String {
    "http://img.youtube.com/vi/{id}/maxresdefault.jpg".to_string()
}

impl Default for YoutubeConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            oembed_url: default_youtube_oembed_url(),
            search_url: default_youtube_search_url(),
            videos_url: default_youtube_videos_url(),
            thumbnail_url: default_youtube_thumbnail_url(),
        }
    }
}

/// Urban Dictionary configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DictionaryConfig {
    /// Definition lookup endpoint
    #[serde(default = "default_define_url")]
    pub define_url: String,
}

fn default_define_url() -> String {
    "http://api.urbandictionary.com/v0/define".to_string()
}

impl Default for DictionaryConfig {
    fn default() -> Self {
        Self {
            define_url: default_define_url(),
        }
    }
}

/// Insult generator configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsultConfig {
    /// Page that renders a fresh insult on every GET
    #[serde(default = "default_insult_url")]
    pub url: String,
}

fn default_insult_url() -> String {
    "http://www.insultgenerator.org/".to_string()
}

impl Default for InsultConfig {
    fn default() -> Self {
        Self {
            url: default_insult_url(),
        }
    }
}

/// Paste service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HastebinConfig {
    /// Base URL; documents are posted to `{base_url}/documents`
    #[serde(default = "default_hastebin_url")]
    pub base_url: String,
}

fn default_hastebin_url() -> String {
    "http://hastebin.com".to_string()
}

impl Default for HastebinConfig {
    fn default() -> Self {
        Self {
            base_url: default_hastebin_url(),
        }
    }
}

/// osu! API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OsuConfig {
    /// API key sent as the `k` parameter
    #[serde(default)]
    pub api_key: String,

    /// User lookup endpoint
    #[serde(default = "default_osu_user_url")]
    pub user_url: String,
}

fn default_osu_user_url() -> String {
    "https://osu.ppy.sh/api/get_user".to_string()
}

impl Default for OsuConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            user_url: default_osu_user_url(),
        }
    }
}

impl Config {
    /// Load configuration from file with environment and CLI overrides
    ///
    /// # Arguments
    ///
    /// * `path` - Path to configuration file
    /// * `cli` - CLI arguments for overrides
    ///
    /// # Returns
    ///
    /// Returns the loaded and merged configuration
    ///
    /// # Errors
    ///
    /// Returns error if file cannot be read or parsed
    pub fn load(path: &str, cli: &Cli) -> Result<Self> {
        let mut config = if Path::new(path).exists() {
            Self::from_file(path)?
        } else {
            tracing::warn!("Config file not found at {}, using defaults", path);
            Self::default()
        };

        config.apply_env_vars();
        config.apply_cli_overrides(cli);

        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ApiaryError::Config(format!("Failed to read config file: {}", e)))?;
        serde_yaml::from_str(&contents)
            .map_err(|e| ApiaryError::Config(format!("Failed to parse config: {}", e)).into())
    }

    fn apply_env_vars(&mut self) {
        if let Ok(host) = std::env::var("APIARY_SERVER_HOST") {
            tracing::debug!(host = %host, "Env override: APIARY_SERVER_HOST");
            self.server.host = host;
        }

        if let Ok(port) = std::env::var("APIARY_SERVER_PORT") {
            match port.parse::<u16>() {
                Ok(v) => {
                    self.server.port = v;
                    tracing::debug!(port = v, "Env override: APIARY_SERVER_PORT");
                }
                Err(_) => {
                    tracing::warn!("Invalid value for APIARY_SERVER_PORT: {}", port);
                }
            }
        }

        if let Ok(base_url) = std::env::var("APIARY_RELAY_BASE_URL") {
            tracing::debug!(base_url = %base_url, "Env override: APIARY_RELAY_BASE_URL");
            self.relay.base_url = base_url;
        }

        if let Ok(timeout) = std::env::var("APIARY_RELAY_TIMEOUT_SECONDS") {
            match timeout.parse::<u64>() {
                Ok(v) => {
                    self.relay.timeout_seconds = v;
                    tracing::debug!(
                        timeout_seconds = v,
                        "Env override: APIARY_RELAY_TIMEOUT_SECONDS"
                    );
                }
                Err(_) => {
                    tracing::warn!("Invalid value for APIARY_RELAY_TIMEOUT_SECONDS: {}", timeout);
                }
            }
        }

        if let Ok(strict) = std::env::var("APIARY_RELAY_STRICT_CONTINUATION") {
            match strict.parse::<bool>() {
                Ok(v) => {
                    self.relay.strict_continuation = v;
                    tracing::debug!(
                        strict_continuation = v,
                        "Env override: APIARY_RELAY_STRICT_CONTINUATION"
                    );
                }
                Err(_) => {
                    tracing::warn!(
                        "Invalid value for APIARY_RELAY_STRICT_CONTINUATION: {}",
                        strict
                    );
                }
            }
        }

        // Keys are never echoed into the logs
        if let Ok(key) = std::env::var("APIARY_YOUTUBE_API_KEY") {
            self.services.youtube.api_key = key;
            tracing::debug!("Env override: APIARY_YOUTUBE_API_KEY");
        }

        if let Ok(key) = std::env::var("APIARY_OSU_API_KEY") {
            self.services.osu.api_key = key;
            tracing::debug!("Env override: APIARY_OSU_API_KEY");
        }
    }

    fn apply_cli_overrides(&mut self, cli: &Cli) {
        if cli.verbose {
            tracing::debug!("Verbose mode enabled");
        }

        if let Commands::Serve { host, port } = &cli.command {
            if let Some(host) = host {
                self.server.host = host.clone();
            }
            if let Some(port) = port {
                self.server.port = *port;
            }
        }
    }

    /// Validate the configuration
    ///
    /// Ensures all configuration values are within acceptable ranges
    /// and that every endpoint is an http(s) URL.
    ///
    /// # Errors
    ///
    /// Returns error if any validation check fails
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(ApiaryError::Config("server.port must be greater than 0".to_string()).into());
        }

        if self.relay.timeout_seconds == 0 {
            return Err(ApiaryError::Config(
                "relay.timeout_seconds must be greater than 0".to_string(),
            )
            .into());
        }

        if self.relay.session_ttl_minutes <= 0 {
            return Err(ApiaryError::Config(
                "relay.session_ttl_minutes must be greater than 0".to_string(),
            )
            .into());
        }

        if self.relay.session_ttl_minutes > MAX_SESSION_TTL_MINUTES {
            return Err(ApiaryError::Config(format!(
                "relay.session_ttl_minutes cannot exceed {}",
                MAX_SESSION_TTL_MINUTES
            ))
            .into());
        }

        let endpoints = [
            ("server.ip_lookup_url", self.server.ip_lookup_url.as_str()),
            ("relay.base_url", self.relay.base_url.as_str()),
            (
                "services.youtube.oembed_url",
                self.services.youtube.oembed_url.as_str(),
            ),
            (
                "services.youtube.search_url",
                self.services.youtube.search_url.as_str(),
            ),
            (
                "services.youtube.videos_url",
                self.services.youtube.videos_url.as_str(),
            ),
            (
                "services.youtube.thumbnail_url",
                self.services.youtube.thumbnail_url.as_str(),
            ),
            (
                "services.dictionary.define_url",
                self.services.dictionary.define_url.as_str(),
            ),
            ("services.insult.url", self.services.insult.url.as_str()),
            (
                "services.hastebin.base_url",
                self.services.hastebin.base_url.as_str(),
            ),
            ("services.osu.user_url", self.services.osu.user_url.as_str()),
        ];

        for (name, value) in endpoints {
            validate_http_url(name, value)?;
        }

        Ok(())
    }
}

fn validate_http_url(name: &str, value: &str) -> Result<()> {
    let parsed = url::Url::parse(value)
        .map_err(|e| ApiaryError::Config(format!("{} is not a valid URL ({}): {}", name, value, e)))?;

    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(ApiaryError::Config(format!(
            "{} must use http or https, got scheme: {}",
            name, other
        ))
        .into()),
    }
}
