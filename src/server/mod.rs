//! HTTP server
//!
//! Builds the axum router over one shared [`AppState`] and runs it until
//! Ctrl-C. Routes:
//!
//! | Route | Query | Body |
//! |---|---|---|
//! | `GET /` | | `{"version","name"}` |
//! | `GET /youtube` | `url` or `search` | video info |
//! | `GET /define` | `term` | `{"term","definition"}` |
//! | `GET /hastebin` | `data` | `{"url"}` |
//! | `GET /cleverbot` | `ask`, `session` | `{"response","session"}` |
//! | `GET /insult` | | `{"insult"}` |
//! | `GET /osu_user` | `u` | upstream JSON |

pub mod handlers;
pub mod response;

use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::routing::get;
use axum::Router;

use crate::config::Config;
use crate::error::{ApiaryError, Result};
use crate::relay::ConversationRelay;
use crate::services::{DictionaryClient, HastebinClient, InsultClient, OsuClient, YoutubeClient};
use crate::transport::http::ReqwestTransport;
use crate::transport::HttpTransport;

use handlers::ServerInfo;

/// Shared state handed to every handler
#[derive(Debug, Clone)]
pub struct AppState {
    pub info: Arc<ServerInfo>,
    pub relay: Arc<ConversationRelay>,
    pub youtube: YoutubeClient,
    pub dictionary: DictionaryClient,
    pub insult: InsultClient,
    pub hastebin: HastebinClient,
    pub osu: OsuClient,
}

impl AppState {
    /// Build every client over one transport
    pub fn new(config: &Config, transport: Arc<dyn HttpTransport>) -> Self {
        let services = &config.services;
        Self {
            info: Arc::new(ServerInfo::default()),
            relay: Arc::new(ConversationRelay::new(&config.relay, transport.clone())),
            youtube: YoutubeClient::new(&services.youtube, transport.clone()),
            dictionary: DictionaryClient::new(&services.dictionary, transport.clone()),
            insult: InsultClient::new(&services.insult, transport.clone()),
            hastebin: HastebinClient::new(&services.hastebin, transport.clone()),
            osu: OsuClient::new(&services.osu, transport),
        }
    }
}

/// Route table
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/youtube", get(handlers::youtube))
        .route("/define", get(handlers::define))
        .route("/hastebin", get(handlers::hastebin))
        .route("/cleverbot", get(handlers::cleverbot))
        .route("/insult", get(handlers::insult))
        .route("/osu_user", get(handlers::osu_user))
        .with_state(state)
}

/// Bind, log the addresses we are reachable on, and serve until Ctrl-C
///
/// # Errors
///
/// Returns error if the transport cannot be built or the address cannot be
/// bound
pub async fn serve(config: Config) -> Result<()> {
    let transport: Arc<dyn HttpTransport> = Arc::new(ReqwestTransport::new(Duration::from_secs(
        config.relay.timeout_seconds,
    ))?);

    let state = AppState::new(&config, transport.clone());
    let app = router(state);

    let listener =
        tokio::net::TcpListener::bind((config.server.host.as_str(), config.server.port))
            .await
            .map_err(|e| {
                ApiaryError::Config(format!(
                    "Cannot listen on {}:{}: {}",
                    config.server.host, config.server.port, e
                ))
            })?;
    tracing::info!("Server listening on {}", listener.local_addr()?);

    tokio::spawn(log_network_info(
        transport,
        config.server.ip_lookup_url.clone(),
    ));

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

/// Address of the interface used for outbound traffic
///
/// Connecting a UDP socket sends nothing; it only asks the OS to pick a
/// route.
pub async fn lan_address() -> Result<IpAddr> {
    let socket = tokio::net::UdpSocket::bind("0.0.0.0:0").await?;
    socket.connect("8.8.8.8:53").await?;
    Ok(socket.local_addr()?.ip())
}

/// Public address as reported by `lookup_url`
pub async fn public_address(transport: &dyn HttpTransport, lookup_url: &str) -> Result<String> {
    let response = transport
        .get(lookup_url, &[])
        .await?
        .error_for_status("public address lookup")?;
    Ok(response.text().trim().to_string())
}

async fn log_network_info(transport: Arc<dyn HttpTransport>, lookup_url: String) {
    match lan_address().await {
        Ok(ip) => tracing::info!("LAN IP: {}", ip),
        Err(e) => tracing::warn!("Could not determine LAN IP: {:#}", e),
    }

    match public_address(transport.as_ref(), &lookup_url).await {
        Ok(ip) => tracing::info!("Public IP: {}", ip),
        Err(e) => tracing::warn!("Could not determine public IP: {:#}", e),
    }
}
