//! Route handlers
//!
//! Every handler pulls its parameters from the query string. A missing
//! required parameter yields the bare `404 Error` response.

use std::collections::HashMap;

use axum::extract::{Query, State};
use axum::response::Response;
use serde::Serialize;

use super::response::{not_found, ok, ApiResult};
use super::AppState;

type Params = Query<HashMap<String, String>>;

/// Service banner served at `/`
#[derive(Debug, Clone, Serialize)]
pub struct ServerInfo {
    pub version: String,
    pub name: String,
}

impl Default for ServerInfo {
    fn default() -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            name: "Apiary REST facade".to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
struct Definition<'a> {
    term: &'a str,
    definition: String,
}

#[derive(Debug, Serialize)]
struct ChatReply {
    response: String,
    session: String,
}

pub async fn index(State(state): State<AppState>) -> Response {
    ok(&*state.info)
}

/// `search` wins when both `url` and `search` are given
pub async fn youtube(State(state): State<AppState>, Query(params): Params) -> ApiResult {
    let (query, search) = match (params.get("search"), params.get("url")) {
        (Some(search), _) => (search, true),
        (None, Some(url)) => (url, false),
        (None, None) => return Ok(not_found()),
    };

    let info = state.youtube.info(query, search).await?;
    Ok(ok(&info))
}

pub async fn define(State(state): State<AppState>, Query(params): Params) -> ApiResult {
    let Some(term) = params.get("term") else {
        return Ok(not_found());
    };

    let definition = state.dictionary.define(term).await?;
    Ok(ok(&Definition { term, definition }))
}

pub async fn hastebin(State(state): State<AppState>, Query(params): Params) -> ApiResult {
    let Some(data) = params.get("data") else {
        return Ok(not_found());
    };

    let url = state.hastebin.post(data).await?;
    Ok(ok(&serde_json::json!({ "url": url })))
}

pub async fn cleverbot(State(state): State<AppState>, Query(params): Params) -> ApiResult {
    let Some(question) = params.get("ask") else {
        return Ok(not_found());
    };

    let reply = state
        .relay
        .ask(question, params.get("session").map(String::as_str))
        .await?;

    Ok(ok(&ChatReply {
        response: reply.answer,
        session: reply.session_id,
    }))
}

pub async fn insult(State(state): State<AppState>) -> ApiResult {
    let insult = state.insult.generate().await?;
    Ok(ok(&serde_json::json!({ "insult": insult })))
}

/// Any failure collapses into the plain 404
pub async fn osu_user(State(state): State<AppState>, Query(params): Params) -> Response {
    let Some(user) = params.get("u") else {
        return not_found();
    };

    match state.osu.user(user).await {
        Ok(data) => ok(&data),
        Err(e) => {
            tracing::warn!("osu lookup for {} failed: {:#}", user, e);
            not_found()
        }
    }
}
