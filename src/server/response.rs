//! Response envelopes and error-to-status mapping

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::error::ApiaryError;

/// Content type of every JSON response
pub const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// Serialize `value` as a JSON response with `status`
pub fn json_response<T: Serialize>(status: StatusCode, value: &T) -> Response {
    match serde_json::to_vec(value) {
        Ok(body) => (status, [(header::CONTENT_TYPE, JSON_CONTENT_TYPE)], body).into_response(),
        Err(e) => {
            tracing::error!("Failed to serialize response: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Error").into_response()
        }
    }
}

/// `200 OK` with a JSON body
pub fn ok<T: Serialize>(value: &T) -> Response {
    json_response(StatusCode::OK, value)
}

/// The bare `404` returned when a required query parameter is missing
pub fn not_found() -> Response {
    (StatusCode::NOT_FOUND, "Error").into_response()
}

/// Status code for a failed upstream operation
pub fn status_for(err: &anyhow::Error) -> StatusCode {
    match err.downcast_ref::<ApiaryError>() {
        Some(ApiaryError::RemoteDenied) => StatusCode::SERVICE_UNAVAILABLE,
        Some(ApiaryError::InvalidInput(_)) => StatusCode::BAD_REQUEST,
        Some(ApiaryError::NotFound(_)) => StatusCode::NOT_FOUND,
        Some(ApiaryError::Config(_)) | Some(ApiaryError::Io(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
        _ => StatusCode::BAD_GATEWAY,
    }
}

/// Handler error rendered as `{"error": "<message>"}`
#[derive(Debug)]
pub struct ApiError(anyhow::Error);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = status_for(&self.0);
        if status.is_server_error() {
            tracing::warn!(status = status.as_u16(), "Request failed: {:#}", self.0);
        } else {
            tracing::debug!(status = status.as_u16(), "Request rejected: {:#}", self.0);
        }
        json_response(status, &serde_json::json!({ "error": self.0.to_string() }))
    }
}

impl<E> From<E> for ApiError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

/// Result type returned by route handlers
pub type ApiResult = std::result::Result<Response, ApiError>;
