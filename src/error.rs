//! Error types for Apiary
//!
//! This module defines all error types used throughout the application,
//! using `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Main error type for Apiary operations
///
/// This enum covers configuration loading, the conversation relay,
/// outbound transport failures and the individual upstream services.
#[derive(Error, Debug)]
pub enum ApiaryError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// The chat-bot upstream refused the exchange (it flagged us as automated)
    #[error("Remote service denied the request")]
    RemoteDenied,

    /// Network or transport-level failure (timeout, refused, non-2xx)
    #[error("Transport error: {0}")]
    Transport(String),

    /// Upstream reply did not have the expected record/field shape
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// An upstream service answered with something we cannot use
    #[error("Upstream error: {0}")]
    Upstream(String),

    /// Caller-supplied input was rejected before any request was made
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Lookup succeeded but returned nothing
    #[error("Not found: {0}")]
    NotFound(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Result type alias for Apiary operations
///
/// Uses `anyhow::Error` so callers keep context while propagating; the HTTP
/// layer downcasts to [`ApiaryError`] to pick a status code.
pub type Result<T> = anyhow::Result<T>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let error = ApiaryError::Config("invalid format".to_string());
        assert_eq!(error.to_string(), "Configuration error: invalid format");
    }

    #[test]
    fn test_remote_denied_display() {
        let error = ApiaryError::RemoteDenied;
        assert_eq!(error.to_string(), "Remote service denied the request");
    }

    #[test]
    fn test_transport_error_display() {
        let error = ApiaryError::Transport("connection refused".to_string());
        assert_eq!(error.to_string(), "Transport error: connection refused");
    }

    #[test]
    fn test_malformed_response_display() {
        let error = ApiaryError::MalformedResponse("no records".to_string());
        assert_eq!(error.to_string(), "Malformed response: no records");
    }

    #[test]
    fn test_not_found_display() {
        let error = ApiaryError::NotFound("no definition for foo".to_string());
        assert_eq!(error.to_string(), "Not found: no definition for foo");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let error: ApiaryError = io_error.into();
        assert!(matches!(error, ApiaryError::Io(_)));
    }

    #[test]
    fn test_json_error_conversion() {
        let json_error = serde_json::from_str::<serde_json::Value>("{invalid json}").unwrap_err();
        let error: ApiaryError = json_error.into();
        assert!(matches!(error, ApiaryError::Serialization(_)));
    }

    #[test]
    fn test_yaml_error_conversion() {
        let yaml_error = serde_yaml::from_str::<serde_yaml::Value>("invalid: : yaml").unwrap_err();
        let error: ApiaryError = yaml_error.into();
        assert!(matches!(error, ApiaryError::Yaml(_)));
    }

    #[test]
    fn test_downcast_through_anyhow() {
        let err: anyhow::Error = ApiaryError::RemoteDenied.into();
        assert!(matches!(
            err.downcast_ref::<ApiaryError>(),
            Some(ApiaryError::RemoteDenied)
        ));
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ApiaryError>();
    }
}
