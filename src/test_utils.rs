//! Test utilities for Apiary
//!
//! Shared fixtures for unit tests: temporary config files, canned relay
//! replies and error assertions.

use crate::config::Config;
use crate::error::{ApiaryError, Result};
use crate::relay::decoder::RECORD_SEPARATOR;
use std::path::PathBuf;
use tempfile::TempDir;

/// Create a temporary directory for testing
///
/// The directory is removed when the returned `TempDir` is dropped.
pub fn temp_dir() -> TempDir {
    TempDir::new().expect("Failed to create temporary directory")
}

/// Write `content` to `name` inside `dir` and return its path
///
/// # Panics
///
/// Panics if the file cannot be written
pub fn create_test_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).expect("Failed to write test file");
    path
}

/// Assert that a result failed with a message containing `expected`
///
/// # Panics
///
/// Panics if the result is Ok or the message does not match
pub fn assert_error_contains<T>(result: Result<T>, expected: &str) {
    match result {
        Ok(_) => panic!("Expected error containing '{}' but got Ok", expected),
        Err(e) => {
            let error_msg = e.to_string();
            assert!(
                error_msg.contains(expected),
                "Error message '{}' does not contain '{}'",
                error_msg,
                expected
            );
        }
    }
}

/// Downcast an anyhow error to the crate error, panicking if it is foreign
pub fn apiary_error(err: &anyhow::Error) -> &ApiaryError {
    err.downcast_ref::<ApiaryError>()
        .unwrap_or_else(|| panic!("Expected ApiaryError, got: {:#}", err))
}

/// A relay reply body with one record carrying `answer` and `token`
///
/// Mirrors the upstream layout: fields split by `\r`, records terminated by
/// the six-`\r` separator (so the final split element is empty).
pub fn response_fixture(answer: &str, token: &str) -> String {
    format!("{}\r{}{}", answer, token, RECORD_SEPARATOR)
}

/// Default configuration, validated
pub fn test_config() -> Config {
    Config::default()
}

/// YAML for a configuration pointing every upstream at `base`
pub fn test_config_yaml(base: &str) -> String {
    format!(
        r#"
server:
  host: 127.0.0.1
  port: 8080
  ip_lookup_url: {base}/ip

relay:
  base_url: {base}
  timeout_seconds: 5

services:
  youtube:
    api_key: test-key
    oembed_url: {base}/oembed
    search_url: {base}/search
    videos_url: {base}/videos
  dictionary:
    define_url: {base}/define
  insult:
    url: {base}/insult
  hastebin:
    base_url: {base}
  osu:
    api_key: test-key
    user_url: {base}/get_user
"#,
        base = base
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_test_file() {
        let dir = temp_dir();
        let path = create_test_file(&dir, "test.txt", "content");
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "content");
    }

    #[test]
    fn test_assert_error_contains_success() {
        let result: Result<()> = Err(ApiaryError::Config("test error message".to_string()).into());
        assert_error_contains(result, "test error");
    }

    #[test]
    #[should_panic(expected = "Expected error containing")]
    fn test_assert_error_contains_ok() {
        assert_error_contains(Ok(()), "error");
    }

    #[test]
    fn test_apiary_error_downcast() {
        let err: anyhow::Error = ApiaryError::RemoteDenied.into();
        assert!(matches!(apiary_error(&err), ApiaryError::RemoteDenied));
    }

    #[test]
    fn test_response_fixture_layout() {
        assert_eq!(response_fixture("hi", "T1"), "hi\rT1\r\r\r\r\r\r");
    }

    #[test]
    fn test_test_config_yaml_parses_and_validates() {
        let config: Config = serde_yaml::from_str(&test_config_yaml("http://127.0.0.1:9")).unwrap();
        assert_eq!(config.relay.base_url, "http://127.0.0.1:9");
        assert_eq!(config.services.osu.user_url, "http://127.0.0.1:9/get_user");
        assert!(config.validate().is_ok());
        assert!(test_config().validate().is_ok());
    }
}
