//! In-process fake transport for unit tests
//!
//! [`FakeTransport`] records every request the code under test makes and
//! replays canned responses queued by the test.
//!
//! GET and POST have separate queues. An empty GET queue answers `200` with
//! an empty body (handy for the relay's cookie priming call); an empty POST
//! queue fails with [`ApiaryError::Transport`].
//!
//! # Example
//!
//! ```ignore
//! let transport = FakeTransport::new();
//! transport.push_post(TransportResponse::new(200, "hi\rT1\r\r\r\r\r\r"));
//! // ... drive the code under test ...
//! let sent = transport.requests();
//! assert_eq!(sent.last().unwrap().method, "POST");
//! ```

use std::collections::VecDeque;
use std::sync::Mutex;

use bytes::Bytes;

use crate::error::{ApiaryError, Result};
use crate::transport::{Headers, HttpTransport, TransportResponse};

/// One request observed by the fake
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// `GET` or `POST`
    pub method: String,
    /// Full URL
    pub url: String,
    /// Headers exactly as passed in
    pub headers: Vec<(String, String)>,
    /// Body (empty for GET)
    pub body: Bytes,
}

impl RecordedRequest {
    /// Body as UTF-8 text
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Value of the first header with this name (case-insensitive)
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

type Canned = std::result::Result<TransportResponse, String>;

/// In-process fake implementing [`HttpTransport`]
#[derive(Debug, Default)]
pub struct FakeTransport {
    requests: Mutex<Vec<RecordedRequest>>,
    get_responses: Mutex<VecDeque<Canned>>,
    post_responses: Mutex<VecDeque<Canned>>,
}

impl FakeTransport {
    /// Create an empty fake
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the response for the next GET
    pub fn push_get(&self, response: TransportResponse) {
        self.get_responses.lock().unwrap().push_back(Ok(response));
    }

    /// Make the next GET fail at the transport level
    pub fn push_get_error(&self, message: &str) {
        self.get_responses
            .lock()
            .unwrap()
            .push_back(Err(message.to_string()));
    }

    /// Queue the response for the next POST
    pub fn push_post(&self, response: TransportResponse) {
        self.post_responses.lock().unwrap().push_back(Ok(response));
    }

    /// Make the next POST fail at the transport level
    pub fn push_post_error(&self, message: &str) {
        self.post_responses
            .lock()
            .unwrap()
            .push_back(Err(message.to_string()));
    }

    /// Snapshot of every request made so far
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Only the requests made with `method`
    pub fn requests_with_method(&self, method: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.method == method)
            .collect()
    }

    fn record(&self, method: &str, url: &str, body: Bytes, headers: &Headers) {
        self.requests.lock().unwrap().push(RecordedRequest {
            method: method.to_string(),
            url: url.to_string(),
            headers: headers.to_vec(),
            body,
        });
    }
}

fn into_result(canned: Canned) -> Result<TransportResponse> {
    canned.map_err(|msg| ApiaryError::Transport(msg).into())
}

#[async_trait::async_trait]
impl HttpTransport for FakeTransport {
    async fn get(&self, url: &str, headers: &Headers) -> Result<TransportResponse> {
        self.record("GET", url, Bytes::new(), headers);
        let next = self.get_responses.lock().unwrap().pop_front();
        match next {
            Some(canned) => into_result(canned),
            None => Ok(TransportResponse::new(200, Bytes::new())),
        }
    }

    async fn post(&self, url: &str, body: Bytes, headers: &Headers) -> Result<TransportResponse> {
        self.record("POST", url, body, headers);
        let next = self.post_responses.lock().unwrap().pop_front();
        match next {
            Some(canned) => into_result(canned),
            None => Err(ApiaryError::Transport(format!(
                "FakeTransport: no POST response queued for {}",
                url
            ))
            .into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_get_defaults_to_empty_ok() {
        let transport = FakeTransport::new();
        let resp = transport.get("http://host/", &[]).await.unwrap();
        assert_eq!(resp.status, 200);
        assert!(resp.body.is_empty());
    }

    #[tokio::test]
    async fn test_post_without_queue_fails() {
        let transport = FakeTransport::new();
        assert!(transport
            .post("http://host/x", Bytes::new(), &[])
            .await
            .is_err());
    }

    #[tokio::test]
    async fn test_records_requests_in_order() {
        let transport = FakeTransport::new();
        transport.push_post(TransportResponse::new(201, "ok"));

        let headers = vec![("Referer".to_string(), "http://host/".to_string())];
        transport.get("http://host/", &[]).await.unwrap();
        transport
            .post("http://host/x", Bytes::from_static(b"a=1"), &headers)
            .await
            .unwrap();

        let requests = transport.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].method, "GET");
        assert_eq!(requests[1].body_text(), "a=1");
        assert_eq!(requests[1].header("referer"), Some("http://host/"));
    }

    #[tokio::test]
    async fn test_queued_error_is_transport_error() {
        let transport = FakeTransport::new();
        transport.push_post_error("boom");
        let err = transport
            .post("http://host/x", Bytes::new(), &[])
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ApiaryError>(),
            Some(ApiaryError::Transport(msg)) if msg == "boom"
        ));
    }
}
