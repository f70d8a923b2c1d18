//! Conversation relay against a mock chat-bot service
//!
//! Drives `ConversationRelay` over the real `ReqwestTransport` so the wire
//! shape (path, headers, form body) is checked end to end.

use std::sync::Arc;
use std::time::Duration;

use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use apiary::config::RelayConfig;
use apiary::relay::ConversationRelay;
use apiary::transport::http::ReqwestTransport;
use apiary::ApiaryError;

mod common;

const BROWSER_UA: &str = "Mozilla/4.0 (compatible; MSIE 8.0; Windows NT 6.0)";

fn make_relay(base_url: &str) -> ConversationRelay {
    let config = RelayConfig {
        base_url: base_url.to_string(),
        timeout_seconds: 5,
        ..RelayConfig::default()
    };
    let transport = ReqwestTransport::new(Duration::from_secs(5)).expect("client builds");
    ConversationRelay::new(&config, Arc::new(transport))
}

async fn mount_root(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_ask_primes_once_and_posts_form() {
    let server = MockServer::start().await;
    mount_root(&server).await;

    Mock::given(method("POST"))
        .and(path("/webservicemin"))
        .and(query_param("uc", "165"))
        .and(header("user-agent", BROWSER_UA))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(common::relay_reply("Hi.", "TOK1")))
        .expect(2)
        .mount(&server)
        .await;

    let relay = make_relay(&server.uri());

    let first = relay.ask("hello", None).await.expect("first ask");
    assert_eq!(first.answer, "Hi.");

    let second = relay
        .ask("how are you?", Some(&first.session_id))
        .await
        .expect("second ask");
    assert_eq!(second.session_id, first.session_id);

    let posts: Vec<_> = server
        .received_requests()
        .await
        .expect("recording enabled")
        .into_iter()
        .filter(|r| r.method.as_str() == "POST")
        .collect();
    assert_eq!(posts.len(), 2);

    let first_body = String::from_utf8(posts[0].body.clone()).unwrap();
    assert!(first_body.starts_with("stimulus=hello&"));
    assert!(first_body.contains("icognocheck="));

    let second_body = String::from_utf8(posts[1].body.clone()).unwrap();
    assert!(second_body.contains("vText3=hello&vText2=Hi.&"));
    assert!(second_body.contains("sessionid=TOK1"));
}

#[tokio::test]
async fn test_reply_bytes_are_restored_to_utf8() {
    let server = MockServer::start().await;
    mount_root(&server).await;

    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200).set_body_bytes(common::relay_reply("Ça va, naïve?", "T")),
        )
        .mount(&server)
        .await;

    let reply = make_relay(&server.uri()).ask("salut", None).await.unwrap();
    assert_eq!(reply.answer, "Ça va, naïve?");
}

#[tokio::test]
async fn test_denial_surfaces_as_remote_denied() {
    let server = MockServer::start().await;
    mount_root(&server).await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(common::relay_reply("", "DENIED")))
        .mount(&server)
        .await;

    let relay = make_relay(&server.uri());
    let err = relay.ask("hello", Some("S1")).await.unwrap_err();
    assert!(matches!(
        err.downcast_ref::<ApiaryError>(),
        Some(ApiaryError::RemoteDenied)
    ));
    assert!(relay.session("S1").unwrap().unwrap().history.is_empty());
}

#[tokio::test]
async fn test_server_error_is_transport_error() {
    let server = MockServer::start().await;
    mount_root(&server).await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = make_relay(&server.uri()).ask("hello", None).await.unwrap_err();
    assert!(matches!(
        err.downcast_ref::<ApiaryError>(),
        Some(ApiaryError::Transport(_))
    ));
}

#[tokio::test]
async fn test_unreachable_service_fails_before_posting() {
    let relay = make_relay("http://127.0.0.1:9");
    let err = relay.ask("hello", None).await.unwrap_err();
    assert!(matches!(
        err.downcast_ref::<ApiaryError>(),
        Some(ApiaryError::Transport(_))
    ));
    assert_eq!(relay.session_count().unwrap(), 0);
}
