//! Unit tests for the HTTP notifier against a mocked messaging API

use std::time::Duration;

use signalhook::config::NotifyConfig;
use signalhook::notify::{webhook_summary, HttpNotifier, Notifier, NotifyError};
use url::Url;
use wiremock::matchers::{body_string, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn notifier_for(server: &MockServer) -> HttpNotifier {
    let endpoint = Url::parse(&format!("{}/api/notify", server.uri())).unwrap();
    HttpNotifier::new(&NotifyConfig {
        endpoint,
        timeout: Duration::from_secs(5),
    })
    .unwrap()
}

#[tokio::test]
async fn posts_form_encoded_message_with_bearer_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/notify"))
        .and(header("authorization", "Bearer abc123"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(body_string("message=hello+world"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let notifier = notifier_for(&server);
    notifier.notify("abc123", "hello world").await.unwrap();
}

#[tokio::test]
async fn non_success_status_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let notifier = notifier_for(&server);
    let err = notifier.notify("bad", "hello").await.unwrap_err();
    assert!(matches!(err, NotifyError::Status(status) if status.as_u16() == 401));
}

#[tokio::test]
async fn unreachable_endpoint_is_a_transport_error() {
    let notifier = HttpNotifier::with_client(
        Url::parse("http://127.0.0.1:1/api/notify").unwrap(),
        reqwest::Client::new(),
    );

    let err = notifier.notify("t", "hello").await.unwrap_err();
    assert!(matches!(err, NotifyError::Transport(_)));
}

#[test]
fn webhook_summary_embeds_payload_in_posted_order() {
    let payload = serde_json::json!({"symbol": "BTCUSD", "price": 50000, "action": "buy"});
    let summary = webhook_summary(payload.as_object().unwrap());
    assert_eq!(
        summary,
        r#"Received a new TradingView alert: {"symbol":"BTCUSD","price":50000,"action":"buy"}"#
    );
}
