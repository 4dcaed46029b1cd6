//! Integration tests for the intake server
//!
//! Webhook intake, listing, bulk delete, and notification behavior.


use std::sync::Arc;

use axum::http::{HeaderName, HeaderValue};
use serde_json::{json, Value};
use signalhook::storage::FileAlertStore;

use test_utils::TestIntakeServer;

#[tokio::test]
async fn webhook_acknowledges_and_notifies_with_payload() {
    let app = TestIntakeServer::new().await;

    let response = app
        .server
        .post("/webhook")
        .json(&json!({"symbol": "BTCUSD", "price": 50000}))
        .await;
    assert_eq!(response.status_code(), 200);

    let body: Value = response.json();
    assert_eq!(body, json!({"message": "Alert received and notification sent."}));

    let messages = app.notification_messages().await;
    assert_eq!(messages.len(), 1);
    assert!(messages[0].contains("BTCUSD"), "got {:?}", messages[0]);
    assert!(messages[0].starts_with("Received a new TradingView alert:"));
}

#[tokio::test]
async fn alerts_are_returned_in_post_order() {
    let app = TestIntakeServer::new().await;

    let payloads = vec![
        json!({"symbol": "BTCUSD", "side": "buy"}),
        json!({}),
        json!({"symbol": "ETHUSD", "nested": {"tf": "1h", "levels": [1, 2, 3]}}),
    ];
    for payload in &payloads {
        let response = app.server.post("/webhook").json(payload).await;
        assert_eq!(response.status_code(), 200);
    }

    let response = app.server.get("/alerts").await;
    assert_eq!(response.status_code(), 200);
    let stored: Vec<Value> = response.json();
    assert_eq!(stored, payloads);
}

#[tokio::test]
async fn alerts_start_empty() {
    let app = TestIntakeServer::new().await;

    let stored: Vec<Value> = app.server.get("/alerts").await.json();
    assert!(stored.is_empty());
}

#[tokio::test]
async fn delete_clears_all_alerts() {
    let app = TestIntakeServer::new().await;
    for i in 0..3 {
        app.server.post("/webhook").json(&json!({"n": i})).await;
    }

    let response = app.server.delete("/alerts").await;
    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(body, json!({"message": "All alerts deleted."}));

    let stored: Vec<Value> = app.server.get("/alerts").await.json();
    assert!(stored.is_empty());

    // Deleting an already-empty store is still fine.
    let response = app.server.delete("/alerts").await;
    assert_eq!(response.status_code(), 200);
}

#[tokio::test]
async fn webhook_rejects_non_object_body() {
    let app = TestIntakeServer::new().await;

    let response = app.server.post("/webhook").json(&json!([1, 2, 3])).await;
    assert_eq!(response.status_code(), 422);
    let body: Value = response.json();
    assert_eq!(body["fields"][0]["field"], "body");

    let stored: Vec<Value> = app.server.get("/alerts").await.json();
    assert!(stored.is_empty());
    assert!(app.notification_messages().await.is_empty());
}

#[tokio::test]
async fn webhook_rejects_malformed_json() {
    let app = TestIntakeServer::new().await;

    let response = app
        .server
        .post("/webhook")
        .content_type("application/json")
        .bytes("{not json".into())
        .await;
    assert_eq!(response.status_code(), 422);
    let body: Value = response.json();
    assert_eq!(body["error"], "validation failed");
    assert_eq!(body["fields"][0]["field"], "body");
}

#[tokio::test]
async fn failed_notification_still_stores_alert() {
    let app = TestIntakeServer::with_failing_messaging_api().await;

    let response = app
        .server
        .post("/webhook")
        .json(&json!({"symbol": "BTCUSD"}))
        .await;
    assert_eq!(response.status_code(), 200);

    let body: Value = response.json();
    assert_eq!(body["message"], "Alert received and notification sent.");
    assert!(body["warning"].as_str().unwrap().contains("500"));

    let stored: Vec<Value> = app.server.get("/alerts").await.json();
    assert_eq!(stored, vec![json!({"symbol": "BTCUSD"})]);
    assert_eq!(app.metrics.notifications_failed_total.get(), 1);
}

#[tokio::test]
async fn file_store_backs_the_intake_router() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("alerts.json");
    let app = TestIntakeServer::with_store(Arc::new(FileAlertStore::new(&path))).await;

    app.server.post("/webhook").json(&json!({"a": 1})).await;
    app.server.post("/webhook").json(&json!({"b": 2})).await;

    let on_disk: Vec<Value> =
        serde_json::from_slice(&std::fs::read(&path).expect("alert file")).expect("json array");
    assert_eq!(on_disk, vec![json!({"a": 1}), json!({"b": 2})]);

    app.server.delete("/alerts").await;
    let on_disk: Vec<Value> =
        serde_json::from_slice(&std::fs::read(&path).expect("alert file")).expect("json array");
    assert!(on_disk.is_empty());
}

#[tokio::test]
async fn health_and_metrics_are_exposed() {
    let app = TestIntakeServer::new().await;

    let response = app.server.get("/health").await;
    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "signalhook-intake");

    app.server.post("/webhook").json(&json!({"x": 1})).await;

    let response = app.server.get("/metrics").await;
    assert_eq!(response.status_code(), 200);
    let text = response.text();
    assert!(text.contains("http_requests_total"));
    assert!(text.contains("alerts_received_total 1"));
    assert!(text.contains("notifications_sent_total 1"));
}

#[tokio::test]
async fn cors_allows_any_origin_with_credentials() {
    let app = TestIntakeServer::new().await;

    let response = app
        .server
        .get("/alerts")
        .add_header(
            HeaderName::from_static("origin"),
            HeaderValue::from_static("https://charts.example.com"),
        )
        .await;
    assert_eq!(
        response.header("access-control-allow-origin"),
        "https://charts.example.com"
    );
    assert_eq!(response.header("access-control-allow-credentials"), "true");
}

#[tokio::test]
async fn stored_alert_and_notification_keep_posted_key_order() {
    let app = TestIntakeServer::new().await;
    let raw = r#"{"ticker":"BTCUSD","action":"buy","price":1}"#;

    let response = app
        .server
        .post("/webhook")
        .content_type("application/json")
        .bytes(raw.into())
        .await;
    assert_eq!(response.status_code(), 200);

    let listed = app.server.get("/alerts").await;
    assert_eq!(listed.text(), format!("[{}]", raw));

    let messages = app.notification_messages().await;
    assert_eq!(
        messages,
        vec![format!("Received a new TradingView alert: {}", raw)]
    );
}
