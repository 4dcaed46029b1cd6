//! Unit tests for the JSON-array file store

use std::sync::Arc;

use serde_json::{json, Value};
use signalhook::error::StorageError;
use signalhook::models::AlertPayload;
use signalhook::storage::{AlertStore, FileAlertStore};
use tempfile::TempDir;
use tokio_test::assert_ok;

fn payload(value: Value) -> AlertPayload {
    value.as_object().cloned().expect("object payload")
}

fn store_in(dir: &TempDir) -> FileAlertStore {
    FileAlertStore::new(dir.path().join("alerts.json"))
}

#[tokio::test]
async fn missing_file_reads_as_empty() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(&dir);

    let alerts = assert_ok!(store.read_all().await);
    assert!(alerts.is_empty());
    assert!(!store.path().exists());
}

#[tokio::test]
async fn appends_persist_across_instances() {
    let dir = tempfile::tempdir().unwrap();

    let store = store_in(&dir);
    assert_ok!(store.append(payload(json!({"symbol": "BTCUSD"}))).await);
    assert_ok!(store.append(payload(json!({"symbol": "ETHUSD"}))).await);

    let reopened = store_in(&dir);
    let alerts = assert_ok!(reopened.read_all().await);
    assert_eq!(
        alerts,
        vec![
            payload(json!({"symbol": "BTCUSD"})),
            payload(json!({"symbol": "ETHUSD"}))
        ]
    );
}

#[tokio::test]
async fn clear_writes_an_empty_array() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(&dir);
    assert_ok!(store.append(payload(json!({"a": 1}))).await);

    assert_ok!(store.clear().await);

    let raw = std::fs::read_to_string(store.path()).unwrap();
    assert_eq!(raw, "[]");
    assert!(assert_ok!(store.read_all().await).is_empty());
}

#[tokio::test]
async fn clear_on_missing_file_creates_it() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(&dir);

    assert_ok!(store.clear().await);
    assert_eq!(std::fs::read_to_string(store.path()).unwrap(), "[]");
}

#[tokio::test]
async fn corrupt_file_is_a_storage_error() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(&dir);
    std::fs::write(store.path(), "{\"not\": \"an array\"}").unwrap();

    let err = store.read_all().await.unwrap_err();
    assert!(matches!(err, StorageError::Corrupt(_)));
}

#[tokio::test]
async fn concurrent_appends_are_not_lost() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(store_in(&dir));

    let mut handles = Vec::new();
    for i in 0..20 {
        let store = store.clone();
        handles.push(tokio::spawn(async move {
            store.append(payload(json!({ "n": i }))).await
        }));
    }
    for handle in handles {
        assert_ok!(handle.await.unwrap());
    }

    let alerts = assert_ok!(store.read_all().await);
    assert_eq!(alerts.len(), 20);
}

#[tokio::test]
async fn failed_rename_removes_temp_file() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("alerts.json");
    std::fs::create_dir(&target).unwrap();
    std::fs::write(target.join("occupied"), b"x").unwrap();
    let store = FileAlertStore::new(target.clone());

    let err = store.clear().await.unwrap_err();
    assert!(matches!(err, StorageError::Io(_)));
    assert!(!dir.path().join("alerts.json.tmp").exists());
    assert!(target.is_dir());
}
