//! JSON-array file backend.
//!
//! The whole sequence lives in one file and is rewritten on every change.
//! Writes go to a sibling `.tmp` file which is then renamed over the target,
//! and a process-wide mutex serializes the read-modify-write cycle. Separate
//! processes sharing one file are still not coordinated.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tokio::sync::Mutex;
use tracing::debug;

use super::AlertStore;
use crate::error::StorageError;
use crate::models::AlertPayload;

pub struct FileAlertStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileAlertStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<Vec<AlertPayload>, StorageError> {
        match fs::read(&self.path).await {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    async fn save(&self, alerts: &[AlertPayload]) -> Result<(), StorageError> {
        let bytes = serde_json::to_vec(alerts)?;
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        fs::write(&tmp, &bytes).await?;
        if let Err(e) = fs::rename(&tmp, &self.path).await {
            let _ = fs::remove_file(&tmp).await;
            return Err(e.into());
        }
        debug!(path = %self.path.display(), count = alerts.len(), "Alert file written");
        Ok(())
    }
}

#[async_trait]
impl AlertStore for FileAlertStore {
    async fn append(&self, alert: AlertPayload) -> Result<(), StorageError> {
        let _guard = self.write_lock.lock().await;
        let mut alerts = self.load().await?;
        alerts.push(alert);
        self.save(&alerts).await
    }

    async fn read_all(&self) -> Result<Vec<AlertPayload>, StorageError> {
        self.load().await
    }

    async fn clear(&self) -> Result<(), StorageError> {
        let _guard = self.write_lock.lock().await;
        self.save(&[]).await
    }
}
