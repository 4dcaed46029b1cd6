use async_trait::async_trait;
use tokio::sync::RwLock;

use super::AlertStore;
use crate::error::StorageError;
use crate::models::AlertPayload;

#[derive(Default)]
pub struct InMemoryAlertStore {
    alerts: RwLock<Vec<AlertPayload>>,
}

impl InMemoryAlertStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AlertStore for InMemoryAlertStore {
    async fn append(&self, alert: AlertPayload) -> Result<(), StorageError> {
        self.alerts.write().await.push(alert);
        Ok(())
    }

    async fn read_all(&self) -> Result<Vec<AlertPayload>, StorageError> {
        Ok(self.alerts.read().await.clone())
    }

    async fn clear(&self) -> Result<(), StorageError> {
        self.alerts.write().await.clear();
        Ok(())
    }
}
