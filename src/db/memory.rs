use async_trait::async_trait;
use tokio::sync::Mutex;

use super::{CatalogStore, FiledAlert};
use crate::error::StorageError;
use crate::models::{CatalogAlert, NewAlert, NewStrategy, Strategy};
use crate::validation::Pagination;

#[derive(Default)]
struct Tables {
    strategies: Vec<Strategy>,
    alerts: Vec<CatalogAlert>,
    next_strategy_id: i64,
    next_alert_id: i64,
}

/// Catalog kept in process memory; ids start at 1 like a serial column.
#[derive(Default)]
pub struct InMemoryCatalog {
    tables: Mutex<Tables>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CatalogStore for InMemoryCatalog {
    async fn create_strategy(&self, strategy: &NewStrategy) -> Result<Strategy, StorageError> {
        let mut tables = self.tables.lock().await;
        tables.next_strategy_id += 1;
        let created = Strategy {
            id: tables.next_strategy_id,
            name: strategy.name.clone(),
            webhook_url: strategy.webhook_url.clone(),
            notification_token: strategy.notification_token.clone(),
            alerts: Vec::new(),
        };
        tables.strategies.push(created.clone());
        Ok(created)
    }

    async fn list_strategies(&self, page: Pagination) -> Result<Vec<Strategy>, StorageError> {
        let tables = self.tables.lock().await;
        Ok(page
            .window(&tables.strategies)
            .iter()
            .map(|strategy| Strategy {
                alerts: tables
                    .alerts
                    .iter()
                    .filter(|alert| alert.strategy_id == strategy.id)
                    .cloned()
                    .collect(),
                ..strategy.clone()
            })
            .collect())
    }

    async fn create_alert(
        &self,
        strategy_id: i64,
        alert: &NewAlert,
    ) -> Result<FiledAlert, StorageError> {
        let mut tables = self.tables.lock().await;
        let (strategy_name, notification_token) = tables
            .strategies
            .iter()
            .find(|s| s.id == strategy_id)
            .map(|s| (s.name.clone(), s.notification_token.clone()))
            .ok_or(StorageError::StrategyNotFound(strategy_id))?;

        tables.next_alert_id += 1;
        let created = CatalogAlert {
            id: tables.next_alert_id,
            data: alert.data.clone(),
            strategy_id,
        };
        tables.alerts.push(created.clone());

        Ok(FiledAlert {
            alert: created,
            strategy_name,
            notification_token,
        })
    }

    async fn list_alerts(&self, page: Pagination) -> Result<Vec<CatalogAlert>, StorageError> {
        let tables = self.tables.lock().await;
        Ok(page.window(&tables.alerts).to_vec())
    }
}
