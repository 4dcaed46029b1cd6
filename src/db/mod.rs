//! Relational persistence for the strategy catalog.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;

use crate::error::StorageError;
use crate::models::{CatalogAlert, NewAlert, NewStrategy, Strategy};
use crate::validation::Pagination;

pub use memory::InMemoryCatalog;
pub use postgres::PostgresCatalog;

/// An alert just written under a strategy, with the owner's notification target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FiledAlert {
    pub alert: CatalogAlert,
    pub strategy_name: String,
    pub notification_token: String,
}

/// Each call runs in its own transaction.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Insert a strategy; the returned value has an assigned id and no alerts.
    async fn create_strategy(&self, strategy: &NewStrategy) -> Result<Strategy, StorageError>;

    /// Strategies ordered by id, each with its alerts in creation order.
    async fn list_strategies(&self, page: Pagination) -> Result<Vec<Strategy>, StorageError>;

    /// Fails with [`StorageError::StrategyNotFound`] when the owner does not exist.
    async fn create_alert(
        &self,
        strategy_id: i64,
        alert: &NewAlert,
    ) -> Result<FiledAlert, StorageError>;

    /// Alerts across all strategies ordered by id.
    async fn list_alerts(&self, page: Pagination) -> Result<Vec<CatalogAlert>, StorageError>;
}
