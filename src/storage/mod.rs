//! Flat alert persistence for the intake service.
//!
//! The intake handlers only see [`AlertStore`]; the concrete backend is
//! picked once at startup from configuration.

pub mod file;
pub mod memory;

use async_trait::async_trait;

use crate::error::StorageError;
use crate::models::AlertPayload;

pub use file::FileAlertStore;
pub use memory::InMemoryAlertStore;

#[async_trait]
pub trait AlertStore: Send + Sync {
    /// Append one alert and persist the whole sequence before returning.
    async fn append(&self, alert: AlertPayload) -> Result<(), StorageError>;

    /// Every stored alert in append order.
    async fn read_all(&self) -> Result<Vec<AlertPayload>, StorageError>;

    /// Replace the stored sequence with an empty one.
    async fn clear(&self) -> Result<(), StorageError>;
}
