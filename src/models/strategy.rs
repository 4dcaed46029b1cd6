//! Strategy catalog entities

use serde::{Deserialize, Serialize};

/// A named strategy with its notification target and owned alerts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Strategy {
    pub id: i64,
    pub name: String,
    pub webhook_url: String,
    pub notification_token: String,
    /// Owned alerts in creation order.
    #[serde(default)]
    pub alerts: Vec<CatalogAlert>,
}

/// An alert owned by exactly one strategy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogAlert {
    pub id: i64,
    pub data: String,
    pub strategy_id: i64,
}

/// Validated input for creating a strategy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewStrategy {
    pub name: String,
    pub webhook_url: String,
    pub notification_token: String,
}

/// Validated input for creating an alert under a strategy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAlert {
    pub data: String,
}
