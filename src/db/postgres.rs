//! PostgreSQL catalog backend

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tokio_postgres::{Client, NoTls, Row};
use tracing::{error, info};

use super::{CatalogStore, FiledAlert};
use crate::error::StorageError;
use crate::models::{CatalogAlert, NewAlert, NewStrategy, Strategy};
use crate::validation::Pagination;

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS strategies (
        id BIGSERIAL PRIMARY KEY,
        name TEXT NOT NULL,
        webhook_url TEXT NOT NULL,
        notification_token TEXT NOT NULL
    );
    CREATE TABLE IF NOT EXISTS alerts (
        id BIGSERIAL PRIMARY KEY,
        data TEXT NOT NULL,
        strategy_id BIGINT NOT NULL REFERENCES strategies(id)
    );
    CREATE INDEX IF NOT EXISTS alerts_strategy_id_idx ON alerts (strategy_id);
";

pub struct PostgresCatalog {
    client: Mutex<Client>,
}

impl PostgresCatalog {
    /// Connect, spawn the connection driver, and create tables if missing.
    pub async fn connect(database_url: &str) -> Result<Self, StorageError> {
        let (client, connection) = tokio_postgres::connect(database_url, NoTls).await?;

        tokio::spawn(async move {
            if let Err(e) = connection.await {
                error!(error = %e, "PostgreSQL connection error");
            }
        });

        client.batch_execute(SCHEMA).await?;
        info!("Catalog schema ready");

        Ok(Self {
            client: Mutex::new(client),
        })
    }
}

fn alert_from_row(row: &Row) -> CatalogAlert {
    CatalogAlert {
        id: row.get(0),
        data: row.get(1),
        strategy_id: row.get(2),
    }
}

#[async_trait]
impl CatalogStore for PostgresCatalog {
    async fn create_strategy(&self, strategy: &NewStrategy) -> Result<Strategy, StorageError> {
        let mut client = self.client.lock().await;
        let tx = client.transaction().await?;

        let row = tx
            .query_one(
                "INSERT INTO strategies (name, webhook_url, notification_token)
                 VALUES ($1, $2, $3)
                 RETURNING id",
                &[
                    &strategy.name,
                    &strategy.webhook_url,
                    &strategy.notification_token,
                ],
            )
            .await?;
        tx.commit().await?;

        Ok(Strategy {
            id: row.get(0),
            name: strategy.name.clone(),
            webhook_url: strategy.webhook_url.clone(),
            notification_token: strategy.notification_token.clone(),
            alerts: Vec::new(),
        })
    }

    async fn list_strategies(&self, page: Pagination) -> Result<Vec<Strategy>, StorageError> {
        let mut client = self.client.lock().await;
        let tx = client.transaction().await?;

        let rows = tx
            .query(
                "SELECT id, name, webhook_url, notification_token
                 FROM strategies
                 ORDER BY id
                 OFFSET $1 LIMIT $2",
                &[&page.skip, &page.limit],
            )
            .await?;

        let ids: Vec<i64> = rows.iter().map(|row| row.get(0)).collect();
        let alert_rows = tx
            .query(
                "SELECT id, data, strategy_id
                 FROM alerts
                 WHERE strategy_id = ANY($1)
                 ORDER BY id",
                &[&ids],
            )
            .await?;
        tx.commit().await?;

        let mut owned: HashMap<i64, Vec<CatalogAlert>> = HashMap::new();
        for row in &alert_rows {
            let alert = alert_from_row(row);
            owned.entry(alert.strategy_id).or_default().push(alert);
        }

        Ok(rows
            .iter()
            .map(|row| {
                let id: i64 = row.get(0);
                Strategy {
                    id,
                    name: row.get(1),
                    webhook_url: row.get(2),
                    notification_token: row.get(3),
                    alerts: owned.remove(&id).unwrap_or_default(),
                }
            })
            .collect())
    }

    async fn create_alert(
        &self,
        strategy_id: i64,
        alert: &NewAlert,
    ) -> Result<FiledAlert, StorageError> {
        let mut client = self.client.lock().await;
        let tx = client.transaction().await?;

        let owner = tx
            .query_opt(
                "SELECT name, notification_token FROM strategies WHERE id = $1",
                &[&strategy_id],
            )
            .await?
            .ok_or(StorageError::StrategyNotFound(strategy_id))?;

        let row = tx
            .query_one(
                "INSERT INTO alerts (data, strategy_id)
                 VALUES ($1, $2)
                 RETURNING id, data, strategy_id",
                &[&alert.data, &strategy_id],
            )
            .await?;
        tx.commit().await?;

        Ok(FiledAlert {
            alert: alert_from_row(&row),
            strategy_name: owner.get(0),
            notification_token: owner.get(1),
        })
    }

    async fn list_alerts(&self, page: Pagination) -> Result<Vec<CatalogAlert>, StorageError> {
        let mut client = self.client.lock().await;
        let tx = client.transaction().await?;

        let rows = tx
            .query(
                "SELECT id, data, strategy_id
                 FROM alerts
                 ORDER BY id
                 OFFSET $1 LIMIT $2",
                &[&page.skip, &page.limit],
            )
            .await?;
        tx.commit().await?;

        Ok(rows.iter().map(alert_from_row).collect())
    }
}
