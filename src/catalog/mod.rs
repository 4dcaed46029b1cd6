//! Strategy catalog service: strategies and the alerts they own.

use std::sync::Arc;

use axum::{
    extract::{FromRef, State},
    response::Json,
    routing::{get, post},
    Router,
};
use tracing::{info, warn};

use crate::config::{CatalogConfig, CatalogStoreKind};
use crate::core::http::{operational_routes, with_common_layers, CoreState};
use crate::db::{CatalogStore, FiledAlert, InMemoryCatalog, PostgresCatalog};
use crate::error::{AppError, StorageError};
use crate::metrics::Metrics;
use crate::models::{CatalogAlert, NewAlert, NewStrategy, Strategy};
use crate::notify::{strategy_alert_summary, HttpNotifier, Notifier};
use crate::validation::{Pagination, StrategyId, ValidatedJson};

pub const SERVICE_NAME: &str = "signalhook-catalog";

#[derive(Debug, thiserror::Error)]
pub enum CatalogStartupError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Notify(#[from] crate::notify::NotifyError),
}

#[derive(Clone)]
pub struct CatalogState {
    pub core: CoreState,
    pub store: Arc<dyn CatalogStore>,
    pub notifier: Arc<dyn Notifier>,
}

impl FromRef<CatalogState> for CoreState {
    fn from_ref(state: &CatalogState) -> Self {
        state.core.clone()
    }
}

impl CatalogState {
    pub fn new(
        metrics: Arc<Metrics>,
        store: Arc<dyn CatalogStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            core: CoreState::new(SERVICE_NAME, metrics),
            store,
            notifier,
        }
    }

    /// Connect the configured backend and build the HTTP notifier.
    pub async fn from_config(
        config: &CatalogConfig,
        metrics: Arc<Metrics>,
    ) -> Result<Self, CatalogStartupError> {
        let store: Arc<dyn CatalogStore> = match &config.store {
            CatalogStoreKind::Postgres(url) => {
                info!("Connecting to PostgreSQL catalog");
                Arc::new(PostgresCatalog::connect(url).await?)
            }
            CatalogStoreKind::Memory => {
                warn!("Using in-memory catalog; data is lost on restart");
                Arc::new(InMemoryCatalog::new())
            }
        };
        let notifier = Arc::new(HttpNotifier::new(&config.notify)?);

        Ok(Self::new(metrics, store, notifier))
    }
}

async fn create_strategy(
    State(state): State<CatalogState>,
    ValidatedJson(strategy): ValidatedJson<NewStrategy>,
) -> Result<Json<Strategy>, AppError> {
    let created = state.store.create_strategy(&strategy).await?;
    info!(strategy_id = created.id, name = %created.name, "Strategy created");
    Ok(Json(created))
}

async fn list_strategies(
    State(state): State<CatalogState>,
    page: Pagination,
) -> Result<Json<Vec<Strategy>>, AppError> {
    Ok(Json(state.store.list_strategies(page).await?))
}

/// File an alert under an existing strategy, then notify the strategy's
/// target. Notification failures are logged only.
async fn create_alert_for_strategy(
    State(state): State<CatalogState>,
    StrategyId(strategy_id): StrategyId,
    ValidatedJson(new_alert): ValidatedJson<NewAlert>,
) -> Result<Json<CatalogAlert>, AppError> {
    let FiledAlert {
        alert,
        strategy_name,
        notification_token,
    } = state.store.create_alert(strategy_id, &new_alert).await?;
    state.core.metrics.alerts_received_total.inc();

    let summary = strategy_alert_summary(&strategy_name, &alert.data);
    match state.notifier.notify(&notification_token, &summary).await {
        Ok(()) => state.core.metrics.notifications_sent_total.inc(),
        Err(e) => {
            state.core.metrics.notifications_failed_total.inc();
            warn!(error = %e, strategy_id, alert_id = alert.id, "Alert stored but notification failed");
        }
    }

    Ok(Json(alert))
}

async fn list_alerts(
    State(state): State<CatalogState>,
    page: Pagination,
) -> Result<Json<Vec<CatalogAlert>>, AppError> {
    Ok(Json(state.store.list_alerts(page).await?))
}

pub fn create_router(state: CatalogState) -> Router {
    let core = state.core.clone();
    let router = Router::new()
        .route("/strategies/", get(list_strategies).post(create_strategy))
        .route(
            "/strategies/{strategy_id}/alerts/",
            post(create_alert_for_strategy),
        )
        .route("/alerts/", get(list_alerts))
        .merge(operational_routes::<CatalogState>())
        .with_state(state);

    with_common_layers(router, core)
}
