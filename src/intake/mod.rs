//! Alert intake service: webhook receipt, flat alert listing, bulk delete.

use std::sync::Arc;

use axum::{
    extract::{FromRef, State},
    response::Json,
    routing::{get, post},
    Router,
};
use tracing::{info, warn};

use crate::config::{AlertStoreKind, IntakeConfig};
use crate::core::http::{operational_routes, with_common_layers, CoreState};
use crate::error::AppError;
use crate::metrics::Metrics;
use crate::models::{AlertPayload, MessageResponse, WebhookResponse};
use crate::notify::{webhook_summary, HttpNotifier, Notifier, NotifyError};
use crate::storage::{AlertStore, FileAlertStore, InMemoryAlertStore};
use crate::validation::ValidatedJson;

pub const SERVICE_NAME: &str = "signalhook-intake";
pub const WEBHOOK_ACK: &str = "Alert received and notification sent.";
pub const ALERTS_CLEARED: &str = "All alerts deleted.";

#[derive(Clone)]
pub struct IntakeState {
    pub core: CoreState,
    pub store: Arc<dyn AlertStore>,
    pub notifier: Arc<dyn Notifier>,
    pub notify_token: Arc<str>,
}

impl FromRef<IntakeState> for CoreState {
    fn from_ref(state: &IntakeState) -> Self {
        state.core.clone()
    }
}

impl IntakeState {
    pub fn new(
        metrics: Arc<Metrics>,
        store: Arc<dyn AlertStore>,
        notifier: Arc<dyn Notifier>,
        notify_token: impl Into<Arc<str>>,
    ) -> Self {
        Self {
            core: CoreState::new(SERVICE_NAME, metrics),
            store,
            notifier,
            notify_token: notify_token.into(),
        }
    }

    /// Wire the configured store and the HTTP notifier.
    pub fn from_config(config: &IntakeConfig, metrics: Arc<Metrics>) -> Result<Self, NotifyError> {
        let store: Arc<dyn AlertStore> = match &config.store {
            AlertStoreKind::File(path) => {
                info!(path = %path.display(), "Using file alert store");
                Arc::new(FileAlertStore::new(path.clone()))
            }
            AlertStoreKind::Memory => {
                warn!("Using in-memory alert store; alerts are lost on restart");
                Arc::new(InMemoryAlertStore::new())
            }
        };
        let notifier = Arc::new(HttpNotifier::new(&config.notify)?);

        Ok(Self::new(metrics, store, notifier, config.notify_token.as_str()))
    }
}

/// Store the alert, then notify. A failed notification does not fail the
/// request; it is logged and reported in `warning`.
async fn receive_webhook(
    State(state): State<IntakeState>,
    ValidatedJson(payload): ValidatedJson<AlertPayload>,
) -> Result<Json<WebhookResponse>, AppError> {
    let summary = webhook_summary(&payload);

    state.store.append(payload).await?;
    state.core.metrics.alerts_received_total.inc();

    let warning = match state.notifier.notify(&state.notify_token, &summary).await {
        Ok(()) => {
            state.core.metrics.notifications_sent_total.inc();
            None
        }
        Err(e) => {
            state.core.metrics.notifications_failed_total.inc();
            warn!(error = %e, "Alert stored but notification failed");
            Some(format!("notification not delivered: {}", e))
        }
    };

    Ok(Json(WebhookResponse {
        message: WEBHOOK_ACK.to_string(),
        warning,
    }))
}

async fn list_alerts(State(state): State<IntakeState>) -> Result<Json<Vec<AlertPayload>>, AppError> {
    Ok(Json(state.store.read_all().await?))
}

async fn delete_alerts(State(state): State<IntakeState>) -> Result<Json<MessageResponse>, AppError> {
    state.store.clear().await?;
    info!("All alerts deleted");
    Ok(Json(MessageResponse::new(ALERTS_CLEARED)))
}

pub fn create_router(state: IntakeState) -> Router {
    let core = state.core.clone();
    let router = Router::new()
        .route("/webhook", post(receive_webhook))
        .route("/alerts", get(list_alerts).delete(delete_alerts))
        .merge(operational_routes::<IntakeState>())
        .with_state(state);

    with_common_layers(router, core)
}
