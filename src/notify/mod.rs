//! Outbound notifications to the messaging API (LINE Notify compatible).

use async_trait::async_trait;
use tracing::debug;
use url::Url;

use crate::config::NotifyConfig;

#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("failed to reach messaging API: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("messaging API returned status {0}")]
    Status(reqwest::StatusCode),
}

/// Sink for human-readable alert messages.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver `message` using `token` as the recipient credential.
    async fn notify(&self, token: &str, message: &str) -> Result<(), NotifyError>;
}

/// Posts `message` as a form field with a bearer credential. No retries.
pub struct HttpNotifier {
    client: reqwest::Client,
    endpoint: Url,
}

impl HttpNotifier {
    pub fn new(config: &NotifyConfig) -> Result<Self, NotifyError> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self::with_client(config.endpoint.clone(), client))
    }

    pub fn with_client(endpoint: Url, client: reqwest::Client) -> Self {
        Self { client, endpoint }
    }
}

#[async_trait]
impl Notifier for HttpNotifier {
    async fn notify(&self, token: &str, message: &str) -> Result<(), NotifyError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .bearer_auth(token)
            .form(&[("message", message)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(NotifyError::Status(status));
        }

        debug!(endpoint = %self.endpoint, "Notification delivered");
        Ok(())
    }
}

/// Summary sent for every webhook alert received by the intake service.
pub fn webhook_summary(payload: &serde_json::Map<String, serde_json::Value>) -> String {
    format!(
        "Received a new TradingView alert: {}",
        serde_json::Value::Object(payload.clone())
    )
}

/// Summary sent when an alert is filed under a catalog strategy.
pub fn strategy_alert_summary(strategy_name: &str, data: &str) -> String {
    format!("New alert for strategy {}: {}", strategy_name, data)
}
