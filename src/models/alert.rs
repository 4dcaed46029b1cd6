//! Flat-variant alert payloads and intake responses

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// An opaque webhook alert. Any JSON object is accepted as-is.
pub type AlertPayload = Map<String, Value>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Response for `POST /webhook`. `warning` is only present when the
/// notification could not be delivered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookResponse {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}
