//! Data models shared by handlers and storage backends.

pub mod alert;
pub mod strategy;

pub use alert::{AlertPayload, MessageResponse, WebhookResponse};
pub use strategy::{CatalogAlert, NewAlert, NewStrategy, Strategy};
