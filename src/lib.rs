//! signalhook: webhook alert intake and strategy catalog services.
//!
//! Two HTTP services are built from this crate:
//! - `intake-server`: stores raw webhook alerts and forwards a notification
//! - `catalog-server`: relational catalog of strategies and their alerts

pub mod catalog;
pub mod config;
pub mod core;
pub mod db;
pub mod error;
pub mod intake;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod notify;
pub mod storage;
pub mod validation;
