//! Tracing subscriber setup shared by both binaries.
//!
//! The output format comes from `LOG_FORMAT` (`json` or `pretty`) when set,
//! otherwise from the deployment environment: JSON lines in production,
//! ANSI-colored text everywhere else.

use std::env;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::get_environment;

/// Filter used when `RUST_LOG` is unset or unparsable.
pub const DEFAULT_FILTER: &str = "info,tower_http=info";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
}

impl LogFormat {
    /// Pick a format from an explicit `LOG_FORMAT` value and the environment
    /// name. An unrecognized override is ignored.
    pub fn select(override_value: Option<&str>, environment: &str) -> Self {
        let explicit = override_value.and_then(|raw| match raw.trim().to_ascii_lowercase().as_str() {
            "json" => Some(LogFormat::Json),
            "pretty" | "text" => Some(LogFormat::Pretty),
            _ => None,
        });

        explicit.unwrap_or(if is_production(environment) {
            LogFormat::Json
        } else {
            LogFormat::Pretty
        })
    }

    pub fn from_env() -> Self {
        Self::select(env::var("LOG_FORMAT").ok().as_deref(), &get_environment())
    }
}

/// Install the global subscriber for `service`. `RUST_LOG` overrides
/// [`DEFAULT_FILTER`].
pub fn init_logging(service: &str) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let format = LogFormat::from_env();

    let registry = tracing_subscriber::registry().with(env_filter);
    match format {
        LogFormat::Json => registry
            .with(
                fmt::layer()
                    .json()
                    .flatten_event(true)
                    .with_current_span(false)
                    .with_file(true)
                    .with_line_number(true)
                    .with_writer(std::io::stdout),
            )
            .init(),
        LogFormat::Pretty => registry
            .with(fmt::layer().with_ansi(true).with_writer(std::io::stdout))
            .init(),
    }

    tracing::info!(service, ?format, "Logging initialized");
}

pub fn is_production(env: &str) -> bool {
    matches!(env, "production" | "prod")
}
