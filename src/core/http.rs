//! HTTP plumbing shared by both services: health, metrics, middleware, serving.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{FromRef, Request, State},
    http::StatusCode,
    middleware::Next,
    response::{Json, Response},
    routing::get,
    Router,
};
use serde_json::{json, Value};
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{info, Level};

use crate::metrics::Metrics;

/// State every service router carries, reachable through [`FromRef`].
#[derive(Clone)]
pub struct CoreState {
    pub service: &'static str,
    pub metrics: Arc<Metrics>,
    pub start_time: Arc<Instant>,
}

impl CoreState {
    pub fn new(service: &'static str, metrics: Arc<Metrics>) -> Self {
        Self {
            service,
            metrics,
            start_time: Arc::new(Instant::now()),
        }
    }
}

pub async fn health_check(State(core): State<CoreState>) -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "uptime_seconds": core.start_time.elapsed().as_secs(),
        "service": core.service,
    }))
}

pub async fn metrics_handler(State(core): State<CoreState>) -> Result<String, StatusCode> {
    core.metrics
        .export()
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)
}

/// Track request counts, latency, and in-flight requests
async fn metrics_middleware(State(core): State<CoreState>, request: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    core.metrics.http_requests_in_flight.inc();
    let response = next.run(request).await;
    core.metrics.http_requests_in_flight.dec();

    let status = response.status();
    let duration = start.elapsed();
    core.metrics.http_requests_total.inc();
    core.metrics
        .http_request_duration_seconds
        .observe(duration.as_secs_f64());

    if status.is_server_error() {
        tracing::error!(
            method = %method,
            path = %path,
            status = %status,
            duration_ms = duration.as_millis(),
            "HTTP request error"
        );
    }

    response
}

/// `/health` and `/metrics` for any state that exposes a [`CoreState`].
pub fn operational_routes<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
    CoreState: FromRef<S>,
{
    Router::new()
        .route("/health", get(health_check))
        .route("/metrics", get(metrics_handler))
}

/// Tracing, metrics, and a wide-open CORS policy (any origin, method, and
/// header, credentials allowed).
pub fn with_common_layers(router: Router, core: CoreState) -> Router {
    router.layer(
        ServiceBuilder::new()
            .layer(
                TraceLayer::new_for_http()
                    .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                    .on_request(DefaultOnRequest::new().level(Level::DEBUG))
                    .on_response(DefaultOnResponse::new().level(Level::INFO)),
            )
            .layer(axum::middleware::from_fn_with_state(core, metrics_middleware))
            .layer(CorsLayer::very_permissive()),
    )
}

/// Bind and serve until Ctrl-C.
pub async fn serve(addr: SocketAddr, app: Router) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "HTTP server listening on http://{}", addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
