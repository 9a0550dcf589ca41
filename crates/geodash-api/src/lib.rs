//! # geodash-api — Axum API Services for geodash
//!
//! HTTP surface over the zone → country → sector drill-down. Catalog queries
//! are stateless; everything that depends on a user's choices goes through a
//! session, which owns one selection state machine.
//!
//! ## API Surface
//!
//! | Prefix | Module | Domain |
//! |---|---|---|
//! | `/v1/zones*`, `/v1/countries/*` | [`routes::catalog`] | Taxonomy and sector lookup |
//! | `/v1/sessions*` | [`routes::sessions`] | Selection sessions |
//! | `/v1/sessions/{id}/export` | [`routes::export`] | CSV download |
//!
//! ## Middleware Stack (execution order)
//!
//! ```text
//! TraceLayer → MetricsMiddleware → AccessMiddleware → Handler
//! ```
//!
//! Health probes sit outside the access middleware so they stay reachable
//! when an allow-list is configured.
//!
//! ## OpenAPI
//!
//! Auto-generated OpenAPI 3.1 spec via utoipa derive macros at `/openapi.json`.

pub mod bootstrap;
pub mod config;
pub mod error;
pub mod extractors;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod state;

use axum::extract::State;
use axum::middleware::from_fn;
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::error::AppError;
use crate::middleware::access::AccessPolicy;
use crate::middleware::metrics::ApiMetrics;
use crate::state::AppState;

/// Assemble the full application router with all routes and middleware.
pub fn app(state: AppState) -> Router {
    app_with_metrics(state, ApiMetrics::new())
}

/// [`app`] with caller-provided request counters, so tests can observe them.
pub fn app_with_metrics(state: AppState, metrics: ApiMetrics) -> Router {
    let policy = AccessPolicy::from_config(&state.config);

    let api = Router::new()
        .merge(routes::catalog::router())
        .merge(routes::sessions::router())
        .merge(routes::export::router())
        .merge(openapi::router())
        .route("/metrics", axum::routing::get(prometheus_metrics))
        .layer(from_fn(middleware::access::access_middleware))
        .layer(from_fn(middleware::metrics::metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(axum::Extension(policy))
        .layer(axum::Extension(metrics))
        .with_state(state);

    let health = Router::new()
        .route("/health/liveness", axum::routing::get(liveness))
        .route("/health/readiness", axum::routing::get(readiness));

    Router::new().merge(health).merge(api)
}

/// Liveness probe. Always returns 200 if the process is running.
async fn liveness() -> &'static str {
    "ok"
}

/// Readiness probe. The catalog is built before the router exists, so a
/// serving process is ready.
async fn readiness() -> &'static str {
    "ready"
}

/// GET /metrics — Prometheus text exposition.
async fn prometheus_metrics(State(state): State<AppState>) -> Result<String, AppError> {
    state
        .metrics
        .as_ref()
        .map(|handle| handle.render())
        .ok_or_else(|| AppError::ServiceUnavailable("metrics recorder not installed".to_string()))
}
