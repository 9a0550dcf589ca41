//! # Request Metrics
//!
//! Every request increments in-process atomic counters (readable by tests
//! and logs) and emits the same observations through the `metrics` facade.
//! The facade is a no-op until `main` installs the Prometheus recorder.
//!
//! The `path` label is the matched route template (`/v1/zones/{zone}/countries`),
//! never the raw request path, so label cardinality is bounded by the route
//! table. Requests that match no route share the `unmatched` label.

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use axum::extract::{MatchedPath, Request};
use axum::middleware::Next;
use axum::response::Response;

pub const HTTP_REQUESTS_TOTAL: &str = "geodash_http_requests_total";
pub const HTTP_ERRORS_TOTAL: &str = "geodash_http_errors_total";
pub const HTTP_REQUEST_DURATION_SECONDS: &str = "geodash_http_request_duration_seconds";
pub const SELECTION_EVENTS_TOTAL: &str = "geodash_selection_events_total";
pub const COMPOSE_SECONDS: &str = "geodash_compose_seconds";
pub const EXPORTS_TOTAL: &str = "geodash_exports_total";

/// `path` label for requests that matched no route.
pub const UNMATCHED_PATH: &str = "unmatched";

/// Shared in-process request counters.
#[derive(Debug, Clone, Default)]
pub struct ApiMetrics {
    request_count: Arc<AtomicU64>,
    error_count: Arc<AtomicU64>,
    paths: Arc<parking_lot::Mutex<BTreeSet<String>>>,
}

impl ApiMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn requests(&self) -> u64 {
        self.request_count.load(Ordering::Relaxed)
    }

    pub fn errors(&self) -> u64 {
        self.error_count.load(Ordering::Relaxed)
    }

    /// Distinct `path` labels recorded so far, sorted.
    pub fn path_labels(&self) -> Vec<String> {
        self.paths.lock().iter().cloned().collect()
    }

    /// Record one finished request.
    pub fn record_request(&self, method: &str, path: &str, status: u16, duration_secs: f64) {
        self.request_count.fetch_add(1, Ordering::Relaxed);
        {
            let mut paths = self.paths.lock();
            if !paths.contains(path) {
                paths.insert(path.to_string());
            }
        }
        let status_label = status.to_string();
        ::metrics::counter!(
            HTTP_REQUESTS_TOTAL,
            "method" => method.to_string(),
            "path" => path.to_string(),
            "status" => status_label.clone()
        )
        .increment(1);
        ::metrics::histogram!(
            HTTP_REQUEST_DURATION_SECONDS,
            "method" => method.to_string(),
            "path" => path.to_string()
        )
        .record(duration_secs);

        if status >= 400 {
            self.error_count.fetch_add(1, Ordering::Relaxed);
            ::metrics::counter!(
                HTTP_ERRORS_TOTAL,
                "method" => method.to_string(),
                "path" => path.to_string(),
                "status" => status_label
            )
            .increment(1);
        }
    }
}

/// Route template the request matched, or [`UNMATCHED_PATH`].
pub fn route_label(request: &Request) -> String {
    request
        .extensions()
        .get::<MatchedPath>()
        .map(|matched| matched.as_str().to_string())
        .unwrap_or_else(|| UNMATCHED_PATH.to_string())
}

/// Middleware that records request counts, errors and latency.
pub async fn metrics_middleware(request: Request, next: Next) -> Response {
    let metrics = request.extensions().get::<ApiMetrics>().cloned();
    let method = request.method().to_string();
    let path = route_label(&request);
    let start = Instant::now();

    let response = next.run(request).await;

    if let Some(m) = metrics {
        m.record_request(
            &method,
            &path,
            response.status().as_u16(),
            start.elapsed().as_secs_f64(),
        );
    }

    response
}
