//! # Visit Log & IP Allow-List
//!
//! Every request produces one `tracing` event with the remote address.
//! When the allow-list is non-empty, requests from other addresses, or
//! without a known remote address, are rejected with 403.
//!
//! The remote address comes from `ConnectInfo<SocketAddr>`, which `main`
//! provides via `into_make_service_with_connect_info`.

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use axum::extract::{ConnectInfo, Request};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::config::AppConfig;
use crate::error::AppError;

/// Allow-list installed as a request extension.
#[derive(Debug, Clone, Default)]
pub struct AccessPolicy {
    allowed: Arc<Vec<IpAddr>>,
}

impl AccessPolicy {
    pub fn new(allowed: Vec<IpAddr>) -> Self {
        Self {
            allowed: Arc::new(allowed),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.allowed_ips.clone())
    }

    pub fn is_enabled(&self) -> bool {
        !self.allowed.is_empty()
    }

    /// Whether a request from `remote` may proceed.
    pub fn permits(&self, remote: Option<IpAddr>) -> bool {
        if !self.is_enabled() {
            return true;
        }
        remote.is_some_and(|ip| self.allowed.contains(&ip))
    }
}

/// Middleware that logs each visit and enforces the allow-list.
pub async fn access_middleware(request: Request, next: Next) -> Response {
    let policy = request
        .extensions()
        .get::<AccessPolicy>()
        .cloned()
        .unwrap_or_default();
    let remote = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip());

    tracing::info!(
        remote = ?remote,
        method = %request.method(),
        path = %request.uri().path(),
        "visit"
    );

    if !policy.permits(remote) {
        tracing::warn!(remote = ?remote, "request rejected: address not on allow-list");
        return AppError::Forbidden("address not allowed".to_string()).into_response();
    }

    next.run(request).await
}
