//! # Middleware Stack
//!
//! Tower middleware for the API layer:
//! - [`metrics`]: request counters and latency via the `metrics` facade.
//! - [`access`]: per-request visit log and the `ALLOWED_IPS` allow-list.

pub mod access;
pub mod metrics;
