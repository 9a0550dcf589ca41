//! # API Route Modules
//!
//! - [`catalog`]: read-only zone, country and sector queries.
//! - [`sessions`]: session lifecycle and selection events.
//! - [`export`]: CSV download of a session's current selection.

pub mod catalog;
pub mod export;
pub mod sessions;
