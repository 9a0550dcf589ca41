//! # geodash-view — Derived Views
//!
//! Pure functions from a [`geodash_state::Selection`] and the shared
//! [`geodash_core::Catalog`] to renderable data. Nothing is cached: every
//! call recomputes from the immutable stores.
//!
//! - `compose.rs`: map entries, sector options, chart series, table and
//!   summary aggregates.
//! - `export.rs`: the CSV download for a `(country, sector)` subset.

pub mod compose;
pub mod export;

pub use compose::{
    compose, zone_map, ChartKind, ChartSeries, Dashboard, MapEntry, SeriesPoint, Summary,
    TableView, ViewArtifacts, ZoneMap, TABLE_PAGE_SIZE,
};
pub use export::{
    download_for, export_filename, to_downloadable, Download, ExportError, CSV_CONTENT_TYPE,
};
