//! # geodash-core — Foundational Data for the Dashboard
//!
//! The leaf of the geodash crate graph. Everything here is built once at
//! process start and never mutated afterwards; sessions share it through an
//! `Arc<Catalog>` without locking.
//!
//! ## Components
//!
//! - **Taxonomy** (`taxonomy.rs`): `country → zone` mapping and the fixed
//!   sector list. Built-in default, or loaded from YAML.
//!
//! - **Geo Resolver** (`geo.rs`): bidirectional `country ↔ territory code`
//!   map built against a static ISO 3166 reference table. Misses are `None`.
//!
//! - **Fact Store** (`facts.rs`): the immutable company table with a
//!   `(country, sector)` index.
//!
//! - **Generator** (`generator.rs`): the seeded synthetic fixture.
//!
//! - **Catalog** (`catalog.rs`): the three stores bundled for sharing.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `geodash-*` crates.
//! - No `panic!()` or `.unwrap()` outside tests.
//! - Lookups that can miss return `Option`; only loading can fail.

pub mod catalog;
pub mod error;
pub mod facts;
pub mod generator;
pub mod geo;
pub mod taxonomy;

pub use catalog::Catalog;
pub use error::CatalogError;
pub use facts::{FactRecord, FactStore, COLUMNS};
pub use generator::{generate, DEFAULT_SEED};
pub use geo::{GeoResolver, TerritoryCode, TerritoryRef, TERRITORIES};
pub use taxonomy::{Taxonomy, TaxonomyDocument, ZoneDocument};
