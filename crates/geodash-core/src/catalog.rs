//! # Catalog
//!
//! Bundles the taxonomy, the geo resolver built for it, and the fact
//! store. Built once at startup and shared read-only.

use crate::facts::{FactRecord, FactStore};
use crate::generator::{generate, DEFAULT_SEED};
use crate::geo::GeoResolver;
use crate::taxonomy::Taxonomy;

/// Immutable reference data shared by every session.
#[derive(Debug, Clone)]
pub struct Catalog {
    taxonomy: Taxonomy,
    geo: GeoResolver,
    facts: FactStore,
}

impl Catalog {
    /// Build a catalog over explicit records.
    pub fn new(taxonomy: Taxonomy, records: Vec<FactRecord>) -> Self {
        let geo = GeoResolver::new(&taxonomy);
        Self {
            taxonomy,
            geo,
            facts: FactStore::new(records),
        }
    }

    /// Build a catalog over the synthetic fixture for `taxonomy`.
    pub fn synthetic(taxonomy: Taxonomy, seed: u64) -> Self {
        let records = generate(&taxonomy, seed);
        Self::new(taxonomy, records)
    }

    /// Built-in taxonomy with the default fixture seed.
    pub fn builtin() -> Self {
        Self::synthetic(Taxonomy::builtin(), DEFAULT_SEED)
    }

    pub fn taxonomy(&self) -> &Taxonomy {
        &self.taxonomy
    }

    pub fn geo(&self) -> &GeoResolver {
        &self.geo
    }

    pub fn facts(&self) -> &FactStore {
        &self.facts
    }
}
