//! # Error Types
//!
//! Loading the catalog is the only fallible operation in this crate.
//! Lookups never fail; they return `Option` or an empty collection.

use thiserror::Error;

/// Errors raised while building a [`crate::Taxonomy`] or [`crate::Catalog`].
#[derive(Error, Debug)]
pub enum CatalogError {
    /// The taxonomy document could not be read.
    #[error("failed to read taxonomy from {path}: {source}")]
    Io {
        /// Path that was being read.
        path: String,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The taxonomy document is not valid YAML for the expected shape.
    #[error("invalid taxonomy document: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The document declares no zones.
    #[error("taxonomy declares no zones")]
    NoZones,

    /// A zone name appears more than once.
    #[error("zone {zone:?} is declared more than once")]
    DuplicateZone {
        /// The repeated zone.
        zone: String,
    },

    /// A zone lists no countries.
    #[error("zone {zone:?} has no countries")]
    EmptyZone {
        /// The empty zone.
        zone: String,
    },

    /// A country is assigned to more than one zone.
    #[error("country {country:?} appears in both {first:?} and {second:?}")]
    DuplicateCountry {
        /// The repeated country.
        country: String,
        /// Zone of the first occurrence.
        first: String,
        /// Zone of the second occurrence.
        second: String,
    },

    /// Two countries resolve to the same territory code, so a map click on
    /// that code could not tell them apart.
    #[error("countries {first:?} and {second:?} both resolve to territory {code}")]
    DuplicateTerritory {
        /// The shared alpha-3 code.
        code: String,
        /// Country declared first.
        first: String,
        /// Country declared second.
        second: String,
    },

    /// The document declares no sectors.
    #[error("taxonomy declares no sectors")]
    NoSectors,

    /// A sector name appears more than once.
    #[error("sector {sector:?} is declared more than once")]
    DuplicateSector {
        /// The repeated sector.
        sector: String,
    },
}
