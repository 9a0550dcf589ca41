//! # geodash-cli — Terminal Front End
//!
//! Provides the `geodash` command-line interface over the same catalog,
//! state machine and view composer the HTTP API uses.
//!
//! ## Subcommands
//!
//! - `geodash zones`: sorted zone list.
//! - `geodash countries <zone>`: countries with territory codes.
//! - `geodash sectors <country>`: sectors present for a country.
//! - `geodash explore`: drive a selection and print the resulting view.
//! - `geodash export`: drive a selection and write its CSV export.
//!
//! ```bash
//! geodash explore --zone "North America" --click USA --sector Energy
//! geodash export --zone "North America" --click USA --sector Energy --out /tmp
//! ```

pub mod catalog;
pub mod explore;
pub mod export;

use std::path::Path;

use anyhow::{Context, Result};
use geodash_core::{Catalog, Taxonomy};

/// Build the catalog from an optional taxonomy file and a fixture seed.
pub fn load_catalog(taxonomy: Option<&Path>, seed: u64) -> Result<Catalog> {
    let taxonomy = match taxonomy {
        Some(path) => Taxonomy::from_yaml_file(path)
            .with_context(|| format!("failed to load taxonomy from {}", path.display()))?,
        None => Taxonomy::builtin(),
    };
    let catalog = Catalog::synthetic(taxonomy, seed);
    tracing::debug!(
        records = catalog.facts().len(),
        unresolved = catalog.geo().unresolved().len(),
        seed,
        "catalog loaded"
    );
    Ok(catalog)
}
