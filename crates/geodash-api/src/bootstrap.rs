//! # Startup Bootstrap
//!
//! Builds the [`AppState`] from an [`AppConfig`]:
//!
//! 1. **Load taxonomy**: the YAML file named by `GEODASH_TAXONOMY`, or the
//!    built-in zones and sectors.
//! 2. **Generate facts**: the synthetic company table for the configured seed.
//! 3. **Report unresolved countries**: countries without a territory code are
//!    logged once; they stay selectable in the zone list but not on the map.

use geodash_core::{Catalog, CatalogError, Taxonomy};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

use crate::config::{AppConfig, ConfigError};
use crate::state::AppState;

/// Errors during startup.
#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("metrics recorder error: {0}")]
    Metrics(String),
}

/// Load the taxonomy and generate the fact table.
pub fn load_catalog(config: &AppConfig) -> Result<Catalog, BootstrapError> {
    let taxonomy = match &config.taxonomy_path {
        Some(path) => {
            tracing::info!(path = %path.display(), "loading taxonomy");
            Taxonomy::from_yaml_file(path)?
        }
        None => Taxonomy::builtin(),
    };

    let catalog = Catalog::synthetic(taxonomy, config.seed);

    for country in catalog.geo().unresolved() {
        tracing::warn!(
            country = %country,
            "no territory code for country; it will not be clickable on the map"
        );
    }

    tracing::info!(
        zones = catalog.taxonomy().zones().len(),
        countries = catalog.taxonomy().countries().count(),
        sectors = catalog.taxonomy().sectors().len(),
        records = catalog.facts().len(),
        seed = config.seed,
        "catalog ready"
    );

    Ok(catalog)
}

/// Build application state for `config`.
pub fn bootstrap(config: AppConfig) -> Result<AppState, BootstrapError> {
    let catalog = load_catalog(&config)?;
    Ok(AppState::with_catalog(catalog, config))
}

/// Install the global Prometheus recorder. Call at most once per process.
pub fn install_metrics_recorder() -> Result<PrometheusHandle, BootstrapError> {
    PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| BootstrapError::Metrics(e.to_string()))
}
