//! # Catalog Listing Subcommands
//!
//! `zones`, `countries <zone>` and `sectors <country>`. Output is one
//! tab-separated line per item so it pipes cleanly into `cut` and `sort`.

use std::io::Write;

use anyhow::{bail, Result};
use clap::Args;
use geodash_core::Catalog;

/// Arguments for `geodash countries`.
#[derive(Args, Debug)]
pub struct CountriesArgs {
    /// Zone name, e.g. "Western Europe".
    pub zone: String,
}

/// Arguments for `geodash sectors`.
#[derive(Args, Debug)]
pub struct SectorsArgs {
    /// Country name as listed in the taxonomy.
    pub country: String,
}

/// Print every zone, sorted.
pub fn run_zones(catalog: &Catalog, out: &mut dyn Write) -> Result<u8> {
    for zone in catalog.taxonomy().zones() {
        writeln!(out, "{zone}")?;
    }
    Ok(0)
}

/// Print `country<TAB>code<TAB>hover label` for each country of a zone.
/// Countries without a territory code show `-`.
pub fn run_countries(args: &CountriesArgs, catalog: &Catalog, out: &mut dyn Write) -> Result<u8> {
    if !catalog.taxonomy().contains_zone(&args.zone) {
        bail!("unknown zone {:?}", args.zone);
    }
    let geo = catalog.geo();
    for country in catalog.taxonomy().countries_in(&args.zone) {
        let code = geo
            .resolve_territory_code(country)
            .map(|c| c.to_string())
            .unwrap_or_else(|| "-".to_string());
        writeln!(out, "{country}\t{code}\t{}", geo.hover_label(country))?;
    }
    Ok(0)
}

/// Print the sectors available for a country.
pub fn run_sectors(args: &SectorsArgs, catalog: &Catalog, out: &mut dyn Write) -> Result<u8> {
    if !catalog.taxonomy().contains_country(&args.country) {
        bail!("unknown country {:?}", args.country);
    }
    let sectors = catalog.facts().sectors_available_for(&args.country);
    if sectors.is_empty() {
        tracing::info!(country = %args.country, "no records for country");
    }
    for sector in sectors {
        writeln!(out, "{sector}")?;
    }
    Ok(0)
}
