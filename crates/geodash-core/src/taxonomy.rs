//! # Zone / Country / Sector Taxonomy
//!
//! Static hierarchy that drives the first two selectors. Each country
//! belongs to exactly one zone; sectors are a flat, ordered list shared by
//! every country.
//!
//! ## Document Format
//!
//! ```yaml
//! zones:
//!   - name: North America
//!     countries: [USA, Canada, Mexico]
//! sectors: [Energy, Materials]
//! ```
//!
//! List order is declaration order: `countries_in()` and `countries()`
//! follow it, while `zones()` is always sorted lexically.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::CatalogError;
use crate::geo::{normalize, reference_forms};

// ─── Built-in Data ───────────────────────────────────────────────────

/// Built-in zone table, in declaration order.
pub const BUILTIN_ZONES: &[(&str, &[&str])] = &[
    ("North America", &["USA", "Canada", "Mexico"]),
    ("Western Europe", &["France", "Germany", "UK"]),
    ("Southern Europe", &["Italy", "Spain", "Greece"]),
    ("Balkans", &["Serbia", "Romania", "Bulgaria", "Albania"]),
    ("East Asia", &["China", "Japan", "South Korea"]),
    ("Middle East", &["Saudi Arabia", "UAE", "Israel"]),
    ("South America", &["Brazil", "Argentina", "Chile"]),
];

/// Built-in sector list, in declaration order.
pub const BUILTIN_SECTORS: &[&str] = &[
    "Energy",
    "Materials",
    "Industrials",
    "Consumer Discretionary",
    "Consumer Staples",
    "Healthcare",
    "Financials",
    "Information Technology",
    "Telecommunications",
    "Utilities",
    "Real Estate",
];

// ─── Document ────────────────────────────────────────────────────────

/// Serialized form of a taxonomy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxonomyDocument {
    /// Zones with their member countries.
    pub zones: Vec<ZoneDocument>,
    /// Sector names.
    pub sectors: Vec<String>,
}

/// One zone entry in a [`TaxonomyDocument`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneDocument {
    /// Zone display name.
    pub name: String,
    /// Member countries, in display order.
    pub countries: Vec<String>,
}

impl TaxonomyDocument {
    /// The built-in taxonomy as a document.
    pub fn builtin() -> Self {
        Self {
            zones: BUILTIN_ZONES
                .iter()
                .map(|(zone, countries)| ZoneDocument {
                    name: (*zone).to_string(),
                    countries: countries.iter().map(|c| (*c).to_string()).collect(),
                })
                .collect(),
            sectors: BUILTIN_SECTORS.iter().map(|s| (*s).to_string()).collect(),
        }
    }

    /// Check structural rules: non-empty, no duplicates, one zone per country,
    /// one country per territory code.
    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.zones.is_empty() {
            return Err(CatalogError::NoZones);
        }
        let mut seen_zones = HashSet::new();
        let mut zone_of: HashMap<&str, &str> = HashMap::new();
        for zone in &self.zones {
            if !seen_zones.insert(zone.name.as_str()) {
                return Err(CatalogError::DuplicateZone {
                    zone: zone.name.clone(),
                });
            }
            if zone.countries.is_empty() {
                return Err(CatalogError::EmptyZone {
                    zone: zone.name.clone(),
                });
            }
            for country in &zone.countries {
                if let Some(first) = zone_of.insert(country.as_str(), zone.name.as_str()) {
                    return Err(CatalogError::DuplicateCountry {
                        country: country.clone(),
                        first: first.to_string(),
                        second: zone.name.clone(),
                    });
                }
            }
        }

        let forms = reference_forms();
        let mut claimed: HashMap<&str, &str> = HashMap::new();
        for country in self.zones.iter().flat_map(|z| &z.countries) {
            let Some(reference) = forms.get(&normalize(country)) else {
                continue;
            };
            if let Some(first) = claimed.insert(reference.alpha_3, country.as_str()) {
                return Err(CatalogError::DuplicateTerritory {
                    code: reference.alpha_3.to_string(),
                    first: first.to_string(),
                    second: country.clone(),
                });
            }
        }

        if self.sectors.is_empty() {
            return Err(CatalogError::NoSectors);
        }
        let mut seen_sectors = HashSet::new();
        for sector in &self.sectors {
            if !seen_sectors.insert(sector.as_str()) {
                return Err(CatalogError::DuplicateSector {
                    sector: sector.clone(),
                });
            }
        }
        Ok(())
    }
}

// ─── Taxonomy ────────────────────────────────────────────────────────

/// Immutable zone → country hierarchy plus the sector list.
#[derive(Debug, Clone)]
pub struct Taxonomy {
    /// Zone names, sorted and unique.
    zones: Vec<String>,
    /// `(country, zone)` pairs in declaration order.
    countries: Vec<(String, String)>,
    /// Country name → position in `countries`.
    positions: HashMap<String, usize>,
    sectors: Vec<String>,
}

impl Taxonomy {
    /// The built-in taxonomy.
    pub fn builtin() -> Self {
        Self::assemble(TaxonomyDocument::builtin())
    }

    /// Build from a document after validating it.
    pub fn from_document(doc: TaxonomyDocument) -> Result<Self, CatalogError> {
        doc.validate()?;
        Ok(Self::assemble(doc))
    }

    /// Parse and validate a YAML document.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, CatalogError> {
        let doc: TaxonomyDocument = serde_yaml::from_str(yaml)?;
        Self::from_document(doc)
    }

    /// Read, parse and validate a YAML document from disk.
    pub fn from_yaml_file(path: &Path) -> Result<Self, CatalogError> {
        let text = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml_str(&text)
    }

    fn assemble(doc: TaxonomyDocument) -> Self {
        let mut zones: Vec<String> = doc.zones.iter().map(|z| z.name.clone()).collect();
        zones.sort();
        zones.dedup();

        let mut countries = Vec::new();
        let mut positions = HashMap::new();
        for zone in doc.zones {
            for country in zone.countries {
                positions.insert(country.clone(), countries.len());
                countries.push((country, zone.name.clone()));
            }
        }

        Self {
            zones,
            countries,
            positions,
            sectors: doc.sectors,
        }
    }

    /// All zone names, sorted lexically.
    pub fn zones(&self) -> &[String] {
        &self.zones
    }

    /// Whether `zone` is a known zone.
    pub fn contains_zone(&self, zone: &str) -> bool {
        self.zones.binary_search_by(|z| z.as_str().cmp(zone)).is_ok()
    }

    /// Countries of `zone` in declaration order. Empty for an unknown zone.
    pub fn countries_in(&self, zone: &str) -> Vec<&str> {
        self.countries
            .iter()
            .filter(|(_, z)| z == zone)
            .map(|(c, _)| c.as_str())
            .collect()
    }

    /// The zone a country belongs to.
    pub fn zone_of(&self, country: &str) -> Option<&str> {
        self.positions
            .get(country)
            .map(|&i| self.countries[i].1.as_str())
    }

    /// Whether `country` is a known country.
    pub fn contains_country(&self, country: &str) -> bool {
        self.positions.contains_key(country)
    }

    /// Every country in declaration order.
    pub fn countries(&self) -> impl Iterator<Item = &str> {
        self.countries.iter().map(|(c, _)| c.as_str())
    }

    /// Sector names in declaration order.
    pub fn sectors(&self) -> &[String] {
        &self.sectors
    }

    /// Whether `sector` is a declared sector.
    pub fn contains_sector(&self, sector: &str) -> bool {
        self.sectors.iter().any(|s| s == sector)
    }
}

impl Default for Taxonomy {
    fn default() -> Self {
        Self::builtin()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────
