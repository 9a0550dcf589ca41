//! # Territory Code Resolution
//!
//! Maps taxonomy country names to ISO 3166-1 alpha-3 territory codes and
//! back. The map widget colors and reports clicks by territory code, so
//! this is the bridge between map interactions and the country selector.
//!
//! ## Matching Rule
//!
//! A taxonomy country resolves when its normalized name (lowercase,
//! alphanumerics only) equals the normalized form of any of a reference
//! entry's name, official name, common name, alpha-3 or alpha-2 code.
//! `"USA"` therefore resolves through the alpha-3 form and `"South Korea"`
//! through the common name. `"UK"` and `"UAE"` match no form and stay
//! unresolved: no alias table is guessed on top of the reference data.
//!
//! `resolve_country_name()` answers in the taxonomy's spelling, so the
//! round trip through a code is exact.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::taxonomy::Taxonomy;

/// One row of the ISO 3166 reference table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TerritoryRef {
    pub alpha_2: &'static str,
    pub alpha_3: &'static str,
    pub name: &'static str,
    pub official_name: Option<&'static str>,
    pub common_name: Option<&'static str>,
}

const fn territory(
    alpha_2: &'static str,
    alpha_3: &'static str,
    name: &'static str,
    official_name: Option<&'static str>,
    common_name: Option<&'static str>,
) -> TerritoryRef {
    TerritoryRef {
        alpha_2,
        alpha_3,
        name,
        official_name,
        common_name,
    }
}

/// Reference territories known to the resolver.
pub const TERRITORIES: &[TerritoryRef] = &[
    // Americas
    territory("US", "USA", "United States", Some("United States of America"), None),
    territory("CA", "CAN", "Canada", None, None),
    territory("MX", "MEX", "Mexico", Some("United Mexican States"), None),
    territory("BR", "BRA", "Brazil", Some("Federative Republic of Brazil"), None),
    territory("AR", "ARG", "Argentina", Some("Argentine Republic"), None),
    territory("CL", "CHL", "Chile", Some("Republic of Chile"), None),
    territory("CO", "COL", "Colombia", Some("Republic of Colombia"), None),
    territory("PE", "PER", "Peru", Some("Republic of Peru"), None),
    territory("UY", "URY", "Uruguay", Some("Eastern Republic of Uruguay"), None),
    territory("PY", "PRY", "Paraguay", Some("Republic of Paraguay"), None),
    territory("BO", "BOL", "Bolivia, Plurinational State of", Some("Plurinational State of Bolivia"), Some("Bolivia")),
    territory("VE", "VEN", "Venezuela, Bolivarian Republic of", Some("Bolivarian Republic of Venezuela"), Some("Venezuela")),
    // Europe
    territory("FR", "FRA", "France", Some("French Republic"), None),
    territory("DE", "DEU", "Germany", Some("Federal Republic of Germany"), None),
    territory("GB", "GBR", "United Kingdom", Some("United Kingdom of Great Britain and Northern Ireland"), None),
    territory("IE", "IRL", "Ireland", None, None),
    territory("BE", "BEL", "Belgium", Some("Kingdom of Belgium"), None),
    territory("NL", "NLD", "Netherlands", Some("Kingdom of the Netherlands"), None),
    territory("CH", "CHE", "Switzerland", Some("Swiss Confederation"), None),
    territory("AT", "AUT", "Austria", Some("Republic of Austria"), None),
    territory("IT", "ITA", "Italy", Some("Italian Republic"), None),
    territory("ES", "ESP", "Spain", Some("Kingdom of Spain"), None),
    territory("PT", "PRT", "Portugal", Some("Portuguese Republic"), None),
    territory("GR", "GRC", "Greece", Some("Hellenic Republic"), None),
    territory("PL", "POL", "Poland", Some("Republic of Poland"), None),
    territory("CZ", "CZE", "Czechia", Some("Czech Republic"), None),
    territory("RS", "SRB", "Serbia", Some("Republic of Serbia"), None),
    territory("RO", "ROU", "Romania", None, None),
    territory("BG", "BGR", "Bulgaria", Some("Republic of Bulgaria"), None),
    territory("AL", "ALB", "Albania", Some("Republic of Albania"), None),
    territory("HR", "HRV", "Croatia", Some("Republic of Croatia"), None),
    territory("BA", "BIH", "Bosnia and Herzegovina", Some("Republic of Bosnia and Herzegovina"), None),
    territory("ME", "MNE", "Montenegro", None, None),
    territory("MK", "MKD", "North Macedonia", Some("Republic of North Macedonia"), None),
    territory("TR", "TUR", "Türkiye", Some("Republic of Türkiye"), None),
    territory("RU", "RUS", "Russian Federation", None, None),
    // Asia
    territory("CN", "CHN", "China", Some("People's Republic of China"), None),
    territory("JP", "JPN", "Japan", None, None),
    territory("KR", "KOR", "Korea, Republic of", None, Some("South Korea")),
    territory("KP", "PRK", "Korea, Democratic People's Republic of", Some("Democratic People's Republic of Korea"), Some("North Korea")),
    territory("TW", "TWN", "Taiwan, Province of China", Some("Taiwan, Province of China"), Some("Taiwan")),
    territory("MN", "MNG", "Mongolia", None, None),
    territory("IN", "IND", "India", Some("Republic of India"), None),
    // Middle East
    territory("SA", "SAU", "Saudi Arabia", Some("Kingdom of Saudi Arabia"), None),
    territory("AE", "ARE", "United Arab Emirates", None, None),
    territory("IL", "ISR", "Israel", Some("State of Israel"), None),
    territory("JO", "JOR", "Jordan", Some("Hashemite Kingdom of Jordan"), None),
    territory("IQ", "IRQ", "Iraq", Some("Republic of Iraq"), None),
    territory("IR", "IRN", "Iran, Islamic Republic of", Some("Islamic Republic of Iran"), Some("Iran")),
    territory("EG", "EGY", "Egypt", Some("Arab Republic of Egypt"), None),
    // Oceania
    territory("AU", "AUS", "Australia", None, None),
];

/// ISO 3166-1 alpha-3 territory code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TerritoryCode(String);

impl TerritoryCode {
    fn from_ref(reference: &TerritoryRef) -> Self {
        Self(reference.alpha_3.to_string())
    }

    /// The code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TerritoryCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl PartialEq<&str> for TerritoryCode {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

pub(crate) fn normalize(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Normalized name and code forms of every reference row. Name forms take
/// precedence over code forms.
pub(crate) fn reference_forms() -> HashMap<String, &'static TerritoryRef> {
    let mut forms: HashMap<String, &'static TerritoryRef> = HashMap::new();
    for reference in TERRITORIES {
        let names = [Some(reference.name), reference.official_name, reference.common_name];
        for name in names.into_iter().flatten() {
            forms.entry(normalize(name)).or_insert(reference);
        }
    }
    for reference in TERRITORIES {
        forms.entry(normalize(reference.alpha_3)).or_insert(reference);
        forms.entry(normalize(reference.alpha_2)).or_insert(reference);
    }
    forms
}

/// Bidirectional `country ↔ territory code` map for one taxonomy.
#[derive(Debug, Clone)]
pub struct GeoResolver {
    /// Normalized taxonomy name → reference row.
    by_country: HashMap<String, &'static TerritoryRef>,
    /// Alpha-3 code → taxonomy spelling.
    by_code: HashMap<&'static str, String>,
    /// Taxonomy countries with no reference match, in declaration order.
    unresolved: Vec<String>,
}

impl GeoResolver {
    /// Build the resolver for every country of `taxonomy`.
    ///
    /// A taxonomy claims each territory code at most once: loading rejects
    /// two countries resolving to the same row with
    /// [`crate::CatalogError::DuplicateTerritory`].
    pub fn new(taxonomy: &Taxonomy) -> Self {
        let forms = reference_forms();

        let mut by_country = HashMap::new();
        let mut by_code = HashMap::new();
        let mut unresolved = Vec::new();
        for country in taxonomy.countries() {
            let key = normalize(country);
            match forms.get(&key) {
                Some(reference) => {
                    by_code
                        .entry(reference.alpha_3)
                        .or_insert_with(|| country.to_string());
                    by_country.insert(key, *reference);
                }
                None => unresolved.push(country.to_string()),
            }
        }

        Self {
            by_country,
            by_code,
            unresolved,
        }
    }

    /// Territory code of a taxonomy country. Case- and punctuation-insensitive.
    pub fn resolve_territory_code(&self, country: &str) -> Option<TerritoryCode> {
        self.reference_for(country).map(TerritoryCode::from_ref)
    }

    /// Taxonomy country for a territory code. Case-insensitive.
    pub fn resolve_country_name(&self, code: &str) -> Option<&str> {
        let code = code.trim().to_ascii_uppercase();
        self.by_code.get(code.as_str()).map(String::as_str)
    }

    /// Map hover text: `"{country} / {alpha-2}"`, or the bare name when unresolved.
    pub fn hover_label(&self, country: &str) -> String {
        match self.reference_for(country) {
            Some(reference) => format!("{country} / {}", reference.alpha_2),
            None => country.to_string(),
        }
    }

    /// Taxonomy countries that have no territory code.
    pub fn unresolved(&self) -> &[String] {
        &self.unresolved
    }

    fn reference_for(&self, country: &str) -> Option<&'static TerritoryRef> {
        self.by_country.get(&normalize(country)).copied()
    }
}
