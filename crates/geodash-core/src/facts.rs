//! # Fact Store
//!
//! The immutable company table. Queries are equality filters on
//! `(country, sector)`; both filters are required, so the dashboard never
//! renders the unfiltered table.
//!
//! A nested `country → sector → row indices` index is built once at
//! construction. Results are always returned in table order and
//! are identical to a full scan.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Column headers, in table and export order.
pub const COLUMNS: [&str; 7] = [
    "Company",
    "Country",
    "Sector",
    "Stock Price",
    "Market Cap ($B)",
    "Revenue ($B)",
    "Employees",
];

/// One row of the synthetic company dataset.
///
/// Field names serialize as the display column names so that JSON rows and
/// CSV headers line up with [`COLUMNS`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactRecord {
    #[serde(rename = "Company")]
    pub company: String,
    #[serde(rename = "Country")]
    pub country: String,
    #[serde(rename = "Sector")]
    pub sector: String,
    #[serde(rename = "Stock Price")]
    pub stock_price: f64,
    #[serde(rename = "Market Cap ($B)")]
    pub market_cap: f64,
    #[serde(rename = "Revenue ($B)")]
    pub revenue: f64,
    #[serde(rename = "Employees")]
    pub employees: u32,
}

/// Immutable table of [`FactRecord`]s with a `(country, sector)` index.
#[derive(Debug, Clone, Default)]
pub struct FactStore {
    records: Vec<FactRecord>,
    index: BTreeMap<String, BTreeMap<String, Vec<usize>>>,
}

impl FactStore {
    /// Take ownership of `records` and index them.
    pub fn new(records: Vec<FactRecord>) -> Self {
        let mut index: BTreeMap<String, BTreeMap<String, Vec<usize>>> = BTreeMap::new();
        for (row, record) in records.iter().enumerate() {
            index
                .entry(record.country.clone())
                .or_default()
                .entry(record.sector.clone())
                .or_default()
                .push(row);
        }
        Self { records, index }
    }

    /// Records matching both filters, in table order.
    ///
    /// Returns an empty result when either filter is `None`.
    pub fn query_by_country_and_sector(
        &self,
        country: Option<&str>,
        sector: Option<&str>,
    ) -> Vec<&FactRecord> {
        let (Some(country), Some(sector)) = (country, sector) else {
            return Vec::new();
        };
        self.index
            .get(country)
            .and_then(|sectors| sectors.get(sector))
            .map(|rows| rows.iter().map(|&row| &self.records[row]).collect())
            .unwrap_or_default()
    }

    /// Sectors present among the records of `country`, sorted lexically.
    pub fn sectors_available_for(&self, country: &str) -> Vec<&str> {
        self.index
            .get(country)
            .map(|sectors| sectors.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Whether at least one record has this `(country, sector)` pair.
    pub fn has_sector(&self, country: &str, sector: &str) -> bool {
        self.index
            .get(country)
            .is_some_and(|sectors| sectors.contains_key(sector))
    }

    /// Whether at least one record has this country.
    pub fn has_country(&self, country: &str) -> bool {
        self.index.contains_key(country)
    }

    /// The whole table.
    pub fn records(&self) -> &[FactRecord] {
        &self.records
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
