//! # View Composer
//!
//! `compose()` turns a selection into the bundle the rendering surface
//! draws. What is present depends only on the selection level:
//!
//! | Level | `map` | `sector_options` | `dashboard` |
//! |---|---|---|---|
//! | Empty | – | – | – |
//! | ZoneChosen | ✓ | – | – |
//! | CountryChosen | ✓ | ✓ | – |
//! | SectorChosen | ✓ | ✓ | ✓ |
//!
//! Map entries for countries without a territory code carry an empty code
//! and are passed through unchanged; the map widget shows them as no data.

use geodash_core::{Catalog, FactRecord, COLUMNS};
use geodash_state::Selection;
use serde::{Deserialize, Serialize};

/// Rows per table page on the rendering surface.
pub const TABLE_PAGE_SIZE: usize = 10;

/// Everything derived from one selection.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ViewArtifacts {
    pub map: Option<ZoneMap>,
    pub sector_options: Option<Vec<String>>,
    pub dashboard: Option<Dashboard>,
}

impl ViewArtifacts {
    pub fn is_empty(&self) -> bool {
        self.map.is_none() && self.sector_options.is_none() && self.dashboard.is_none()
    }
}

/// Choropleth data for the chosen zone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneMap {
    pub zone: String,
    pub title: String,
    pub entries: Vec<MapEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapEntry {
    pub country: String,
    /// Alpha-3 code, or empty when the country has none.
    pub territory_code: String,
    pub hover_label: String,
}

/// Charts, table and aggregates for a `(country, sector)` pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dashboard {
    pub country: String,
    pub sector: String,
    /// Filtered records in table order.
    pub records: Vec<FactRecord>,
    pub stock_price: ChartSeries,
    pub market_cap: ChartSeries,
    pub table: TableView,
    pub summary: Summary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Line,
    Bar,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSeries {
    pub title: String,
    pub kind: ChartKind,
    pub x_label: String,
    pub y_label: String,
    pub points: Vec<SeriesPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub label: String,
    pub value: f64,
}

/// Table descriptor; the rows are [`Dashboard::records`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableView {
    pub columns: Vec<String>,
    pub page_size: usize,
}

/// Aggregates over the filtered records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub company_count: usize,
    pub total_market_cap: f64,
    pub total_revenue: f64,
    pub total_employees: u64,
    /// `None` for an empty subset.
    pub mean_stock_price: Option<f64>,
}

/// Derive the artifacts for `selection`.
pub fn compose(catalog: &Catalog, selection: &Selection) -> ViewArtifacts {
    let Some(zone) = selection.zone() else {
        return ViewArtifacts::default();
    };

    let map = Some(zone_map(catalog, zone));

    let Some(country) = selection.country() else {
        return ViewArtifacts {
            map,
            ..ViewArtifacts::default()
        };
    };

    let sector_options = Some(
        catalog
            .facts()
            .sectors_available_for(country)
            .into_iter()
            .map(str::to_string)
            .collect(),
    );

    let dashboard = selection
        .sector()
        .map(|sector| dashboard(catalog, country, sector));

    ViewArtifacts {
        map,
        sector_options,
        dashboard,
    }
}

/// Map entries for every country of `zone`, in taxonomy order.
///
/// The zone is not checked; an unknown zone yields no entries.
pub fn zone_map(catalog: &Catalog, zone: &str) -> ZoneMap {
    let geo = catalog.geo();
    let entries = catalog
        .taxonomy()
        .countries_in(zone)
        .into_iter()
        .map(|country| MapEntry {
            country: country.to_string(),
            territory_code: geo
                .resolve_territory_code(country)
                .map(|code| code.to_string())
                .unwrap_or_default(),
            hover_label: geo.hover_label(country),
        })
        .collect();

    ZoneMap {
        zone: zone.to_string(),
        title: format!("Countries in {zone}"),
        entries,
    }
}

fn dashboard(catalog: &Catalog, country: &str, sector: &str) -> Dashboard {
    let records: Vec<FactRecord> = catalog
        .facts()
        .query_by_country_and_sector(Some(country), Some(sector))
        .into_iter()
        .cloned()
        .collect();

    let stock_price = series(
        format!("Stock Prices in {country}"),
        ChartKind::Line,
        COLUMNS[3],
        &records,
        |r| r.stock_price,
    );
    let market_cap = series(
        format!("Market Capitalization in {country}"),
        ChartKind::Bar,
        COLUMNS[4],
        &records,
        |r| r.market_cap,
    );
    let summary = summarize(&records);

    Dashboard {
        country: country.to_string(),
        sector: sector.to_string(),
        records,
        stock_price,
        market_cap,
        table: TableView {
            columns: COLUMNS.iter().map(|c| (*c).to_string()).collect(),
            page_size: TABLE_PAGE_SIZE,
        },
        summary,
    }
}

fn series(
    title: String,
    kind: ChartKind,
    y_label: &str,
    records: &[FactRecord],
    value: impl Fn(&FactRecord) -> f64,
) -> ChartSeries {
    ChartSeries {
        title,
        kind,
        x_label: COLUMNS[0].to_string(),
        y_label: y_label.to_string(),
        points: records
            .iter()
            .map(|r| SeriesPoint {
                label: r.company.clone(),
                value: value(r),
            })
            .collect(),
    }
}

fn summarize(records: &[FactRecord]) -> Summary {
    let company_count = records.len();
    let total_stock_price: f64 = records.iter().map(|r| r.stock_price).sum();
    Summary {
        company_count,
        total_market_cap: records.iter().map(|r| r.market_cap).sum(),
        total_revenue: records.iter().map(|r| r.revenue).sum(),
        total_employees: records.iter().map(|r| u64::from(r.employees)).sum(),
        mean_stock_price: (company_count > 0).then(|| total_stock_price / company_count as f64),
    }
}
