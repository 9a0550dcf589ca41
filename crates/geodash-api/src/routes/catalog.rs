//! # Catalog Queries
//!
//! Read-only views of the taxonomy and fact store, independent of any
//! session. Useful for populating selectors before a session exists.

use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use geodash_view::{zone_map, MapEntry, ZoneMap};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ZonesResponse {
    /// Zone names, sorted.
    pub zones: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ZoneCountriesResponse {
    pub zone: String,
    /// Map title, `"Countries in {zone}"`.
    pub title: String,
    pub countries: Vec<CountryEntry>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CountryEntry {
    pub country: String,
    /// ISO alpha-3 code; empty when the country has none.
    pub territory_code: String,
    pub hover_label: String,
}

impl From<ZoneMap> for ZoneCountriesResponse {
    fn from(map: ZoneMap) -> Self {
        Self {
            zone: map.zone,
            title: map.title,
            countries: map.entries.into_iter().map(CountryEntry::from).collect(),
        }
    }
}

impl From<MapEntry> for CountryEntry {
    fn from(entry: MapEntry) -> Self {
        Self {
            country: entry.country,
            territory_code: entry.territory_code,
            hover_label: entry.hover_label,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SectorsResponse {
    pub country: String,
    /// Sectors with at least one record for the country, sorted.
    pub sectors: Vec<String>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/zones", get(list_zones))
        .route("/v1/zones/{zone}/countries", get(zone_countries))
        .route("/v1/countries/{country}/sectors", get(country_sectors))
}

/// GET /v1/zones — Sorted zone list.
#[utoipa::path(
    get,
    path = "/v1/zones",
    responses(
        (status = 200, description = "Zone names", body = ZonesResponse),
    ),
    tag = "catalog"
)]
pub(crate) async fn list_zones(State(state): State<AppState>) -> Json<ZonesResponse> {
    Json(ZonesResponse {
        zones: state.catalog.taxonomy().zones().to_vec(),
    })
}

/// GET /v1/zones/{zone}/countries — Map entries for a zone.
#[utoipa::path(
    get,
    path = "/v1/zones/{zone}/countries",
    params(("zone" = String, Path, description = "Zone name")),
    responses(
        (status = 200, description = "Countries of the zone with territory codes", body = ZoneCountriesResponse),
        (status = 404, description = "Unknown zone", body = crate::error::ErrorBody),
    ),
    tag = "catalog"
)]
pub(crate) async fn zone_countries(
    State(state): State<AppState>,
    Path(zone): Path<String>,
) -> Result<Json<ZoneCountriesResponse>, AppError> {
    if !state.catalog.taxonomy().contains_zone(&zone) {
        return Err(AppError::NotFound(format!("zone {zone:?} not found")));
    }
    Ok(Json(zone_map(&state.catalog, &zone).into()))
}

/// GET /v1/countries/{country}/sectors — Sectors available for a country.
#[utoipa::path(
    get,
    path = "/v1/countries/{country}/sectors",
    params(("country" = String, Path, description = "Country name as listed in the taxonomy")),
    responses(
        (status = 200, description = "Available sectors", body = SectorsResponse),
        (status = 404, description = "Unknown country", body = crate::error::ErrorBody),
    ),
    tag = "catalog"
)]
pub(crate) async fn country_sectors(
    State(state): State<AppState>,
    Path(country): Path<String>,
) -> Result<Json<SectorsResponse>, AppError> {
    if !state.catalog.taxonomy().contains_country(&country) {
        return Err(AppError::NotFound(format!("country {country:?} not found")));
    }
    let sectors = state
        .catalog
        .facts()
        .sectors_available_for(&country)
        .into_iter()
        .map(str::to_string)
        .collect();
    Ok(Json(SectorsResponse { country, sectors }))
}
