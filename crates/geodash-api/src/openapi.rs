//! # OpenAPI Specification Assembly
//!
//! Assembles all utoipa-documented routes into a single OpenAPI 3.1
//! document served at `/openapi.json`.

use axum::routing::get;
use axum::{Json, Router};
use utoipa::OpenApi;

use crate::state::AppState;

/// Assembled OpenAPI spec for the entire API surface.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "geodash API",
        version = "0.1.0",
        description = "Zone, country and sector drill-down over a synthetic company dataset, with per-session selection state and CSV export.",
        license(name = "AGPL-3.0-or-later")
    ),
    paths(
        // Catalog
        crate::routes::catalog::list_zones,
        crate::routes::catalog::zone_countries,
        crate::routes::catalog::country_sectors,
        // Sessions
        crate::routes::sessions::create_session,
        crate::routes::sessions::get_session,
        crate::routes::sessions::apply_event,
        crate::routes::sessions::session_history,
        crate::routes::sessions::delete_session,
        crate::routes::export::export_selection,
    ),
    components(schemas(
        // Error types
        crate::error::ErrorBody,
        crate::error::ErrorDetail,
        // Catalog DTOs
        crate::routes::catalog::ZonesResponse,
        crate::routes::catalog::ZoneCountriesResponse,
        crate::routes::catalog::CountryEntry,
        crate::routes::catalog::SectorsResponse,
        // Session DTOs
        crate::routes::sessions::EventRequest,
        crate::routes::sessions::EventResponse,
        crate::routes::sessions::SessionView,
        crate::routes::sessions::HistoryResponse,
    )),
    tags(
        (name = "catalog", description = "Zones, countries and sectors"),
        (name = "sessions", description = "Selection sessions and export"),
    )
)]
pub struct ApiDoc;

/// Serves the OpenAPI JSON spec at `/openapi.json`.
pub fn router() -> Router<AppState> {
    Router::new().route("/openapi.json", get(openapi_json))
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_every_route() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&String> = doc.paths.paths.keys().collect();
        for expected in [
            "/v1/zones",
            "/v1/zones/{zone}/countries",
            "/v1/countries/{country}/sectors",
            "/v1/sessions",
            "/v1/sessions/{id}",
            "/v1/sessions/{id}/events",
            "/v1/sessions/{id}/history",
            "/v1/sessions/{id}/export",
        ] {
            assert!(
                paths.iter().any(|p| p.as_str() == expected),
                "missing {expected}"
            );
        }
    }
}
