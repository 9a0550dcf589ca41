//! # CSV Export
//!
//! Download of the `(country, sector)` subset a session currently shows.
//! Only available once a sector is chosen.

use std::time::Instant;

use axum::extract::{Path, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use geodash_view::download_for;
use uuid::Uuid;

use crate::error::AppError;
use crate::middleware::metrics::EXPORTS_TOTAL;
use crate::routes::sessions::session_handle;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/v1/sessions/{id}/export", get(export_selection))
}

/// GET /v1/sessions/{id}/export — CSV of the selected country and sector.
#[utoipa::path(
    get,
    path = "/v1/sessions/{id}/export",
    params(("id" = Uuid, Path, description = "Session ID")),
    responses(
        (status = 200, description = "CSV attachment", content_type = "text/csv", body = String),
        (status = 404, description = "Not found", body = crate::error::ErrorBody),
        (status = 409, description = "No sector chosen yet", body = crate::error::ErrorBody),
    ),
    tag = "sessions"
)]
pub(crate) async fn export_selection(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let handle = session_handle(&state, &id)?;

    let start = Instant::now();
    let download = {
        let session = handle.lock();
        download_for(&state.catalog, session.machine.selection())?
    };
    let download = download.ok_or_else(|| {
        AppError::Conflict("choose a zone, country and sector before exporting".to_string())
    })?;

    ::metrics::counter!(EXPORTS_TOTAL).increment(1);
    tracing::debug!(
        session = %id,
        filename = %download.filename,
        bytes = download.bytes.len(),
        elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
        "export generated"
    );

    let disposition = download.content_disposition();
    Ok((
        [
            (header::CONTENT_TYPE, download.content_type.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        download.bytes,
    )
        .into_response())
}
