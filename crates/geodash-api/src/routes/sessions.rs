//! # Session API
//!
//! Each session owns one selection state machine. Events are applied under
//! the session's own lock and the response carries the resulting selection,
//! visible widgets and derived view, recomputed from scratch.
//!
//! Ignored events are reported with `"outcome": "ignored"` and a reason;
//! they are never HTTP errors.

use std::time::Instant;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use geodash_core::Catalog;
use geodash_state::{
    IgnoreReason, Outcome, SelectionEvent, SelectionLevel, SelectionSnapshot, TransitionRecord,
    Widget, HISTORY_LIMIT,
};
use geodash_view::{compose, ViewArtifacts};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::AppError;
use crate::extractors::{extract_validated_json, FieldError, Validate, MAX_FIELD_LEN};
use crate::middleware::metrics::{COMPOSE_SECONDS, SELECTION_EVENTS_TOTAL};
use crate::state::{AppState, Session, SessionHandle};

/// Selection event, tagged by `type`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventRequest {
    SetZone { zone: String },
    /// `code` is an ISO alpha-3 code, as reported by the map widget.
    MapClicked { code: String },
    SetSector { sector: String },
    Reset,
}

/// Size limits only. Unknown values are not rejected here: they become
/// ignored outcomes in the state machine.
impl Validate for EventRequest {
    fn validate(&self) -> Result<(), FieldError> {
        let (field, value) = match self {
            Self::SetZone { zone } => ("zone", zone),
            Self::MapClicked { code } => ("code", code),
            Self::SetSector { sector } => ("sector", sector),
            Self::Reset => return Ok(()),
        };
        if value.len() > MAX_FIELD_LEN {
            return Err(FieldError::too_long(field, MAX_FIELD_LEN));
        }
        Ok(())
    }
}

impl From<EventRequest> for SelectionEvent {
    fn from(req: EventRequest) -> Self {
        match req {
            EventRequest::SetZone { zone } => Self::SetZone { zone },
            EventRequest::MapClicked { code } => Self::MapClicked { code },
            EventRequest::SetSector { sector } => Self::SetSector { sector },
            EventRequest::Reset => Self::Reset,
        }
    }
}

/// A session's selection, widgets and derived view.
#[derive(Debug, Serialize, ToSchema)]
pub struct SessionView {
    pub id: Uuid,
    #[schema(value_type = Object)]
    pub selection: SelectionSnapshot,
    /// Widgets visible at the current selection level.
    #[schema(value_type = Vec<String>)]
    pub widgets: Vec<Widget>,
    #[schema(value_type = Object)]
    pub view: ViewArtifacts,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Result of applying one event.
#[derive(Debug, Serialize, ToSchema)]
pub struct EventResponse {
    /// `applied` or `ignored`.
    pub outcome: String,
    /// Why the event was ignored.
    #[schema(value_type = Option<String>)]
    pub reason: Option<IgnoreReason>,
    #[schema(value_type = Option<String>)]
    pub from: Option<SelectionLevel>,
    #[schema(value_type = Option<String>)]
    pub to: Option<SelectionLevel>,
    pub session: SessionView,
}

impl EventResponse {
    fn new(outcome: Outcome, session: SessionView) -> Self {
        match outcome {
            Outcome::Applied { from, to } => Self {
                outcome: "applied".to_string(),
                reason: None,
                from: Some(from),
                to: Some(to),
                session,
            },
            Outcome::Ignored { reason } => Self {
                outcome: "ignored".to_string(),
                reason: Some(reason),
                from: None,
                to: None,
                session,
            },
        }
    }
}

/// Applied transitions, oldest first.
#[derive(Debug, Serialize, ToSchema)]
pub struct HistoryResponse {
    pub id: Uuid,
    /// Maximum number of retained transitions.
    pub limit: usize,
    #[schema(value_type = Vec<Object>)]
    pub transitions: Vec<TransitionRecord>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/sessions", post(create_session))
        .route("/v1/sessions/{id}", get(get_session).delete(delete_session))
        .route("/v1/sessions/{id}/events", post(apply_event))
        .route("/v1/sessions/{id}/history", get(session_history))
}

/// Look up a session or fail with 404.
pub(crate) fn session_handle(state: &AppState, id: &Uuid) -> Result<SessionHandle, AppError> {
    state
        .sessions
        .get(id)
        .ok_or_else(|| AppError::NotFound(format!("session {id} not found")))
}

/// Compose the view for `session`. Runs under the session lock.
fn render(catalog: &Catalog, session: &Session) -> SessionView {
    let selection = session.machine.selection();
    let start = Instant::now();
    let view = compose(catalog, selection);
    let elapsed = start.elapsed();

    ::metrics::histogram!(COMPOSE_SECONDS).record(elapsed.as_secs_f64());
    tracing::debug!(
        session = %session.id,
        level = %selection.level(),
        elapsed_ms = elapsed.as_secs_f64() * 1000.0,
        "view composed"
    );

    SessionView {
        id: session.id,
        selection: selection.snapshot(),
        widgets: selection.widgets(),
        view,
        created_at: session.created_at,
        updated_at: session.updated_at,
    }
}

/// POST /v1/sessions — Start a session in the empty state.
#[utoipa::path(
    post,
    path = "/v1/sessions",
    responses(
        (status = 201, description = "Session created", body = SessionView),
        (status = 503, description = "Session limit reached", body = crate::error::ErrorBody),
    ),
    tag = "sessions"
)]
pub(crate) async fn create_session(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<SessionView>), AppError> {
    let limit = state.config.max_sessions;
    let handle = state.open_session().ok_or_else(|| {
        tracing::warn!(limit, "session limit reached");
        AppError::SessionLimit { limit }
    })?;
    let view = render(&state.catalog, &handle.lock());
    tracing::info!(session = %view.id, "session created");
    Ok((StatusCode::CREATED, Json(view)))
}

/// GET /v1/sessions/{id} — Current selection and view.
#[utoipa::path(
    get,
    path = "/v1/sessions/{id}",
    params(("id" = Uuid, Path, description = "Session ID")),
    responses(
        (status = 200, description = "Session found", body = SessionView),
        (status = 404, description = "Not found", body = crate::error::ErrorBody),
    ),
    tag = "sessions"
)]
pub(crate) async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    let handle = session_handle(&state, &id)?;
    let view = render(&state.catalog, &handle.lock());
    Ok(Json(view))
}

/// POST /v1/sessions/{id}/events — Apply a selection event.
#[utoipa::path(
    post,
    path = "/v1/sessions/{id}/events",
    params(("id" = Uuid, Path, description = "Session ID")),
    request_body = EventRequest,
    responses(
        (status = 200, description = "Event applied or ignored", body = EventResponse),
        (status = 400, description = "Malformed event", body = crate::error::ErrorBody),
        (status = 404, description = "Not found", body = crate::error::ErrorBody),
        (status = 422, description = "Oversized event field", body = crate::error::ErrorBody),
    ),
    tag = "sessions"
)]
pub(crate) async fn apply_event(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    body: Result<Json<EventRequest>, JsonRejection>,
) -> Result<Json<EventResponse>, AppError> {
    let event = SelectionEvent::from(extract_validated_json(body)?);
    let handle = session_handle(&state, &id)?;

    let response = {
        let mut session = handle.lock();
        let outcome = session.machine.apply(&state.catalog, &event);
        if outcome.is_applied() {
            session.updated_at = Utc::now();
        }

        ::metrics::counter!(SELECTION_EVENTS_TOTAL, "outcome" => outcome.label()).increment(1);
        match &outcome {
            Outcome::Applied { from, to } => tracing::info!(
                session = %id,
                event = event.kind(),
                from = %from,
                to = %to,
                "selection changed"
            ),
            Outcome::Ignored { reason } => tracing::debug!(
                session = %id,
                event = event.kind(),
                reason = %reason,
                "selection event ignored"
            ),
        }

        EventResponse::new(outcome, render(&state.catalog, &session))
    };

    Ok(Json(response))
}

/// GET /v1/sessions/{id}/history — Bounded transition log.
#[utoipa::path(
    get,
    path = "/v1/sessions/{id}/history",
    params(("id" = Uuid, Path, description = "Session ID")),
    responses(
        (status = 200, description = "Applied transitions, oldest first", body = HistoryResponse),
        (status = 404, description = "Not found", body = crate::error::ErrorBody),
    ),
    tag = "sessions"
)]
pub(crate) async fn session_history(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<HistoryResponse>, AppError> {
    let handle = session_handle(&state, &id)?;
    let transitions = handle.lock().machine.history().cloned().collect();
    Ok(Json(HistoryResponse {
        id,
        limit: HISTORY_LIMIT,
        transitions,
    }))
}

/// DELETE /v1/sessions/{id} — End a session.
#[utoipa::path(
    delete,
    path = "/v1/sessions/{id}",
    params(("id" = Uuid, Path, description = "Session ID")),
    responses(
        (status = 204, description = "Session ended"),
        (status = 404, description = "Not found", body = crate::error::ErrorBody),
    ),
    tag = "sessions"
)]
pub(crate) async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state
        .sessions
        .remove(&id)
        .ok_or_else(|| AppError::NotFound(format!("session {id} not found")))?;
    tracing::info!(session = %id, "session ended");
    Ok(StatusCode::NO_CONTENT)
}
