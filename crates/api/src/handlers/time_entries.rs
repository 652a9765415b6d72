//! Clock-in/out endpoints for time entries.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use rosterly_core::error::CoreError;
use rosterly_core::types::{DbId, Timestamp};
use rosterly_db::models::time_entry::TimeEntryRow;
use rosterly_db::repositories::TimeEntryRepo;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Body for `POST /time-entries/clock-in`.
#[derive(Debug, Deserialize)]
pub struct ClockInRequest {
    pub org_id: DbId,
    pub staff_id: DbId,
    /// Clock-in instant; defaults to now.
    pub at: Option<Timestamp>,
}

/// Body for `POST /time-entries/{id}/clock-out`.
#[derive(Debug, Deserialize)]
pub struct ClockOutRequest {
    /// Clock-out instant; defaults to now.
    pub at: Option<Timestamp>,
    pub break_minutes: Option<i32>,
}

/// Query parameters for `GET /time-entries`.
#[derive(Debug, Deserialize)]
pub struct ListEntriesQuery {
    pub org_id: DbId,
    pub staff_id: Option<DbId>,
    pub from: Option<Timestamp>,
    pub to: Option<Timestamp>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/time-entries/clock-in
pub async fn clock_in(
    State(state): State<AppState>,
    Json(input): Json<ClockInRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<TimeEntryRow>>)> {
    let at = input.at.unwrap_or_else(Utc::now);
    let entry = TimeEntryRepo::clock_in(&state.pool, input.org_id, input.staff_id, at).await?;
    tracing::debug!(staff_id = input.staff_id, entry_id = entry.id, "Clock-in");
    Ok((StatusCode::CREATED, Json(DataResponse { data: entry })))
}

/// POST /api/v1/time-entries/{id}/clock-out
pub async fn clock_out(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<ClockOutRequest>,
) -> AppResult<Json<DataResponse<TimeEntryRow>>> {
    let at = input.at.unwrap_or_else(Utc::now);
    let entry = TimeEntryRepo::clock_out(&state.pool, id, at, input.break_minutes)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "TimeEntry",
            id,
        }))?;
    Ok(Json(DataResponse { data: entry }))
}

/// GET /api/v1/time-entries
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListEntriesQuery>,
) -> AppResult<Json<DataResponse<Vec<TimeEntryRow>>>> {
    let entries = TimeEntryRepo::list(
        &state.pool,
        params.org_id,
        params.staff_id,
        params.from,
        params.to,
    )
    .await?;
    Ok(Json(DataResponse { data: entries }))
}
