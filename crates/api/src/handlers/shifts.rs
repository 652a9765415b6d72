//! Handlers for the `/shifts` resource.
//!
//! Create, update, and publish all route through the conflict-checked
//! repository operations — a shift with an owner is validated against the
//! owner's live published roster immediately before every write.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use rosterly_core::error::CoreError;
use rosterly_core::shift::{ShiftDraft, ShiftStatus};
use rosterly_core::types::{DbId, Timestamp};
use rosterly_db::models::shift::{ShiftFilter, ShiftRow, UpdateShift};
use rosterly_db::repositories::ShiftRepo;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Body for `POST /shifts`. `staff_id = None` creates an open shift.
#[derive(Debug, Deserialize)]
pub struct CreateShiftRequest {
    pub org_id: DbId,
    pub staff_id: Option<DbId>,
    pub start_at: Timestamp,
    pub end_at: Timestamp,
    #[serde(default)]
    pub role: String,
    pub status: Option<ShiftStatus>,
    #[serde(default)]
    pub is_open: bool,
    pub notes: Option<String>,
}

/// Query parameters for `GET /shifts`.
#[derive(Debug, Deserialize)]
pub struct ListShiftsQuery {
    pub org_id: DbId,
    pub staff_id: Option<DbId>,
    pub status: Option<ShiftStatus>,
    pub from: Option<Timestamp>,
    pub to: Option<Timestamp>,
}

/// Query parameters for `DELETE /staff/{staff_id}/shifts`.
#[derive(Debug, Deserialize)]
pub struct ClearShiftsQuery {
    pub org_id: DbId,
    /// Remove shifts starting at or after this instant.
    pub from: Timestamp,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/shifts
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateShiftRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<ShiftRow>>)> {
    if input.end_at <= input.start_at {
        return Err(AppError::Core(CoreError::Validation(
            "end_at must be after start_at".into(),
        )));
    }

    let draft = ShiftDraft {
        org_id: input.org_id,
        staff_id: input.staff_id,
        start_at: input.start_at,
        end_at: input.end_at,
        role: input.role,
        status: input.status.unwrap_or(ShiftStatus::Draft),
        is_open: input.is_open || input.staff_id.is_none(),
        notes: input.notes,
    };

    let shift = ShiftRepo::create_checked(&state.pool, &draft).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: shift })))
}

/// GET /api/v1/shifts
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListShiftsQuery>,
) -> AppResult<Json<DataResponse<Vec<ShiftRow>>>> {
    let filter = ShiftFilter {
        staff_id: params.staff_id,
        status: params.status,
        from: params.from,
        to: params.to,
    };
    let shifts = ShiftRepo::list(&state.pool, params.org_id, &filter).await?;
    Ok(Json(DataResponse { data: shifts }))
}

/// GET /api/v1/shifts/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<ShiftRow>>> {
    let shift = ShiftRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Shift", id }))?;
    Ok(Json(DataResponse { data: shift }))
}

/// PUT /api/v1/shifts/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateShift>,
) -> AppResult<Json<DataResponse<ShiftRow>>> {
    let shift = ShiftRepo::update_checked(&state.pool, id, &input).await?;
    Ok(Json(DataResponse { data: shift }))
}

/// POST /api/v1/shifts/{id}/publish
pub async fn publish(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<ShiftRow>>> {
    let shift = ShiftRepo::publish(&state.pool, id).await?;
    Ok(Json(DataResponse { data: shift }))
}

/// DELETE /api/v1/shifts/{id}
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<StatusCode> {
    let deleted = ShiftRepo::delete(&state.pool, id).await?;
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound { entity: "Shift", id }))
    }
}

/// DELETE /api/v1/staff/{staff_id}/shifts
///
/// Clears a staff member's upcoming shifts (pattern-clear) without touching
/// history before `from`.
pub async fn delete_for_staff(
    State(state): State<AppState>,
    Path(staff_id): Path<DbId>,
    Query(params): Query<ClearShiftsQuery>,
) -> AppResult<Json<DataResponse<u64>>> {
    let removed =
        ShiftRepo::delete_for_staff_from(&state.pool, params.org_id, staff_id, params.from).await?;
    tracing::info!(staff_id, removed, "Cleared upcoming shifts");
    Ok(Json(DataResponse { data: removed }))
}
