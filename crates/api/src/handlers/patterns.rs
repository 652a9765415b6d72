//! Handlers for per-staff recurrence patterns and their expansion.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{Days, NaiveDate, Utc};
use rosterly_core::error::CoreError;
use rosterly_core::pattern;
use rosterly_core::pattern::RecurrenceSpec;
use rosterly_core::shift::ShiftStatus;
use rosterly_core::types::DbId;
use rosterly_db::models::schedule_pattern::SchedulePatternRow;
use rosterly_db::models::shift::ShiftRow;
use rosterly_db::repositories::{SchedulePatternRepo, ShiftRepo};
use serde::Deserialize;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Query carrying the organization scope for pattern reads.
#[derive(Debug, Deserialize)]
pub struct OrgQuery {
    pub org_id: DbId,
}

/// Body for `PUT /staff/{staff_id}/pattern`.
#[derive(Debug, Deserialize)]
pub struct SetPatternRequest {
    pub org_id: DbId,
    pub spec: RecurrenceSpec,
}

/// Body for `POST /staff/{staff_id}/pattern/expand`.
#[derive(Debug, Deserialize, Validate)]
pub struct ExpandRequest {
    pub org_id: DbId,
    /// Horizon in whole weeks.
    #[validate(range(min = 1, max = 52))]
    pub weeks: i64,
    /// First day of the horizon; defaults to today.
    pub from: Option<NaiveDate>,
    /// When set, start the day after the staff member's latest existing
    /// shift instead of `from`, so repeated expansion never duplicates
    /// already-generated rows.
    #[serde(default)]
    pub extend: bool,
    /// Insert the generated shifts as published rather than draft.
    #[serde(default)]
    pub publish: bool,
    /// Role label stamped on each generated shift.
    #[serde(default)]
    pub role: String,
}

// ---------------------------------------------------------------------------
// Pattern CRUD
// ---------------------------------------------------------------------------

/// GET /api/v1/staff/{staff_id}/pattern
pub async fn get_for_staff(
    State(state): State<AppState>,
    Path(staff_id): Path<DbId>,
    Query(params): Query<OrgQuery>,
) -> AppResult<Json<DataResponse<SchedulePatternRow>>> {
    let row = SchedulePatternRepo::find_for_staff(&state.pool, params.org_id, staff_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "SchedulePattern",
            id: staff_id,
        }))?;
    Ok(Json(DataResponse { data: row }))
}

/// PUT /api/v1/staff/{staff_id}/pattern
pub async fn set_for_staff(
    State(state): State<AppState>,
    Path(staff_id): Path<DbId>,
    Json(input): Json<SetPatternRequest>,
) -> AppResult<Json<DataResponse<SchedulePatternRow>>> {
    let row = SchedulePatternRepo::upsert(&state.pool, input.org_id, staff_id, &input.spec).await?;
    Ok(Json(DataResponse { data: row }))
}

/// DELETE /api/v1/staff/{staff_id}/pattern
pub async fn delete_for_staff(
    State(state): State<AppState>,
    Path(staff_id): Path<DbId>,
    Query(params): Query<OrgQuery>,
) -> AppResult<StatusCode> {
    let deleted = SchedulePatternRepo::delete_for_staff(&state.pool, params.org_id, staff_id).await?;
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "SchedulePattern",
            id: staff_id,
        }))
    }
}

// ---------------------------------------------------------------------------
// Expansion
// ---------------------------------------------------------------------------

/// POST /api/v1/staff/{staff_id}/pattern/expand
///
/// Expands the staff member's stored pattern over the requested horizon and
/// bulk-inserts the result. The expander itself never deduplicates; the
/// `extend` flag controls that here by moving the start past existing rows.
pub async fn expand(
    State(state): State<AppState>,
    Path(staff_id): Path<DbId>,
    Json(input): Json<ExpandRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<Vec<ShiftRow>>>)> {
    input.validate()?;

    let row = SchedulePatternRepo::find_for_staff(&state.pool, input.org_id, staff_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "SchedulePattern",
            id: staff_id,
        }))?;
    let spec = row.into_domain().map_err(AppError::Core)?;

    let today = Utc::now().date_naive();
    let requested_from = input.from.unwrap_or(today);
    let from = if input.extend {
        match ShiftRepo::latest_end_for_staff(&state.pool, input.org_id, staff_id).await? {
            Some(latest_end) => latest_end
                .date_naive()
                .checked_add_days(Days::new(1))
                .unwrap_or(requested_from),
            None => requested_from,
        }
    } else {
        requested_from
    };

    let status = if input.publish {
        ShiftStatus::Published
    } else {
        ShiftStatus::Draft
    };

    let drafts = pattern::expand(
        &spec,
        input.org_id,
        staff_id,
        &input.role,
        from,
        input.weeks,
        status,
    )
    .map_err(AppError::Core)?;

    let rows = ShiftRepo::create_many(&state.pool, &drafts).await?;
    tracing::info!(
        staff_id,
        from = %from,
        weeks = input.weeks,
        generated = rows.len(),
        "Expanded schedule pattern",
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: rows })))
}
