//! Zone staffing ratio endpoints.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use rosterly_core::error::CoreError;
use rosterly_core::types::DbId;
use rosterly_db::models::staffing_ratio::{StaffingRatioRow, UpsertStaffingRatio};
use rosterly_db::repositories::StaffingRatioRepo;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Query carrying the organization scope.
#[derive(Debug, Deserialize)]
pub struct OrgQuery {
    pub org_id: DbId,
}

/// Body for `PUT /staffing-ratios` (upsert by org + zone).
#[derive(Debug, Deserialize)]
pub struct SetRatioRequest {
    pub org_id: DbId,
    pub zone: String,
    pub staff_count: i32,
    pub capacity_per_staff: i32,
}

/// GET /api/v1/staffing-ratios
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<OrgQuery>,
) -> AppResult<Json<DataResponse<Vec<StaffingRatioRow>>>> {
    let ratios = StaffingRatioRepo::list(&state.pool, params.org_id).await?;
    Ok(Json(DataResponse { data: ratios }))
}

/// PUT /api/v1/staffing-ratios
pub async fn upsert(
    State(state): State<AppState>,
    Json(input): Json<SetRatioRequest>,
) -> AppResult<Json<DataResponse<StaffingRatioRow>>> {
    if input.zone.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "zone must not be empty".into(),
        )));
    }
    let dto = UpsertStaffingRatio {
        zone: input.zone,
        staff_count: input.staff_count,
        capacity_per_staff: input.capacity_per_staff,
    };
    let ratio = StaffingRatioRepo::upsert(&state.pool, input.org_id, &dto).await?;
    Ok(Json(DataResponse { data: ratio }))
}

/// DELETE /api/v1/staffing-ratios/{id}
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<StatusCode> {
    let deleted = StaffingRatioRepo::delete(&state.pool, id).await?;
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "StaffingRatio",
            id,
        }))
    }
}
