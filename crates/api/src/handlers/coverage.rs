//! Demand-driven coverage generation endpoint.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use rosterly_core::coverage::{self, CoverageRequest};
use rosterly_core::shift::ShiftDraft;
use rosterly_core::types::DbId;
use rosterly_db::repositories::{ShiftRepo, StaffingRatioRepo};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Body for `POST /coverage/generate`.
#[derive(Debug, Deserialize)]
pub struct GenerateCoverageRequest {
    pub org_id: DbId,
    pub start_date: chrono::NaiveDate,
    pub end_date: chrono::NaiveDate,
    /// Projected demand per zone, e.g. `{"Daycare": 45}`.
    pub projected_counts: BTreeMap<String, i32>,
    /// When set, insert the generated drafts instead of only previewing them.
    #[serde(default)]
    pub commit: bool,
}

#[derive(Debug, Serialize)]
pub struct CoverageResponse {
    pub shifts: Vec<ShiftDraft>,
    pub skipped_zones: Vec<String>,
    pub committed: bool,
}

/// POST /api/v1/coverage/generate
///
/// Computes the open draft shifts needed to cover the projected counts using
/// the organization's stored staffing ratios. Preview by default; `commit`
/// persists the drafts for review in the roster.
pub async fn generate(
    State(state): State<AppState>,
    Json(input): Json<GenerateCoverageRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<CoverageResponse>>)> {
    let ratios: Vec<_> = StaffingRatioRepo::list(&state.pool, input.org_id)
        .await?
        .into_iter()
        .map(|row| row.into_domain())
        .collect();

    let request = CoverageRequest {
        org_id: input.org_id,
        start_date: input.start_date,
        end_date: input.end_date,
        projected_counts: input.projected_counts,
    };
    let plan = coverage::generate(&request, &ratios, state.config.coverage_window)
        .map_err(AppError::Core)?;

    if input.commit {
        ShiftRepo::create_many(&state.pool, &plan.shifts).await?;
        tracing::info!(
            org_id = input.org_id,
            shifts = plan.shifts.len(),
            skipped = plan.skipped_zones.len(),
            "Committed coverage plan",
        );
    }

    let status = if input.commit {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((
        status,
        Json(DataResponse {
            data: CoverageResponse {
                shifts: plan.shifts,
                skipped_zones: plan.skipped_zones,
                committed: input.commit,
            },
        }),
    ))
}
