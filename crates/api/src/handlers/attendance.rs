//! Attendance reconciliation endpoints.
//!
//! These read shifts and time entries for a window, convert the rows to
//! domain types, and hand the reconciliation itself to `rosterly-core`.

use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::{Days, NaiveDate, Utc};
use rosterly_core::attendance::{self, DayPoint, DayStatus};
use rosterly_core::error::CoreError;
use rosterly_core::shift::Shift;
use rosterly_core::types::{DbId, Timestamp};
use rosterly_db::models::shift::ShiftFilter;
use rosterly_db::repositories::{ShiftRepo, TimeEntryRepo};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Query parameters for `GET /attendance/day`.
#[derive(Debug, Deserialize)]
pub struct DayQuery {
    pub org_id: DbId,
    pub date: NaiveDate,
}

/// Query parameters for `GET /staff/{staff_id}/attendance/history`.
#[derive(Debug, Deserialize, Validate)]
pub struct HistoryQuery {
    pub org_id: DbId,
    /// Trailing window length in days.
    #[validate(range(min = 1, max = 90))]
    #[serde(default = "default_history_days")]
    pub days: u32,
    /// Last day of the window (inclusive); defaults to today.
    pub end: Option<NaiveDate>,
}

fn default_history_days() -> u32 {
    30
}

/// One assigned shift's reconciliation result for the day view.
#[derive(Debug, Serialize)]
pub struct ShiftCompletion {
    pub shift_id: DbId,
    pub staff_id: DbId,
    pub role: String,
    pub percent: f64,
    pub status: DayStatus,
}

/// The whole team's reconciliation for one calendar day.
#[derive(Debug, Serialize)]
pub struct TeamDayReport {
    pub date: NaiveDate,
    pub shifts: Vec<ShiftCompletion>,
    /// Mean completion across assigned shifts; `None` when nothing scheduled.
    pub average_percent: Option<f64>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/attendance/day
pub async fn team_day(
    State(state): State<AppState>,
    Query(params): Query<DayQuery>,
) -> AppResult<Json<DataResponse<TeamDayReport>>> {
    let (from, to) = day_bounds(params.date)?;
    let now = Utc::now();
    let today = now.date_naive();

    let shifts = load_shifts(&state, params.org_id, from, to).await?;
    let entries = load_entries(&state, params.org_id, None, from, to).await?;

    let mut completions = Vec::new();
    for shift in shifts.iter().filter(|s| !s.is_open) {
        let Some(staff_id) = shift.staff_id else {
            continue;
        };
        let percent = attendance::completion_percent(shift, &entries, now);
        completions.push(ShiftCompletion {
            shift_id: shift.id,
            staff_id,
            role: shift.role.clone(),
            percent,
            status: attendance::classify(Some(percent), params.date, today),
        });
    }

    let average_percent = attendance::team_day_average(&shifts, &entries, params.date, now);
    Ok(Json(DataResponse {
        data: TeamDayReport {
            date: params.date,
            shifts: completions,
            average_percent,
        },
    }))
}

/// GET /api/v1/staff/{staff_id}/attendance/history
pub async fn staff_history(
    State(state): State<AppState>,
    Path(staff_id): Path<DbId>,
    Query(params): Query<HistoryQuery>,
) -> AppResult<Json<DataResponse<Vec<DayPoint>>>> {
    params.validate()?;
    let now = Utc::now();
    let end = params.end.unwrap_or_else(|| now.date_naive());
    let start = end
        .checked_sub_days(Days::new(u64::from(params.days.saturating_sub(1))))
        .unwrap_or(end);
    let (from, _) = day_bounds(start)?;
    let (_, to) = day_bounds(end)?;

    let shifts = load_shifts(&state, params.org_id, from, to).await?;
    let entries = load_entries(&state, params.org_id, Some(staff_id), from, to).await?;

    let points = attendance::history(staff_id, &shifts, &entries, end, params.days, now);
    Ok(Json(DataResponse { data: points }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Half-open UTC bounds `[midnight, next midnight)` for a calendar day.
fn day_bounds(date: NaiveDate) -> Result<(Timestamp, Timestamp), AppError> {
    let next = date
        .checked_add_days(Days::new(1))
        .ok_or_else(|| AppError::Core(CoreError::Validation(format!("date {date} out of range"))))?;
    Ok((
        date.and_hms_opt(0, 0, 0)
            .ok_or_else(|| AppError::Core(CoreError::Validation(format!("invalid date {date}"))))?
            .and_utc(),
        next.and_hms_opt(0, 0, 0)
            .ok_or_else(|| AppError::Core(CoreError::Validation(format!("invalid date {next}"))))?
            .and_utc(),
    ))
}

async fn load_shifts(
    state: &AppState,
    org_id: DbId,
    from: Timestamp,
    to: Timestamp,
) -> Result<Vec<Shift>, AppError> {
    let filter = ShiftFilter {
        from: Some(from),
        to: Some(to),
        ..ShiftFilter::default()
    };
    let rows = ShiftRepo::list(&state.pool, org_id, &filter).await?;
    rows.into_iter()
        .map(|row| row.into_domain().map_err(AppError::Core))
        .collect()
}

async fn load_entries(
    state: &AppState,
    org_id: DbId,
    staff_id: Option<DbId>,
    from: Timestamp,
    to: Timestamp,
) -> Result<Vec<rosterly_core::attendance::TimeEntry>, AppError> {
    let rows = TimeEntryRepo::list(&state.pool, org_id, staff_id, Some(from), Some(to)).await?;
    Ok(rows.into_iter().map(|row| row.into_domain()).collect())
}
