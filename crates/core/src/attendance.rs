//! Planned-vs-worked reconciliation.
//!
//! Matches committed shifts to recorded time entries, computes per-shift
//! completion percentages, and rolls them up into day-level and trailing
//! history aggregates for the dashboards.
//!
//! Shift↔entry matching is a heuristic (same staff, same clock-in calendar
//! date), not a foreign key. The matcher is an explicit function returning
//! `Option` so the ambiguity stays visible and testable.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::interval::{clamp_percent, duration_ms};
use crate::shift::Shift;
use crate::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Thresholds
// ---------------------------------------------------------------------------

/// Completion percentage at or above which a day counts as complete.
pub const COMPLETE_THRESHOLD: f64 = 95.0;

// ---------------------------------------------------------------------------
// Time entries
// ---------------------------------------------------------------------------

/// An actual worked interval. `clock_out = None` means currently active.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeEntry {
    pub id: DbId,
    pub staff_id: DbId,
    pub clock_in: Timestamp,
    pub clock_out: Option<Timestamp>,
    pub break_minutes: i32,
}

// ---------------------------------------------------------------------------
// Matching
// ---------------------------------------------------------------------------

/// Find the time entry fulfilling `shift`: same staff id, clock-in calendar
/// date equal to the shift's start date.
///
/// With two same-day shifts (a split shift) the first matching entry wins;
/// the store records no shift↔entry link to disambiguate further.
pub fn match_entry<'a>(shift: &Shift, entries: &'a [TimeEntry]) -> Option<&'a TimeEntry> {
    let staff_id = shift.staff_id?;
    let shift_day = shift.start_at.date_naive();
    entries
        .iter()
        .find(|e| e.staff_id == staff_id && e.clock_in.date_naive() == shift_day)
}

// ---------------------------------------------------------------------------
// Per-shift completion
// ---------------------------------------------------------------------------

/// Fraction of the shift's scheduled duration actually worked, in `[0, 100]`.
///
/// Worked time runs from clock-in to clock-out, or to `now` for an active
/// entry. Staying late is capped at 100, never over-credited. No matching
/// entry is a defined `0` (missed), not an error.
pub fn completion_percent(shift: &Shift, entries: &[TimeEntry], now: Timestamp) -> f64 {
    let Some(entry) = match_entry(shift, entries) else {
        return 0.0;
    };
    let scheduled = duration_ms(shift.start_at, shift.end_at);
    if scheduled == 0 {
        return 0.0;
    }
    let worked = duration_ms(entry.clock_in, entry.clock_out.unwrap_or(now));
    clamp_percent(worked as f64 / scheduled as f64 * 100.0)
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

/// Day-level attendance classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayStatus {
    /// Completion at or above [`COMPLETE_THRESHOLD`].
    Complete,
    /// Some work recorded (or a shift not yet in the past) but below the
    /// completion threshold.
    Partial,
    /// A shift was scheduled on a past day with nothing worked.
    Missed,
    /// No shift scheduled that day.
    Off,
}

/// Classify one day's completion. `percent = None` means no shift scheduled.
pub fn classify(percent: Option<f64>, day: NaiveDate, today: NaiveDate) -> DayStatus {
    match percent {
        None => DayStatus::Off,
        Some(p) if p >= COMPLETE_THRESHOLD => DayStatus::Complete,
        Some(p) if p > 0.0 => DayStatus::Partial,
        // Nothing worked: only a past day counts as missed.
        Some(_) if day < today => DayStatus::Missed,
        Some(_) => DayStatus::Partial,
    }
}

// ---------------------------------------------------------------------------
// Aggregates
// ---------------------------------------------------------------------------

/// Mean completion across all non-open shifts scheduled on `day`, or `None`
/// when nothing was scheduled.
pub fn team_day_average(
    shifts: &[Shift],
    entries: &[TimeEntry],
    day: NaiveDate,
    now: Timestamp,
) -> Option<f64> {
    let percents: Vec<f64> = shifts
        .iter()
        .filter(|s| !s.is_open && s.start_at.date_naive() == day)
        .map(|s| completion_percent(s, entries, now))
        .collect();
    if percents.is_empty() {
        return None;
    }
    Some(percents.iter().sum::<f64>() / percents.len() as f64)
}

/// One day in a staff member's attendance history.
#[derive(Debug, Clone, Serialize)]
pub struct DayPoint {
    pub date: NaiveDate,
    /// `None` when no shift was scheduled (an off day).
    pub percent: Option<f64>,
    pub status: DayStatus,
}

/// Trailing attendance series for one staff member: one point per calendar
/// day over the `days` days ending at `end` (inclusive), oldest first.
///
/// A day with multiple shifts (split shift) reports their mean completion.
pub fn history(
    staff_id: DbId,
    shifts: &[Shift],
    entries: &[TimeEntry],
    end: NaiveDate,
    days: u32,
    now: Timestamp,
) -> Vec<DayPoint> {
    let today = now.date_naive();
    let mut points = Vec::with_capacity(days as usize);

    for back in (0..days).rev() {
        let Some(date) = end.checked_sub_days(Days::new(u64::from(back))) else {
            continue;
        };
        let day_shifts: Vec<&Shift> = shifts
            .iter()
            .filter(|s| s.staff_id == Some(staff_id) && s.start_at.date_naive() == date)
            .collect();

        let percent = if day_shifts.is_empty() {
            None
        } else {
            let sum: f64 = day_shifts
                .iter()
                .map(|s| completion_percent(s, entries, now))
                .sum();
            Some(sum / day_shifts.len() as f64)
        };

        points.push(DayPoint {
            date,
            percent,
            status: classify(percent, date, today),
        });
    }

    points
}
