//! Shift domain types shared by every engine component.
//!
//! A [`Shift`] is a committed row read back from the store; a [`ShiftDraft`]
//! is the pre-insert shape emitted by the pattern expander and the coverage
//! generator. Both carry explicit `org_id`, never ambient context.

use chrono::{Days, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Lifecycle status
// ---------------------------------------------------------------------------

/// Lifecycle status of a shift.
///
/// Only `Published` shifts participate in conflict blocking; drafts exist so
/// bulk generation can produce overlapping candidates for human review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShiftStatus {
    Draft,
    Published,
    Active,
}

impl ShiftStatus {
    /// Stable string form used in the database and on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Published => "published",
            Self::Active => "active",
        }
    }

    /// Parse the stored string form.
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s {
            "draft" => Ok(Self::Draft),
            "published" => Ok(Self::Published),
            "active" => Ok(Self::Active),
            other => Err(CoreError::Internal(format!("Unknown shift status: {other}"))),
        }
    }
}

// ---------------------------------------------------------------------------
// Shift records
// ---------------------------------------------------------------------------

/// A committed (stored) unit of planned work.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Shift {
    pub id: DbId,
    pub org_id: DbId,
    /// `None` means an open shift, claimable by any staff member.
    pub staff_id: Option<DbId>,
    pub start_at: Timestamp,
    pub end_at: Timestamp,
    /// Role/position label (for coverage-generated shifts, the zone name).
    pub role: String,
    pub status: ShiftStatus,
    pub is_open: bool,
    pub notes: Option<String>,
}

/// A generated shift that has not been inserted yet (no id).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShiftDraft {
    pub org_id: DbId,
    pub staff_id: Option<DbId>,
    pub start_at: Timestamp,
    pub end_at: Timestamp,
    pub role: String,
    pub status: ShiftStatus,
    pub is_open: bool,
    pub notes: Option<String>,
}

// ---------------------------------------------------------------------------
// Overnight window construction
// ---------------------------------------------------------------------------

/// Build the concrete `[start, end)` instants for a shift on `date`.
///
/// When `end_time <= start_time` the end rolls over to the next calendar day
/// (overnight shift), preserving the `end > start` invariant.
pub fn shift_window(
    date: NaiveDate,
    start_time: NaiveTime,
    end_time: NaiveTime,
) -> (Timestamp, Timestamp) {
    let start = date.and_time(start_time).and_utc();
    let end_date = if end_time <= start_time {
        date.checked_add_days(Days::new(1)).unwrap_or(date)
    } else {
        date
    };
    let end = end_date.and_time(end_time).and_utc();
    (start, end)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use chrono::{TimeZone, Utc};

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn same_day_window() {
        let (start, end) = shift_window(d(15), t(9, 0), t(17, 0));
        assert_eq!(start, Utc.with_ymd_and_hms(2024, 1, 15, 9, 0, 0).unwrap());
        assert_eq!(end, Utc.with_ymd_and_hms(2024, 1, 15, 17, 0, 0).unwrap());
    }

    #[test]
    fn overnight_window_rolls_end_to_next_day() {
        let (start, end) = shift_window(d(15), t(22, 0), t(6, 0));
        assert_eq!(start, Utc.with_ymd_and_hms(2024, 1, 15, 22, 0, 0).unwrap());
        assert_eq!(end, Utc.with_ymd_and_hms(2024, 1, 16, 6, 0, 0).unwrap());
    }

    #[test]
    fn window_end_always_after_start() {
        let (start, end) = shift_window(d(15), t(8, 30), t(8, 30));
        assert!(end > start);
    }

    #[test]
    fn status_round_trips_through_string_form() {
        for status in [ShiftStatus::Draft, ShiftStatus::Published, ShiftStatus::Active] {
            assert_eq!(ShiftStatus::parse(status.as_str()).unwrap(), status);
        }
    }

    #[test]
    fn unknown_status_is_internal_error() {
        assert_matches!(ShiftStatus::parse("archived"), Err(CoreError::Internal(_)));
    }
}
