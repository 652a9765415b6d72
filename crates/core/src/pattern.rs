//! Recurrence specs and their expansion into concrete shift drafts.
//!
//! A [`RecurrenceSpec`] is a staff member's declarative work pattern. The
//! expander turns it into date-bounded [`ShiftDraft`]s over a horizon of
//! whole weeks; it never deduplicates against existing rows — callers that
//! want incremental "repeat/extend" supply a `from` date just past the
//! staff member's latest existing shift.

use chrono::{Datelike, Days, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::shift::{shift_window, ShiftDraft, ShiftStatus};
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Recurrence specification
// ---------------------------------------------------------------------------

/// A declarative per-staff work pattern.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RecurrenceSpec {
    /// Fixed set of weekdays every week. Weekday indices are 0=Sunday
    /// through 6=Saturday. An empty set is a valid "cleared" pattern that
    /// expands to nothing.
    FixedWeekly {
        weekdays: Vec<u8>,
        start_time: NaiveTime,
        end_time: NaiveTime,
    },
    /// Repeating N-days-on / M-days-off cycle. `anchor` is day 1 of an
    /// "on" stretch; days before the anchor are handled by normalized
    /// modulo arithmetic.
    Rotating {
        days_on: u32,
        days_off: u32,
        anchor: NaiveDate,
        start_time: NaiveTime,
        end_time: NaiveTime,
    },
}

impl RecurrenceSpec {
    /// Validate the spec before any expansion work (fail fast, no partial
    /// output).
    pub fn validate(&self) -> Result<(), CoreError> {
        match self {
            Self::FixedWeekly { weekdays, .. } => {
                if let Some(bad) = weekdays.iter().find(|&&w| w > 6) {
                    return Err(CoreError::Validation(format!(
                        "weekday index must be 0..=6, got {bad}"
                    )));
                }
                Ok(())
            }
            Self::Rotating { days_on, days_off, .. } => {
                if *days_on < 1 {
                    return Err(CoreError::Validation("days_on must be >= 1".into()));
                }
                if *days_off < 1 {
                    return Err(CoreError::Validation("days_off must be >= 1".into()));
                }
                Ok(())
            }
        }
    }

    /// Whether the pattern schedules work on `date`.
    pub fn is_on(&self, date: NaiveDate) -> bool {
        match self {
            Self::FixedWeekly { weekdays, .. } => {
                weekdays.contains(&(date.weekday().num_days_from_sunday() as u8))
            }
            Self::Rotating { days_on, days_off, anchor, .. } => {
                let cycle = i64::from(days_on + days_off);
                // Whole calendar days, correct for dates before the anchor.
                let offset = (date - *anchor).num_days().rem_euclid(cycle);
                offset < i64::from(*days_on)
            }
        }
    }

    fn times(&self) -> (NaiveTime, NaiveTime) {
        match self {
            Self::FixedWeekly { start_time, end_time, .. }
            | Self::Rotating { start_time, end_time, .. } => (*start_time, *end_time),
        }
    }
}

// ---------------------------------------------------------------------------
// Expansion
// ---------------------------------------------------------------------------

/// Expand a recurrence spec into one draft per scheduled day in
/// `[from, from + weeks*7)`.
///
/// The expander is status-agnostic: `status` is the caller's draft/published
/// policy. Emitted drafts always have `is_open = false` — a pattern belongs
/// to a specific staff member.
///
/// `weeks <= 0` (and an empty fixed-weekly weekday set) yield an empty vec.
pub fn expand(
    spec: &RecurrenceSpec,
    org_id: DbId,
    staff_id: DbId,
    role: &str,
    from: NaiveDate,
    weeks: i64,
    status: ShiftStatus,
) -> Result<Vec<ShiftDraft>, CoreError> {
    spec.validate()?;

    if weeks <= 0 {
        return Ok(Vec::new());
    }

    let (start_time, end_time) = spec.times();
    let total_days = weeks * 7;
    let mut shifts = Vec::new();

    for offset in 0..total_days {
        let Some(date) = from.checked_add_days(Days::new(offset as u64)) else {
            break;
        };
        if !spec.is_on(date) {
            continue;
        }
        let (start_at, end_at) = shift_window(date, start_time, end_time);
        shifts.push(ShiftDraft {
            org_id,
            staff_id: Some(staff_id),
            start_at,
            end_at,
            role: role.to_string(),
            status,
            is_open: false,
            notes: None,
        });
    }

    Ok(shifts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use chrono::{TimeZone, Utc};

    fn t(h: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, 0, 0).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    /// Mon/Wed/Fri, 09:00-17:00.
    fn weekday_spec() -> RecurrenceSpec {
        RecurrenceSpec::FixedWeekly {
            weekdays: vec![1, 3, 5],
            start_time: t(9),
            end_time: t(17),
        }
    }

    /// 4-on/4-off anchored at 2024-01-01, 09:00-17:00.
    fn rotating_spec() -> RecurrenceSpec {
        RecurrenceSpec::Rotating {
            days_on: 4,
            days_off: 4,
            anchor: date(2024, 1, 1),
            start_time: t(9),
            end_time: t(17),
        }
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    #[test]
    fn rejects_weekday_out_of_range() {
        let spec = RecurrenceSpec::FixedWeekly {
            weekdays: vec![0, 7],
            start_time: t(9),
            end_time: t(17),
        };
        assert_matches!(spec.validate(), Err(CoreError::Validation(_)));
    }

    #[test]
    fn rejects_zero_days_on() {
        let spec = RecurrenceSpec::Rotating {
            days_on: 0,
            days_off: 4,
            anchor: date(2024, 1, 1),
            start_time: t(9),
            end_time: t(17),
        };
        assert_matches!(spec.validate(), Err(CoreError::Validation(_)));
    }

    #[test]
    fn rejects_zero_days_off() {
        let spec = RecurrenceSpec::Rotating {
            days_on: 4,
            days_off: 0,
            anchor: date(2024, 1, 1),
            start_time: t(9),
            end_time: t(17),
        };
        assert_matches!(spec.validate(), Err(CoreError::Validation(_)));
    }

    #[test]
    fn empty_weekday_set_is_valid() {
        let spec = RecurrenceSpec::FixedWeekly {
            weekdays: vec![],
            start_time: t(9),
            end_time: t(17),
        };
        assert!(spec.validate().is_ok());
    }

    // -----------------------------------------------------------------------
    // Fixed-weekly expansion
    // -----------------------------------------------------------------------

    #[test]
    fn fixed_weekly_emits_matching_weekdays_only() {
        // 2024-01-01 is a Monday.
        let shifts = expand(
            &weekday_spec(),
            1,
            10,
            "Trainer",
            date(2024, 1, 1),
            1,
            ShiftStatus::Draft,
        )
        .unwrap();
        assert_eq!(shifts.len(), 3);
        assert_eq!(
            shifts[0].start_at,
            Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap()
        );
        assert_eq!(
            shifts[1].start_at,
            Utc.with_ymd_and_hms(2024, 1, 3, 9, 0, 0).unwrap()
        );
        assert_eq!(
            shifts[2].start_at,
            Utc.with_ymd_and_hms(2024, 1, 5, 9, 0, 0).unwrap()
        );
    }

    #[test]
    fn fixed_weekly_disjoint_ranges_concatenate() {
        // Expanding [0,4) then [4,8) weeks equals expanding [0,8) directly.
        let spec = weekday_spec();
        let from = date(2024, 1, 1);
        let first = expand(&spec, 1, 10, "Trainer", from, 4, ShiftStatus::Draft).unwrap();
        let second = expand(
            &spec,
            1,
            10,
            "Trainer",
            from.checked_add_days(Days::new(28)).unwrap(),
            4,
            ShiftStatus::Draft,
        )
        .unwrap();
        let whole = expand(&spec, 1, 10, "Trainer", from, 8, ShiftStatus::Draft).unwrap();

        let joined: Vec<_> = first.iter().chain(second.iter()).map(|s| s.start_at).collect();
        let direct: Vec<_> = whole.iter().map(|s| s.start_at).collect();
        assert_eq!(joined, direct);
    }

    #[test]
    fn empty_weekday_set_expands_to_nothing() {
        let spec = RecurrenceSpec::FixedWeekly {
            weekdays: vec![],
            start_time: t(9),
            end_time: t(17),
        };
        let shifts = expand(&spec, 1, 10, "Trainer", date(2024, 1, 1), 4, ShiftStatus::Draft).unwrap();
        assert!(shifts.is_empty());
    }

    #[test]
    fn zero_weeks_expands_to_nothing() {
        let shifts = expand(&weekday_spec(), 1, 10, "Trainer", date(2024, 1, 1), 0, ShiftStatus::Draft)
            .unwrap();
        assert!(shifts.is_empty());
    }

    #[test]
    fn overnight_pattern_ends_next_day() {
        let spec = RecurrenceSpec::FixedWeekly {
            weekdays: vec![1],
            start_time: t(22),
            end_time: t(6),
        };
        let shifts = expand(&spec, 1, 10, "Night", date(2024, 1, 1), 1, ShiftStatus::Draft).unwrap();
        assert_eq!(shifts.len(), 1);
        assert_eq!(
            shifts[0].start_at,
            Utc.with_ymd_and_hms(2024, 1, 1, 22, 0, 0).unwrap()
        );
        assert_eq!(
            shifts[0].end_at,
            Utc.with_ymd_and_hms(2024, 1, 2, 6, 0, 0).unwrap()
        );
    }

    // -----------------------------------------------------------------------
    // Rotating expansion
    // -----------------------------------------------------------------------

    #[test]
    fn rotating_on_off_cycle() {
        let spec = rotating_spec();
        // Days 0..3 on, 4..7 off, 8..11 on again.
        for day in 1..=4 {
            assert!(spec.is_on(date(2024, 1, day)), "day {day} should be on");
        }
        for day in 5..=8 {
            assert!(!spec.is_on(date(2024, 1, day)), "day {day} should be off");
        }
        for day in 9..=12 {
            assert!(spec.is_on(date(2024, 1, day)), "day {day} should be on");
        }
    }

    #[test]
    fn rotating_is_periodic() {
        let spec = rotating_spec();
        let cycle = Days::new(8);
        for offset in 0..30u64 {
            let d = date(2024, 1, 1).checked_add_days(Days::new(offset)).unwrap();
            let next = d.checked_add_days(cycle).unwrap();
            assert_eq!(spec.is_on(d), spec.is_on(next));
        }
    }

    #[test]
    fn rotating_handles_dates_before_anchor() {
        let spec = rotating_spec();
        // 2023-12-31 is one day before the anchor: offset -1 normalizes to 7,
        // the last "off" day of the cycle.
        assert!(!spec.is_on(date(2023, 12, 31)));
        // 2023-12-28 normalizes to offset 4, also off.
        assert!(!spec.is_on(date(2023, 12, 28)));
        // 2023-12-24 normalizes to offset 0, on.
        assert!(spec.is_on(date(2023, 12, 24)));
    }

    #[test]
    fn rotating_four_weeks_yields_sixteen_shifts() {
        // End-to-end scenario: 4-on/4-off from the anchor over 4 weeks.
        let shifts = expand(
            &rotating_spec(),
            1,
            10,
            "Handler",
            date(2024, 1, 1),
            4,
            ShiftStatus::Draft,
        )
        .unwrap();
        assert_eq!(shifts.len(), 16);
        assert_eq!(
            shifts[0].start_at,
            Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap()
        );
        assert_eq!(
            shifts[0].end_at,
            Utc.with_ymd_and_hms(2024, 1, 1, 17, 0, 0).unwrap()
        );
        // No shifts on the first "off" stretch, Jan 5 through Jan 8.
        for shift in &shifts {
            let day = shift.start_at.date_naive();
            assert!(
                day < date(2024, 1, 5) || day > date(2024, 1, 8),
                "unexpected shift on {day}"
            );
        }
    }

    // -----------------------------------------------------------------------
    // Draft shape
    // -----------------------------------------------------------------------

    #[test]
    fn drafts_are_assigned_and_closed() {
        let shifts = expand(
            &rotating_spec(),
            7,
            42,
            "Handler",
            date(2024, 1, 1),
            1,
            ShiftStatus::Published,
        )
        .unwrap();
        for shift in shifts {
            assert_eq!(shift.org_id, 7);
            assert_eq!(shift.staff_id, Some(42));
            assert_eq!(shift.status, ShiftStatus::Published);
            assert!(!shift.is_open);
            assert!(shift.end_at > shift.start_at);
        }
    }
}
