//! Demand-driven coverage generation.
//!
//! Turns projected population counts and per-zone staffing ratios into the
//! open draft shifts needed to cover each zone/day. Generated shifts are
//! never assigned to a staff member here — assignment is a separate action
//! that runs through the conflict validator.

use std::collections::BTreeMap;

use chrono::{Days, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::shift::{shift_window, ShiftDraft, ShiftStatus};
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

/// A zone's demand-to-headcount rule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaffingRatio {
    pub zone: String,
    /// Configured baseline headcount for the zone (display data; the
    /// generator derives headcount from demand, not from this field).
    pub staff_count: i32,
    /// Population one staff unit can cover, e.g. 15 for "1 staff per 15 dogs".
    pub capacity_per_staff: i32,
}

/// A coverage generation request over an inclusive date range.
///
/// `projected_counts` uses a `BTreeMap` so output ordering within a day is
/// deterministic by zone name.
#[derive(Debug, Clone, Deserialize)]
pub struct CoverageRequest {
    pub org_id: DbId,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub projected_counts: BTreeMap<String, i32>,
}

/// The daily window coverage shifts span. Policy-configurable by the caller.
#[derive(Debug, Clone, Copy)]
pub struct CoverageWindow {
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

impl Default for CoverageWindow {
    fn default() -> Self {
        Self {
            start_time: NaiveTime::from_hms_opt(8, 0, 0).expect("valid time"),
            end_time: NaiveTime::from_hms_opt(17, 0, 0).expect("valid time"),
        }
    }
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// Generated coverage: open drafts grouped by date then zone, plus the zones
/// that were requested but had no usable ratio. A skipped zone is a gap the
/// caller should surface, not a failure.
#[derive(Debug, Clone, Serialize)]
pub struct CoveragePlan {
    pub shifts: Vec<ShiftDraft>,
    pub skipped_zones: Vec<String>,
}

// ---------------------------------------------------------------------------
// Generation
// ---------------------------------------------------------------------------

/// Headcount needed to cover `projected` individuals at `capacity_per_staff`
/// each: ceiling division, zero for non-positive demand.
pub fn required_staff(projected: i32, capacity_per_staff: i32) -> i32 {
    if projected <= 0 || capacity_per_staff <= 0 {
        return 0;
    }
    (projected + capacity_per_staff - 1) / capacity_per_staff
}

/// Generate open draft shifts for every day in `[start_date, end_date]` and
/// every zone present in both the projections and the ratios.
pub fn generate(
    request: &CoverageRequest,
    ratios: &[StaffingRatio],
    window: CoverageWindow,
) -> Result<CoveragePlan, CoreError> {
    if request.end_date < request.start_date {
        return Err(CoreError::Validation(format!(
            "end_date {} is before start_date {}",
            request.end_date, request.start_date
        )));
    }

    let usable: BTreeMap<&str, &StaffingRatio> = ratios
        .iter()
        .filter(|r| r.capacity_per_staff > 0)
        .map(|r| (r.zone.as_str(), r))
        .collect();

    let skipped_zones: Vec<String> = request
        .projected_counts
        .keys()
        .filter(|zone| !usable.contains_key(zone.as_str()))
        .cloned()
        .collect();

    let mut shifts = Vec::new();
    let mut date = request.start_date;
    while date <= request.end_date {
        for (zone, projected) in &request.projected_counts {
            let Some(ratio) = usable.get(zone.as_str()) else {
                continue;
            };
            let needed = required_staff(*projected, ratio.capacity_per_staff);
            let (start_at, end_at) = shift_window(date, window.start_time, window.end_time);
            for _ in 0..needed {
                shifts.push(ShiftDraft {
                    org_id: request.org_id,
                    staff_id: None,
                    start_at,
                    end_at,
                    role: zone.clone(),
                    status: ShiftStatus::Draft,
                    is_open: true,
                    notes: None,
                });
            }
        }
        match date.checked_add_days(Days::new(1)) {
            Some(next) => date = next,
            None => break,
        }
    }

    Ok(CoveragePlan { shifts, skipped_zones })
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, d).unwrap()
    }

    fn ratio(zone: &str, capacity: i32) -> StaffingRatio {
        StaffingRatio {
            zone: zone.into(),
            staff_count: 1,
            capacity_per_staff: capacity,
        }
    }

    fn request(start: u32, end: u32, counts: &[(&str, i32)]) -> CoverageRequest {
        CoverageRequest {
            org_id: 1,
            start_date: date(start),
            end_date: date(end),
            projected_counts: counts.iter().map(|(z, c)| (z.to_string(), *c)).collect(),
        }
    }

    // -----------------------------------------------------------------------
    // Headcount rounding
    // -----------------------------------------------------------------------

    #[test]
    fn exact_multiple_needs_exact_headcount() {
        assert_eq!(required_staff(45, 15), 3);
    }

    #[test]
    fn remainder_rounds_up() {
        assert_eq!(required_staff(46, 15), 4);
    }

    #[test]
    fn zero_demand_needs_nobody() {
        assert_eq!(required_staff(0, 15), 0);
    }

    // -----------------------------------------------------------------------
    // Generation
    // -----------------------------------------------------------------------

    #[test]
    fn emits_open_unassigned_drafts_labelled_by_zone() {
        let plan = generate(
            &request(1, 1, &[("Daycare", 45)]),
            &[ratio("Daycare", 15)],
            CoverageWindow::default(),
        )
        .unwrap();
        assert_eq!(plan.shifts.len(), 3);
        for shift in &plan.shifts {
            assert_eq!(shift.staff_id, None);
            assert!(shift.is_open);
            assert_eq!(shift.status, ShiftStatus::Draft);
            assert_eq!(shift.role, "Daycare");
        }
        assert!(plan.skipped_zones.is_empty());
    }

    #[test]
    fn date_range_is_inclusive() {
        let plan = generate(
            &request(1, 3, &[("Daycare", 15)]),
            &[ratio("Daycare", 15)],
            CoverageWindow::default(),
        )
        .unwrap();
        // One shift per day over three days.
        assert_eq!(plan.shifts.len(), 3);
    }

    #[test]
    fn zone_without_ratio_is_skipped_and_reported() {
        let plan = generate(
            &request(1, 1, &[("Boarding", 20), ("Daycare", 30)]),
            &[ratio("Daycare", 15)],
            CoverageWindow::default(),
        )
        .unwrap();
        assert_eq!(plan.skipped_zones, vec!["Boarding".to_string()]);
        assert!(plan.shifts.iter().all(|s| s.role == "Daycare"));
    }

    #[test]
    fn non_positive_capacity_is_treated_as_missing() {
        let plan = generate(
            &request(1, 1, &[("Daycare", 30)]),
            &[ratio("Daycare", 0)],
            CoverageWindow::default(),
        )
        .unwrap();
        assert!(plan.shifts.is_empty());
        assert_eq!(plan.skipped_zones, vec!["Daycare".to_string()]);
    }

    #[test]
    fn inverted_range_fails_fast() {
        let result = generate(
            &request(5, 1, &[("Daycare", 30)]),
            &[ratio("Daycare", 15)],
            CoverageWindow::default(),
        );
        assert_matches!(result, Err(CoreError::Validation(_)));
    }

    #[test]
    fn output_is_grouped_by_date_then_zone() {
        let plan = generate(
            &request(1, 2, &[("Boarding", 10), ("Daycare", 10)]),
            &[ratio("Boarding", 10), ratio("Daycare", 10)],
            CoverageWindow::default(),
        )
        .unwrap();
        let keys: Vec<(NaiveDate, String)> = plan
            .shifts
            .iter()
            .map(|s| (s.start_at.date_naive(), s.role.clone()))
            .collect();
        let mut sorted = keys.clone();
        sorted.sort();
        assert_eq!(keys, sorted);
    }

    #[test]
    fn default_window_is_eight_to_five() {
        let plan = generate(
            &request(1, 1, &[("Daycare", 1)]),
            &[ratio("Daycare", 15)],
            CoverageWindow::default(),
        )
        .unwrap();
        let shift = &plan.shifts[0];
        assert_eq!(shift.start_at.time(), NaiveTime::from_hms_opt(8, 0, 0).unwrap());
        assert_eq!(shift.end_at.time(), NaiveTime::from_hms_opt(17, 0, 0).unwrap());
    }
}
