//! Overlap validation against a staff member's committed roster.
//!
//! This is the single authoritative home of the "only published shifts
//! block" rule. Callers at the persistence boundary must re-run this check
//! against a freshly read shift set immediately before every commit and
//! reject the write on conflict — the database exclusion constraint is the
//! backstop, this check is the fast path.

use crate::interval::overlaps;
use crate::shift::{Shift, ShiftStatus};
use crate::types::{DbId, Timestamp};

/// A candidate assignment being created or edited.
#[derive(Debug, Clone, Copy)]
pub struct ShiftCandidate {
    pub staff_id: DbId,
    pub start_at: Timestamp,
    pub end_at: Timestamp,
}

/// True iff the candidate overlaps any *published* shift owned by the same
/// staff member.
///
/// `exclude_id` skips the shift's own stored row when re-validating an edit,
/// so a shift never conflicts with its prior version. Drafts never block.
pub fn has_conflict(candidate: &ShiftCandidate, existing: &[Shift], exclude_id: Option<DbId>) -> bool {
    existing
        .iter()
        .filter(|s| s.staff_id == Some(candidate.staff_id))
        .filter(|s| s.status == ShiftStatus::Published)
        .filter(|s| Some(s.id) != exclude_id)
        .any(|s| overlaps(candidate.start_at, candidate.end_at, s.start_at, s.end_at))
}

/// First conflicting published shift, for error messages and UI hints.
pub fn find_conflict<'a>(
    candidate: &ShiftCandidate,
    existing: &'a [Shift],
    exclude_id: Option<DbId>,
) -> Option<&'a Shift> {
    existing
        .iter()
        .filter(|s| s.staff_id == Some(candidate.staff_id))
        .filter(|s| s.status == ShiftStatus::Published)
        .filter(|s| Some(s.id) != exclude_id)
        .find(|s| overlaps(candidate.start_at, candidate.end_at, s.start_at, s.end_at))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn ts(h: u32) -> Timestamp {
        Utc.with_ymd_and_hms(2024, 3, 4, h, 0, 0).unwrap()
    }

    fn shift(id: DbId, staff_id: DbId, start: Timestamp, end: Timestamp, status: ShiftStatus) -> Shift {
        Shift {
            id,
            org_id: 1,
            staff_id: Some(staff_id),
            start_at: start,
            end_at: end,
            role: "Handler".into(),
            status,
            is_open: false,
            notes: None,
        }
    }

    fn candidate(staff_id: DbId, start: Timestamp, end: Timestamp) -> ShiftCandidate {
        ShiftCandidate { staff_id, start_at: start, end_at: end }
    }

    #[test]
    fn overlapping_published_shift_conflicts() {
        let roster = vec![shift(1, 10, ts(9), ts(17), ShiftStatus::Published)];
        assert!(has_conflict(&candidate(10, ts(16), ts(20)), &roster, None));
    }

    #[test]
    fn back_to_back_is_accepted() {
        let roster = vec![shift(1, 10, ts(9), ts(17), ShiftStatus::Published)];
        assert!(!has_conflict(&candidate(10, ts(17), ts(20)), &roster, None));
    }

    #[test]
    fn draft_shifts_never_block() {
        let roster = vec![shift(1, 10, ts(9), ts(17), ShiftStatus::Draft)];
        assert!(!has_conflict(&candidate(10, ts(9), ts(17)), &roster, None));
    }

    #[test]
    fn other_staff_never_blocks() {
        let roster = vec![shift(1, 11, ts(9), ts(17), ShiftStatus::Published)];
        assert!(!has_conflict(&candidate(10, ts(9), ts(17)), &roster, None));
    }

    #[test]
    fn editing_excludes_own_prior_version() {
        // Moving shift 1 within its own old window must not self-conflict.
        let roster = vec![shift(1, 10, ts(9), ts(17), ShiftStatus::Published)];
        assert!(!has_conflict(&candidate(10, ts(10), ts(18)), &roster, Some(1)));
    }

    #[test]
    fn editing_still_conflicts_with_others() {
        let roster = vec![
            shift(1, 10, ts(9), ts(12), ShiftStatus::Published),
            shift(2, 10, ts(13), ts(17), ShiftStatus::Published),
        ];
        assert!(has_conflict(&candidate(10, ts(11), ts(14)), &roster, Some(1)));
    }

    #[test]
    fn find_conflict_names_the_blocker() {
        let roster = vec![
            shift(1, 10, ts(9), ts(12), ShiftStatus::Published),
            shift(2, 10, ts(13), ts(17), ShiftStatus::Published),
        ];
        let hit = find_conflict(&candidate(10, ts(14), ts(18)), &roster, None).unwrap();
        assert_eq!(hit.id, 2);
    }
}
