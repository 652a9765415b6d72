//! Half-open time-interval arithmetic.
//!
//! Every interval in the engine is `[start, end)`: back-to-back shifts
//! (one ending exactly when the next starts) do not overlap.

use crate::types::Timestamp;

/// Strict half-open intersection test.
///
/// True iff `a_start < b_end && a_end > b_start`.
pub fn overlaps(a_start: Timestamp, a_end: Timestamp, b_start: Timestamp, b_end: Timestamp) -> bool {
    a_start < b_end && a_end > b_start
}

/// Duration of `[start, end)` in whole milliseconds, floored at zero.
pub fn duration_ms(start: Timestamp, end: Timestamp) -> i64 {
    (end - start).num_milliseconds().max(0)
}

/// Clamp a ratio-times-100 value into the inclusive `[0, 100]` range.
pub fn clamp_percent(x: f64) -> f64 {
    x.clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn ts(h: u32, m: u32) -> Timestamp {
        Utc.with_ymd_and_hms(2024, 1, 15, h, m, 0).unwrap()
    }

    #[test]
    fn overlapping_intervals() {
        assert!(overlaps(ts(9, 0), ts(17, 0), ts(16, 0), ts(20, 0)));
    }

    #[test]
    fn disjoint_intervals() {
        assert!(!overlaps(ts(9, 0), ts(12, 0), ts(13, 0), ts(17, 0)));
    }

    #[test]
    fn back_to_back_does_not_overlap() {
        assert!(!overlaps(ts(9, 0), ts(17, 0), ts(17, 0), ts(20, 0)));
    }

    #[test]
    fn containment_overlaps() {
        assert!(overlaps(ts(9, 0), ts(17, 0), ts(10, 0), ts(11, 0)));
    }

    #[test]
    fn overlap_is_symmetric() {
        let cases = [
            (ts(9, 0), ts(17, 0), ts(16, 0), ts(20, 0)),
            (ts(9, 0), ts(12, 0), ts(13, 0), ts(17, 0)),
            (ts(9, 0), ts(17, 0), ts(17, 0), ts(20, 0)),
        ];
        for (a, b, c, d) in cases {
            assert_eq!(overlaps(a, b, c, d), overlaps(c, d, a, b));
        }
    }

    #[test]
    fn duration_of_eight_hours() {
        assert_eq!(duration_ms(ts(9, 0), ts(17, 0)), 8 * 3600 * 1000);
    }

    #[test]
    fn duration_never_negative() {
        assert_eq!(duration_ms(ts(17, 0), ts(9, 0)), 0);
    }

    #[test]
    fn clamp_caps_at_hundred() {
        assert_eq!(clamp_percent(119.8), 100.0);
    }

    #[test]
    fn clamp_floors_at_zero() {
        assert_eq!(clamp_percent(-3.0), 0.0);
    }

    #[test]
    fn clamp_passes_through_in_range() {
        assert_eq!(clamp_percent(62.5), 62.5);
    }
}
