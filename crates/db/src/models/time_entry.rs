//! Time entry row model.

use rosterly_core::attendance::TimeEntry;
use rosterly_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `time_entries` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TimeEntryRow {
    pub id: DbId,
    pub org_id: DbId,
    pub staff_id: DbId,
    pub clock_in: Timestamp,
    pub clock_out: Option<Timestamp>,
    pub break_minutes: i32,
    pub created_at: Timestamp,
}

impl TimeEntryRow {
    pub fn into_domain(self) -> TimeEntry {
        TimeEntry {
            id: self.id,
            staff_id: self.staff_id,
            clock_in: self.clock_in,
            clock_out: self.clock_out,
            break_minutes: self.break_minutes,
        }
    }
}
