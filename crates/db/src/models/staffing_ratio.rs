//! Zone staffing ratio row model and DTO.

use rosterly_core::coverage::StaffingRatio;
use rosterly_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `staffing_ratios` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct StaffingRatioRow {
    pub id: DbId,
    pub org_id: DbId,
    pub zone: String,
    pub staff_count: i32,
    pub capacity_per_staff: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl StaffingRatioRow {
    pub fn into_domain(self) -> StaffingRatio {
        StaffingRatio {
            zone: self.zone,
            staff_count: self.staff_count,
            capacity_per_staff: self.capacity_per_staff,
        }
    }
}

/// DTO for creating or updating a zone's ratio (upsert by org + zone).
#[derive(Debug, Deserialize)]
pub struct UpsertStaffingRatio {
    pub zone: String,
    pub staff_count: i32,
    pub capacity_per_staff: i32,
}
