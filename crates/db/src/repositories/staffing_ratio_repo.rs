//! Repository for the `staffing_ratios` table.

use rosterly_core::types::DbId;
use sqlx::PgPool;

use crate::error::StoreError;
use crate::models::staffing_ratio::{StaffingRatioRow, UpsertStaffingRatio};

const RATIO_COLUMNS: &str = "\
    id, org_id, zone, staff_count, capacity_per_staff, created_at, updated_at";

/// Read and upsert operations for the `staffing_ratios` table.
pub struct StaffingRatioRepo;

impl StaffingRatioRepo {
    /// List an organization's ratios, ordered by zone.
    pub async fn list(pool: &PgPool, org_id: DbId) -> Result<Vec<StaffingRatioRow>, StoreError> {
        let query = format!(
            "SELECT {RATIO_COLUMNS} FROM staffing_ratios \
             WHERE org_id = $1 \
             ORDER BY zone"
        );
        let rows = sqlx::query_as::<_, StaffingRatioRow>(&query)
            .bind(org_id)
            .fetch_all(pool)
            .await?;
        Ok(rows)
    }

    /// Create or update a zone's ratio (one row per org + zone).
    pub async fn upsert(
        pool: &PgPool,
        org_id: DbId,
        input: &UpsertStaffingRatio,
    ) -> Result<StaffingRatioRow, StoreError> {
        let query = format!(
            "INSERT INTO staffing_ratios (org_id, zone, staff_count, capacity_per_staff) \
             VALUES ($1, $2, $3, $4) \
             ON CONFLICT (org_id, zone) \
             DO UPDATE SET staff_count = $3, capacity_per_staff = $4, updated_at = now() \
             RETURNING {RATIO_COLUMNS}"
        );
        let row = sqlx::query_as::<_, StaffingRatioRow>(&query)
            .bind(org_id)
            .bind(&input.zone)
            .bind(input.staff_count)
            .bind(input.capacity_per_staff)
            .fetch_one(pool)
            .await?;
        Ok(row)
    }

    /// Delete a ratio. Returns whether a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM staffing_ratios WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
