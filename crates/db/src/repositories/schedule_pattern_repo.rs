//! Repository for the `schedule_patterns` table.

use rosterly_core::error::CoreError;
use rosterly_core::pattern::RecurrenceSpec;
use rosterly_core::types::DbId;
use sqlx::PgPool;

use crate::error::StoreError;
use crate::models::schedule_pattern::{pattern_type, SchedulePatternRow};

const PATTERN_COLUMNS: &str = "\
    id, org_id, staff_id, pattern_type, config, created_at, updated_at";

/// One recurrence pattern per staff member, upserted on edit.
pub struct SchedulePatternRepo;

impl SchedulePatternRepo {
    /// The staff member's current pattern, if one is set.
    pub async fn find_for_staff(
        pool: &PgPool,
        org_id: DbId,
        staff_id: DbId,
    ) -> Result<Option<SchedulePatternRow>, StoreError> {
        let query = format!(
            "SELECT {PATTERN_COLUMNS} FROM schedule_patterns \
             WHERE org_id = $1 AND staff_id = $2"
        );
        let row = sqlx::query_as::<_, SchedulePatternRow>(&query)
            .bind(org_id)
            .bind(staff_id)
            .fetch_optional(pool)
            .await?;
        Ok(row)
    }

    /// Set or replace the staff member's pattern. The spec is validated
    /// before any write (fail fast, no partial output).
    pub async fn upsert(
        pool: &PgPool,
        org_id: DbId,
        staff_id: DbId,
        spec: &RecurrenceSpec,
    ) -> Result<SchedulePatternRow, StoreError> {
        spec.validate().map_err(StoreError::Domain)?;
        let config = serde_json::to_value(spec)
            .map_err(|e| CoreError::Internal(format!("Pattern serialization failed: {e}")))
            .map_err(StoreError::Domain)?;

        let query = format!(
            "INSERT INTO schedule_patterns (org_id, staff_id, pattern_type, config) \
             VALUES ($1, $2, $3, $4) \
             ON CONFLICT (org_id, staff_id) \
             DO UPDATE SET pattern_type = $3, config = $4, updated_at = now() \
             RETURNING {PATTERN_COLUMNS}"
        );
        let row = sqlx::query_as::<_, SchedulePatternRow>(&query)
            .bind(org_id)
            .bind(staff_id)
            .bind(pattern_type(spec))
            .bind(&config)
            .fetch_one(pool)
            .await?;
        Ok(row)
    }

    /// Delete a staff member's pattern. Returns whether a row was removed.
    pub async fn delete_for_staff(
        pool: &PgPool,
        org_id: DbId,
        staff_id: DbId,
    ) -> Result<bool, StoreError> {
        let result = sqlx::query(
            "DELETE FROM schedule_patterns WHERE org_id = $1 AND staff_id = $2",
        )
        .bind(org_id)
        .bind(staff_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
