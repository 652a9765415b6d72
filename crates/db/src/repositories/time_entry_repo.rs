//! Repository for the `time_entries` table.

use rosterly_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::error::StoreError;
use crate::models::time_entry::TimeEntryRow;

const ENTRY_COLUMNS: &str = "\
    id, org_id, staff_id, clock_in, clock_out, break_minutes, created_at";

/// Clock-in/out operations and reads for the `time_entries` table.
pub struct TimeEntryRepo;

impl TimeEntryRepo {
    /// List entries in an organization, optionally narrowed by staff and
    /// clock-in range.
    pub async fn list(
        pool: &PgPool,
        org_id: DbId,
        staff_id: Option<DbId>,
        from: Option<Timestamp>,
        to: Option<Timestamp>,
    ) -> Result<Vec<TimeEntryRow>, StoreError> {
        let query = format!(
            "SELECT {ENTRY_COLUMNS} FROM time_entries \
             WHERE org_id = $1 \
               AND ($2::BIGINT IS NULL OR staff_id = $2) \
               AND ($3::TIMESTAMPTZ IS NULL OR clock_in >= $3) \
               AND ($4::TIMESTAMPTZ IS NULL OR clock_in < $4) \
             ORDER BY clock_in, id"
        );
        let rows = sqlx::query_as::<_, TimeEntryRow>(&query)
            .bind(org_id)
            .bind(staff_id)
            .bind(from)
            .bind(to)
            .fetch_all(pool)
            .await?;
        Ok(rows)
    }

    /// The staff member's currently active entry (no clock-out), if any.
    pub async fn active_for_staff(
        pool: &PgPool,
        org_id: DbId,
        staff_id: DbId,
    ) -> Result<Option<TimeEntryRow>, StoreError> {
        let query = format!(
            "SELECT {ENTRY_COLUMNS} FROM time_entries \
             WHERE org_id = $1 AND staff_id = $2 AND clock_out IS NULL \
             ORDER BY clock_in DESC \
             LIMIT 1"
        );
        let row = sqlx::query_as::<_, TimeEntryRow>(&query)
            .bind(org_id)
            .bind(staff_id)
            .fetch_optional(pool)
            .await?;
        Ok(row)
    }

    /// Start a new entry at `at`. Rejected while a previous entry is still
    /// open — a staff member works one interval at a time.
    pub async fn clock_in(
        pool: &PgPool,
        org_id: DbId,
        staff_id: DbId,
        at: Timestamp,
    ) -> Result<TimeEntryRow, StoreError> {
        if Self::active_for_staff(pool, org_id, staff_id).await?.is_some() {
            return Err(StoreError::Conflict(format!(
                "staff {staff_id} already has an active time entry"
            )));
        }
        let query = format!(
            "INSERT INTO time_entries (org_id, staff_id, clock_in) \
             VALUES ($1, $2, $3) \
             RETURNING {ENTRY_COLUMNS}"
        );
        let row = sqlx::query_as::<_, TimeEntryRow>(&query)
            .bind(org_id)
            .bind(staff_id)
            .bind(at)
            .fetch_one(pool)
            .await?;
        Ok(row)
    }

    /// Close an active entry at `at`, recording accumulated break minutes.
    /// Returns `None` when the entry does not exist or is already closed.
    pub async fn clock_out(
        pool: &PgPool,
        id: DbId,
        at: Timestamp,
        break_minutes: Option<i32>,
    ) -> Result<Option<TimeEntryRow>, StoreError> {
        let query = format!(
            "UPDATE time_entries \
             SET clock_out = $2, break_minutes = COALESCE($3, break_minutes) \
             WHERE id = $1 AND clock_out IS NULL \
             RETURNING {ENTRY_COLUMNS}"
        );
        let row = sqlx::query_as::<_, TimeEntryRow>(&query)
            .bind(id)
            .bind(at)
            .bind(break_minutes)
            .fetch_optional(pool)
            .await?;
        Ok(row)
    }
}
