//! Repository for the `shifts` table.
//!
//! `create_checked`, `update_checked`, and `publish` are the
//! validate-and-commit operations: they re-read the owner's published
//! roster, run the core conflict validator, and only then write. The
//! database exclusion constraint (`ex_shifts_published_overlap`) backstops
//! the check against concurrent writers; a constraint violation surfaces as
//! the same `StoreError::Conflict` as the fast path.

use rosterly_core::conflict::{find_conflict, ShiftCandidate};
use rosterly_core::error::CoreError;
use rosterly_core::shift::{Shift, ShiftDraft, ShiftStatus};
use rosterly_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::error::{is_overlap_violation, StoreError};
use crate::models::shift::{ShiftFilter, ShiftRow, UpdateShift};

const SHIFT_COLUMNS: &str = "\
    id, org_id, staff_id, start_at, end_at, role, status, is_open, notes, \
    created_at, updated_at";

/// CRUD and validate-and-commit operations for the `shifts` table.
pub struct ShiftRepo;

impl ShiftRepo {
    /// List shifts in an organization, optionally narrowed by staff,
    /// status, and start-instant range. Ordered by start then id for
    /// deterministic previews.
    pub async fn list(
        pool: &PgPool,
        org_id: DbId,
        filter: &ShiftFilter,
    ) -> Result<Vec<ShiftRow>, StoreError> {
        let query = format!(
            "SELECT {SHIFT_COLUMNS} FROM shifts \
             WHERE org_id = $1 \
               AND ($2::BIGINT IS NULL OR staff_id = $2) \
               AND ($3::TEXT IS NULL OR status = $3) \
               AND ($4::TIMESTAMPTZ IS NULL OR start_at >= $4) \
               AND ($5::TIMESTAMPTZ IS NULL OR start_at < $5) \
             ORDER BY start_at, id"
        );
        let rows = sqlx::query_as::<_, ShiftRow>(&query)
            .bind(org_id)
            .bind(filter.staff_id)
            .bind(filter.status.map(ShiftStatus::as_str))
            .bind(filter.from)
            .bind(filter.to)
            .fetch_all(pool)
            .await?;
        Ok(rows)
    }

    /// Find a shift by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<ShiftRow>, StoreError> {
        let query = format!("SELECT {SHIFT_COLUMNS} FROM shifts WHERE id = $1");
        let row = sqlx::query_as::<_, ShiftRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(row)
    }

    /// A staff member's published roster, as domain shifts for the
    /// conflict validator.
    pub async fn published_for_staff(
        pool: &PgPool,
        org_id: DbId,
        staff_id: DbId,
    ) -> Result<Vec<Shift>, StoreError> {
        let query = format!(
            "SELECT {SHIFT_COLUMNS} FROM shifts \
             WHERE org_id = $1 AND staff_id = $2 AND status = 'published' \
             ORDER BY start_at, id"
        );
        let rows = sqlx::query_as::<_, ShiftRow>(&query)
            .bind(org_id)
            .bind(staff_id)
            .fetch_all(pool)
            .await?;
        into_domain_vec(rows)
    }

    /// Create a shift, rejecting it with a conflict when it has an owner and
    /// overlaps the owner's published roster. Never partially applies.
    pub async fn create_checked(pool: &PgPool, draft: &ShiftDraft) -> Result<ShiftRow, StoreError> {
        if let Some(staff_id) = draft.staff_id {
            let roster = Self::published_for_staff(pool, draft.org_id, staff_id).await?;
            let candidate = ShiftCandidate {
                staff_id,
                start_at: draft.start_at,
                end_at: draft.end_at,
            };
            if let Some(blocker) = find_conflict(&candidate, &roster, None) {
                return Err(conflict_error(blocker));
            }
        }
        Self::insert(pool, draft).await
    }

    /// Bulk insert generated drafts inside one transaction. No conflict
    /// checking: bulk generation deliberately produces overlapping drafts
    /// for human review before publication.
    pub async fn create_many(
        pool: &PgPool,
        drafts: &[ShiftDraft],
    ) -> Result<Vec<ShiftRow>, StoreError> {
        let mut tx = pool.begin().await?;
        let query = insert_query();
        let mut rows = Vec::with_capacity(drafts.len());
        for draft in drafts {
            let row = sqlx::query_as::<_, ShiftRow>(&query)
                .bind(draft.org_id)
                .bind(draft.staff_id)
                .bind(draft.start_at)
                .bind(draft.end_at)
                .bind(&draft.role)
                .bind(draft.status.as_str())
                .bind(draft.is_open)
                .bind(&draft.notes)
                .fetch_one(&mut *tx)
                .await
                .map_err(map_insert_error)?;
            rows.push(row);
        }
        tx.commit().await?;
        tracing::debug!(count = rows.len(), "Bulk-inserted generated shifts");
        Ok(rows)
    }

    /// Patch a shift, re-running the conflict validator (excluding the
    /// shift's own stored version) whenever the merged result has an owner.
    pub async fn update_checked(
        pool: &PgPool,
        id: DbId,
        patch: &UpdateShift,
    ) -> Result<ShiftRow, StoreError> {
        let current = Self::find_by_id(pool, id)
            .await?
            .ok_or(CoreError::NotFound { entity: "Shift", id })
            .map_err(StoreError::Domain)?;

        let staff_id = patch.staff_id.or(current.staff_id);
        let start_at = patch.start_at.unwrap_or(current.start_at);
        let end_at = patch.end_at.unwrap_or(current.end_at);
        let role = patch.role.clone().unwrap_or_else(|| current.role.clone());
        let status = match patch.status {
            Some(s) => s,
            None => ShiftStatus::parse(&current.status).map_err(StoreError::Domain)?,
        };
        let is_open = patch.is_open.unwrap_or(current.is_open);
        let notes = patch.notes.clone().or_else(|| current.notes.clone());

        if end_at <= start_at {
            return Err(StoreError::Domain(CoreError::Validation(
                "end_at must be after start_at".into(),
            )));
        }

        if let Some(staff_id) = staff_id {
            let roster = Self::published_for_staff(pool, current.org_id, staff_id).await?;
            let candidate = ShiftCandidate { staff_id, start_at, end_at };
            if let Some(blocker) = find_conflict(&candidate, &roster, Some(id)) {
                return Err(conflict_error(blocker));
            }
        }

        let query = format!(
            "UPDATE shifts \
             SET staff_id = $2, start_at = $3, end_at = $4, role = $5, \
                 status = $6, is_open = $7, notes = $8, updated_at = now() \
             WHERE id = $1 \
             RETURNING {SHIFT_COLUMNS}"
        );
        sqlx::query_as::<_, ShiftRow>(&query)
            .bind(id)
            .bind(staff_id)
            .bind(start_at)
            .bind(end_at)
            .bind(&role)
            .bind(status.as_str())
            .bind(is_open)
            .bind(&notes)
            .fetch_one(pool)
            .await
            .map_err(map_insert_error)
    }

    /// Promote a draft to published, validating it against the owner's live
    /// roster first — drafts are exempt from blocking until this moment.
    pub async fn publish(pool: &PgPool, id: DbId) -> Result<ShiftRow, StoreError> {
        let current = Self::find_by_id(pool, id)
            .await?
            .ok_or(CoreError::NotFound { entity: "Shift", id })
            .map_err(StoreError::Domain)?;

        if current.status == ShiftStatus::Published.as_str() {
            return Ok(current);
        }

        if let Some(staff_id) = current.staff_id {
            let roster = Self::published_for_staff(pool, current.org_id, staff_id).await?;
            let candidate = ShiftCandidate {
                staff_id,
                start_at: current.start_at,
                end_at: current.end_at,
            };
            if let Some(blocker) = find_conflict(&candidate, &roster, Some(id)) {
                return Err(conflict_error(blocker));
            }
        }

        let query = format!(
            "UPDATE shifts SET status = 'published', updated_at = now() \
             WHERE id = $1 \
             RETURNING {SHIFT_COLUMNS}"
        );
        sqlx::query_as::<_, ShiftRow>(&query)
            .bind(id)
            .fetch_one(pool)
            .await
            .map_err(map_insert_error)
    }

    /// Delete a shift. Returns whether a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM shifts WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Remove a staff member's shifts starting at or after `from`. Used when
    /// clearing a pattern without deleting history.
    pub async fn delete_for_staff_from(
        pool: &PgPool,
        org_id: DbId,
        staff_id: DbId,
        from: Timestamp,
    ) -> Result<u64, StoreError> {
        let result = sqlx::query(
            "DELETE FROM shifts \
             WHERE org_id = $1 AND staff_id = $2 AND start_at >= $3",
        )
        .bind(org_id)
        .bind(staff_id)
        .bind(from)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Latest end instant among a staff member's shifts, if any. Lets
    /// "repeat/extend" expansion start past already-generated rows instead
    /// of duplicating them.
    pub async fn latest_end_for_staff(
        pool: &PgPool,
        org_id: DbId,
        staff_id: DbId,
    ) -> Result<Option<Timestamp>, StoreError> {
        let end: Option<Timestamp> = sqlx::query_scalar(
            "SELECT MAX(end_at) FROM shifts WHERE org_id = $1 AND staff_id = $2",
        )
        .bind(org_id)
        .bind(staff_id)
        .fetch_one(pool)
        .await?;
        Ok(end)
    }

    async fn insert(pool: &PgPool, draft: &ShiftDraft) -> Result<ShiftRow, StoreError> {
        sqlx::query_as::<_, ShiftRow>(&insert_query())
            .bind(draft.org_id)
            .bind(draft.staff_id)
            .bind(draft.start_at)
            .bind(draft.end_at)
            .bind(&draft.role)
            .bind(draft.status.as_str())
            .bind(draft.is_open)
            .bind(&draft.notes)
            .fetch_one(pool)
            .await
            .map_err(map_insert_error)
    }
}

fn insert_query() -> String {
    format!(
        "INSERT INTO shifts (org_id, staff_id, start_at, end_at, role, status, is_open, notes) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
         RETURNING {SHIFT_COLUMNS}"
    )
}

/// Exclusion-constraint violations are conflicts lost to a concurrent
/// writer; everything else passes through.
fn map_insert_error(err: sqlx::Error) -> StoreError {
    if is_overlap_violation(&err) {
        StoreError::Conflict("overlaps a published shift committed concurrently".into())
    } else {
        StoreError::Sqlx(err)
    }
}

fn conflict_error(blocker: &Shift) -> StoreError {
    StoreError::Conflict(format!(
        "overlaps published shift {} ({} - {})",
        blocker.id, blocker.start_at, blocker.end_at
    ))
}

fn into_domain_vec(rows: Vec<ShiftRow>) -> Result<Vec<Shift>, StoreError> {
    rows.into_iter()
        .map(|row| row.into_domain().map_err(StoreError::Domain))
        .collect()
}
