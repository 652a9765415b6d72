//! Shift row model and DTOs.

use rosterly_core::error::CoreError;
use rosterly_core::shift::{Shift, ShiftStatus};
use rosterly_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `shifts` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ShiftRow {
    pub id: DbId,
    pub org_id: DbId,
    pub staff_id: Option<DbId>,
    pub start_at: Timestamp,
    pub end_at: Timestamp,
    pub role: String,
    pub status: String,
    pub is_open: bool,
    pub notes: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl ShiftRow {
    /// Convert to the domain type the engine operates on.
    pub fn into_domain(self) -> Result<Shift, CoreError> {
        Ok(Shift {
            id: self.id,
            org_id: self.org_id,
            staff_id: self.staff_id,
            start_at: self.start_at,
            end_at: self.end_at,
            role: self.role,
            status: ShiftStatus::parse(&self.status)?,
            is_open: self.is_open,
            notes: self.notes,
        })
    }
}

/// DTO for patching a shift. Absent fields keep their stored value.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateShift {
    pub staff_id: Option<DbId>,
    pub start_at: Option<Timestamp>,
    pub end_at: Option<Timestamp>,
    pub role: Option<String>,
    pub status: Option<ShiftStatus>,
    pub is_open: Option<bool>,
    pub notes: Option<String>,
}

/// Query filter for listing shifts within an organization.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct ShiftFilter {
    pub staff_id: Option<DbId>,
    pub status: Option<ShiftStatus>,
    /// Include only shifts starting at or after this instant.
    pub from: Option<Timestamp>,
    /// Include only shifts starting before this instant.
    pub to: Option<Timestamp>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use chrono::{TimeZone, Utc};

    fn row(status: &str) -> ShiftRow {
        let at = Utc.with_ymd_and_hms(2024, 5, 6, 9, 0, 0).unwrap();
        ShiftRow {
            id: 1,
            org_id: 1,
            staff_id: Some(10),
            start_at: at,
            end_at: at + chrono::Duration::hours(8),
            role: "Handler".into(),
            status: status.into(),
            is_open: false,
            notes: None,
            created_at: at,
            updated_at: at,
        }
    }

    #[test]
    fn row_converts_to_domain_shift() {
        let shift = row("published").into_domain().unwrap();
        assert_eq!(shift.status, ShiftStatus::Published);
        assert_eq!(shift.staff_id, Some(10));
    }

    #[test]
    fn unknown_stored_status_is_rejected() {
        assert_matches!(
            row("archived").into_domain(),
            Err(CoreError::Internal(_))
        );
    }
}
