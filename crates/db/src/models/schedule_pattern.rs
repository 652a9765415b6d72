//! Per-staff recurrence pattern row model.
//!
//! The pattern itself is stored as JSONB `config` (the serialized
//! [`RecurrenceSpec`]) with `pattern_type` duplicated into its own column
//! for queryability.

use rosterly_core::error::CoreError;
use rosterly_core::pattern::RecurrenceSpec;
use rosterly_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `schedule_patterns` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SchedulePatternRow {
    pub id: DbId,
    pub org_id: DbId,
    pub staff_id: DbId,
    pub pattern_type: String,
    pub config: serde_json::Value,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl SchedulePatternRow {
    /// Deserialize the stored config into the domain spec.
    pub fn into_domain(self) -> Result<RecurrenceSpec, CoreError> {
        serde_json::from_value(self.config)
            .map_err(|e| CoreError::Internal(format!("Malformed pattern config: {e}")))
    }
}

/// The `pattern_type` column value for a spec.
pub fn pattern_type(spec: &RecurrenceSpec) -> &'static str {
    match spec {
        RecurrenceSpec::FixedWeekly { .. } => "fixed_weekly",
        RecurrenceSpec::Rotating { .. } => "rotating",
    }
}
