//! Row models and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` row struct matching the database row, with an
//!   `into_domain()` conversion to the `rosterly-core` type
//! - `Deserialize` DTOs for inserts and patches

pub mod schedule_pattern;
pub mod shift;
pub mod staffing_ratio;
pub mod time_entry;
