//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument. Write paths that can violate the
//! roster invariant re-run the core conflict validator against a freshly
//! read shift set immediately before committing.

pub mod schedule_pattern_repo;
pub mod shift_repo;
pub mod staffing_ratio_repo;
pub mod time_entry_repo;

pub use schedule_pattern_repo::SchedulePatternRepo;
pub use shift_repo::ShiftRepo;
pub use staffing_ratio_repo::StaffingRatioRepo;
pub use time_entry_repo::TimeEntryRepo;
