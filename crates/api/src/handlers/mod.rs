//! Request handlers.
//!
//! Each submodule provides async handler functions for one resource.
//! Handlers delegate to `rosterly-core` for all scheduling logic and to the
//! repositories in `rosterly-db` for persistence, mapping errors via
//! [`AppError`](crate::error::AppError).

pub mod attendance;
pub mod coverage;
pub mod health;
pub mod patterns;
pub mod shifts;
pub mod staffing_ratios;
pub mod time_entries;
