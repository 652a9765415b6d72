//! Rosterly scheduling & roster engine.
//!
//! Pure, synchronous domain logic with zero internal deps so it can be used
//! by the repository layer, the API server, and any future CLI tooling:
//!
//! - [`interval`] — half-open time-interval arithmetic
//! - [`pattern`] — recurrence specs and expansion into concrete shifts
//! - [`conflict`] — overlap validation against a staff member's roster
//! - [`coverage`] — demand-driven open-shift generation
//! - [`attendance`] — planned-vs-worked reconciliation and day aggregates
//!
//! All functions take `org_id` / `staff_id` as explicit arguments; there is
//! no ambient "current user" state anywhere in this crate.

pub mod attendance;
pub mod conflict;
pub mod coverage;
pub mod error;
pub mod interval;
pub mod pattern;
pub mod shift;
pub mod types;
