//! Domain model for goals, habits, journal entries and the user profile.
//!
//! # Responsibility
//! - Define the canonical records shared by services and repositories.
//! - Own record-local invariants (subtask-derived progress, one completion
//!   per calendar day, exclusive journal links).
//!
//! # Invariants
//! - Every record is identified by a stable UUID that is never reused.
//! - The core never deletes records; it only creates and updates them.

pub mod achievement;
pub mod goal;
pub mod habit;
pub mod journal;
pub mod state;
pub mod user;
pub mod validation;
