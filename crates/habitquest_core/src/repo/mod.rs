//! Repository layer: whole-snapshot persistence of application state.
//!
//! # Responsibility
//! - Define the load/save contract consumed by services.
//! - Keep SQLite and file-format details out of business orchestration.
//!
//! # Invariants
//! - `save_state` replaces the stored snapshot as one unit; partial writes
//!   are never observable.
//! - Read paths reject invalid persisted data instead of masking it.

pub mod json_repo;
pub mod sqlite_repo;
pub mod state_repo;
