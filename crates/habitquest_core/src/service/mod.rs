//! Use-case services for core callers.
//!
//! # Responsibility
//! - Orchestrate load → validate → mutate → evaluate → save cycles.
//! - Keep the service layer storage-agnostic.

pub mod clock;
pub mod progress_service;
