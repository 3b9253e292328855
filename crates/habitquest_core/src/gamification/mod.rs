//! Gamification rules: streaks, experience/leveling, achievements.
//!
//! # Responsibility
//! - Compute consecutive-day streaks over completion days.
//! - Apply XP deltas and level-ups.
//! - Evaluate the fixed achievement catalog against current state.
//!
//! # Invariants
//! - Every function here is pure; callers own and persist all state.
//! - Achievement evaluation never mutates the user.

pub mod achievements;
pub mod streak;
pub mod xp;
