//! Core domain logic for HabitQuest.
//! This crate is the single source of truth for progress, streak and
//! gamification invariants.

pub mod db;
pub mod gamification;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use gamification::achievements::{
    achievement_board, evaluate_achievements, merge_achievements, AchievementBadge,
    AchievementDefinition, AchievementRule, ACHIEVEMENT_CATALOG,
};
pub use gamification::streak::{local_day, StreakCalculator};
pub use gamification::xp::{apply_xp, XP_PER_LEVEL};
pub use logging::{default_log_level, init_logging, logging_status, LogLevel, LoggingError};
pub use model::achievement::AchievementKey;
pub use model::goal::{Goal, GoalDraft, GoalId, Subtask, SubtaskId};
pub use model::habit::{CompletionToggle, Habit, HabitCompletion, HabitDraft, HabitFrequency, HabitId};
pub use model::journal::{JournalDraft, JournalEntry, JournalEntryId, JournalLink};
pub use model::state::AppState;
pub use model::user::User;
pub use model::validation::ValidationError;
pub use repo::json_repo::JsonFileStateRepository;
pub use repo::sqlite_repo::SqliteStateRepository;
pub use repo::state_repo::{InMemoryStateRepository, RepoError, RepoResult, StateRepository};
pub use service::clock::{Clock, FixedClock, SystemClock};
pub use service::progress_service::{
    ActionOutcome, CategoryShare, HabitStreak, ProgressService, ServiceError, ServiceResult,
    ToggledHabit,
};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
