//! Achievement catalog and rule evaluation.
//!
//! # Invariants
//! - The catalog is a fixed data table; rules are a tagged enumeration.
//! - Rules are evaluated from scratch against current state on every call.
//! - Held keys are never reported again and never removed.

use crate::gamification::streak::StreakCalculator;
use crate::model::achievement::AchievementKey;
use crate::model::goal::Goal;
use crate::model::habit::{Habit, HabitFrequency};
use crate::model::user::User;
use chrono::NaiveDate;

/// Condition that unlocks one achievement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AchievementRule {
    /// Any habit has at least one completion.
    AnyHabitCompleted,
    /// Total goal count reaches the threshold.
    GoalCountAtLeast(usize),
    /// Any daily habit holds a current streak of at least this many days.
    DailyStreakAtLeast(u32),
    /// User level reaches the threshold.
    LevelAtLeast(u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AchievementDefinition {
    pub key: AchievementKey,
    pub title: &'static str,
    pub description: &'static str,
    pub rule: AchievementRule,
}

/// Catalog in display order.
pub const ACHIEVEMENT_CATALOG: &[AchievementDefinition] = &[
    AchievementDefinition {
        key: AchievementKey::FirstHabit,
        title: "First Step",
        description: "Complete a habit for the first time.",
        rule: AchievementRule::AnyHabitCompleted,
    },
    AchievementDefinition {
        key: AchievementKey::FiveGoals,
        title: "Visionary",
        description: "Create 5 different goals.",
        rule: AchievementRule::GoalCountAtLeast(5),
    },
    AchievementDefinition {
        key: AchievementKey::PerfectWeek,
        title: "Perfect Week",
        description: "Complete a daily habit 7 days in a row.",
        rule: AchievementRule::DailyStreakAtLeast(7),
    },
    AchievementDefinition {
        key: AchievementKey::LevelFive,
        title: "Committed",
        description: "Reach level 5.",
        rule: AchievementRule::LevelAtLeast(5),
    },
];

impl AchievementRule {
    pub fn is_satisfied(
        &self,
        user: &User,
        goals: &[Goal],
        habits: &[Habit],
        streaks: &StreakCalculator,
    ) -> bool {
        match *self {
            Self::AnyHabitCompleted => habits.iter().any(|habit| !habit.completions.is_empty()),
            Self::GoalCountAtLeast(threshold) => goals.len() >= threshold,
            Self::DailyStreakAtLeast(threshold) => habits
                .iter()
                .filter(|habit| habit.frequency == HabitFrequency::Daily)
                .any(|habit| streaks.current_streak(habit.completion_days()) >= threshold),
            Self::LevelAtLeast(threshold) => user.level >= threshold,
        }
    }
}

/// Looks up the catalog entry for `key`.
pub fn definition(key: AchievementKey) -> &'static AchievementDefinition {
    let index = match key {
        AchievementKey::FirstHabit => 0,
        AchievementKey::FiveGoals => 1,
        AchievementKey::PerfectWeek => 2,
        AchievementKey::LevelFive => 3,
    };
    &ACHIEVEMENT_CATALOG[index]
}

/// Returns keys not yet held whose rule holds now, in catalog order.
///
/// Does not touch `user.achievements`; callers merge the result.
pub fn evaluate_achievements(
    user: &User,
    goals: &[Goal],
    habits: &[Habit],
    today: NaiveDate,
) -> Vec<AchievementKey> {
    let streaks = StreakCalculator::new(today);
    ACHIEVEMENT_CATALOG
        .iter()
        .filter(|entry| !user.has_achievement(entry.key))
        .filter(|entry| entry.rule.is_satisfied(user, goals, habits, &streaks))
        .map(|entry| entry.key)
        .collect()
}

/// Unions `keys` into the user's achievements and returns the ones added.
pub fn merge_achievements(user: &mut User, keys: &[AchievementKey]) -> Vec<AchievementKey> {
    keys.iter()
        .copied()
        .filter(|key| user.achievements.insert(*key))
        .collect()
}

/// Catalog entry paired with the user's unlock status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AchievementBadge {
    pub key: AchievementKey,
    pub title: &'static str,
    pub description: &'static str,
    pub unlocked: bool,
}

/// Renders the whole catalog in display order.
pub fn achievement_board(user: &User) -> Vec<AchievementBadge> {
    ACHIEVEMENT_CATALOG
        .iter()
        .map(|entry| AchievementBadge {
            key: entry.key,
            title: entry.title,
            description: entry.description,
            unlocked: user.has_achievement(entry.key),
        })
        .collect()
}
