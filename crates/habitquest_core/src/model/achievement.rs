//! Achievement identity.
//!
//! Keys are persisted by their stable string form. Variant declaration order
//! is the catalog display order, so ordered sets of keys iterate in catalog
//! order.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AchievementKey {
    /// Any habit has at least one completion.
    FirstHabit,
    /// Five or more goals exist.
    FiveGoals,
    /// A daily habit holds a seven-day streak.
    PerfectWeek,
    /// The user reached level five.
    LevelFive,
}

impl AchievementKey {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::FirstHabit => "FIRST_HABIT",
            Self::FiveGoals => "FIVE_GOALS",
            Self::PerfectWeek => "PERFECT_WEEK",
            Self::LevelFive => "LEVEL_FIVE",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "FIRST_HABIT" => Some(Self::FirstHabit),
            "FIVE_GOALS" => Some(Self::FiveGoals),
            "PERFECT_WEEK" => Some(Self::PerfectWeek),
            "LEVEL_FIVE" => Some(Self::LevelFive),
            _ => None,
        }
    }
}
