//! User profile record.
//!
//! # Invariants
//! - `level >= 1`.
//! - `xp < XP_PER_LEVEL` once normalized by the XP engine.
//! - `achievements` only grows; keys are never removed.

use crate::model::achievement::AchievementKey;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Singleton gamification profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct User {
    /// Experience inside the current level.
    pub xp: u32,
    /// Current level, starting at 1.
    pub level: u32,
    /// Unlocked achievements, iterated in catalog order.
    pub achievements: BTreeSet<AchievementKey>,
}

impl Default for User {
    fn default() -> Self {
        Self {
            xp: 0,
            level: 1,
            achievements: BTreeSet::new(),
        }
    }
}

impl User {
    pub fn has_achievement(&self, key: AchievementKey) -> bool {
        self.achievements.contains(&key)
    }
}
