//! Experience award policy and leveling.

use crate::model::habit::HabitFrequency;
use crate::model::user::User;

pub const XP_PER_LEVEL: u32 = 100;
pub const DAILY_HABIT_XP: u32 = 10;
pub const WEEKLY_HABIT_XP: u32 = 25;
pub const SUBTASK_XP: u32 = 5;

/// Adds `delta` to the user's XP and converts whole levels.
///
/// Multi-level jumps resolve in one call. Negative deltas floor XP at zero
/// inside the current level; the level never decreases.
pub fn apply_xp(mut user: User, delta: i64) -> User {
    let per_level = i64::from(XP_PER_LEVEL);
    let total = i64::from(user.xp).saturating_add(delta).max(0);
    let levels = total / per_level;

    user.level = user
        .level
        .max(1)
        .saturating_add(u32::try_from(levels).unwrap_or(u32::MAX));
    user.xp = (total % per_level) as u32;
    user
}

/// XP granted when a completion is toggled on.
pub fn habit_completion_xp(frequency: HabitFrequency) -> u32 {
    match frequency {
        HabitFrequency::Daily => DAILY_HABIT_XP,
        HabitFrequency::Weekly => WEEKLY_HABIT_XP,
    }
}

/// XP granted for a net increase in completed subtasks.
///
/// Decreases grant nothing and deduct nothing.
pub fn subtask_completion_xp(previous_completed: usize, completed: usize) -> u32 {
    let gained = completed.saturating_sub(previous_completed);
    u32::try_from(gained)
        .unwrap_or(u32::MAX)
        .saturating_mul(SUBTASK_XP)
}

#[cfg(test)]
mod tests {
    use super::{apply_xp, habit_completion_xp, subtask_completion_xp};
    use crate::model::habit::HabitFrequency;
    use crate::model::user::User;

    fn user(xp: u32, level: u32) -> User {
        User {
            xp,
            level,
            ..User::default()
        }
    }

    #[test]
    fn single_call_matches_sequential_calls() {
        let once = apply_xp(User::default(), 250);
        assert_eq!((once.level, once.xp), (3, 50));

        let stepped = [100, 100, 50]
            .into_iter()
            .fold(User::default(), |acc, delta| apply_xp(acc, delta));
        assert_eq!(stepped, once);
    }

    #[test]
    fn crossing_the_boundary_levels_up() {
        let after = apply_xp(user(95, 1), 25);
        assert_eq!((after.level, after.xp), (2, 20));

        let exact = apply_xp(user(90, 4), 10);
        assert_eq!((exact.level, exact.xp), (5, 0));
    }

    #[test]
    fn negative_delta_floors_at_zero_without_losing_levels() {
        let after = apply_xp(user(30, 3), -50);
        assert_eq!((after.level, after.xp), (3, 0));
    }

    #[test]
    fn zero_delta_normalizes_out_of_range_state() {
        let after = apply_xp(user(310, 0), 0);
        assert_eq!((after.level, after.xp), (4, 10));
    }

    #[test]
    fn award_table_is_fixed() {
        assert_eq!(habit_completion_xp(HabitFrequency::Daily), 10);
        assert_eq!(habit_completion_xp(HabitFrequency::Weekly), 25);
        assert_eq!(subtask_completion_xp(1, 3), 10);
        assert_eq!(subtask_completion_xp(3, 1), 0);
        assert_eq!(subtask_completion_xp(2, 2), 0);
    }
}
