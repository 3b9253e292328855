//! Whole-application snapshot exchanged with repositories.

use crate::gamification::xp::apply_xp;
use crate::model::goal::{Goal, GoalId};
use crate::model::habit::{Habit, HabitId};
use crate::model::journal::JournalEntry;
use crate::model::user::User;
use serde::{Deserialize, Serialize};

/// Full persisted state. Missing fields deserialize to defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppState {
    pub goals: Vec<Goal>,
    pub habits: Vec<Habit>,
    pub user: User,
    pub journal_entries: Vec<JournalEntry>,
}

impl AppState {
    pub fn goal(&self, id: GoalId) -> Option<&Goal> {
        self.goals.iter().find(|goal| goal.id == id)
    }

    pub fn goal_mut(&mut self, id: GoalId) -> Option<&mut Goal> {
        self.goals.iter_mut().find(|goal| goal.id == id)
    }

    pub fn habit(&self, id: HabitId) -> Option<&Habit> {
        self.habits.iter().find(|habit| habit.id == id)
    }

    pub fn habit_mut(&mut self, id: HabitId) -> Option<&mut Habit> {
        self.habits.iter_mut().find(|habit| habit.id == id)
    }

    /// Repairs loaded state so record invariants hold.
    ///
    /// - user xp/level are normalized (`xp < XP_PER_LEVEL`, `level >= 1`)
    /// - duplicate completion days collapse to one
    /// - goal progress is re-derived from subtasks, or clamped to 100
    pub fn normalized(mut self) -> Self {
        self.user = apply_xp(self.user, 0);
        for habit in &mut self.habits {
            habit.dedup_completions();
        }
        for goal in &mut self.goals {
            goal.progress_percentage = goal.progress_percentage.min(100);
            goal.apply_derived_progress();
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::AppState;
    use crate::model::goal::{Goal, Subtask};
    use crate::model::habit::{Habit, HabitFrequency};
    use chrono::NaiveDate;

    #[test]
    fn empty_json_object_loads_default_state() {
        let state: AppState = serde_json::from_str("{}").unwrap();
        assert_eq!(state, AppState::default());
        assert_eq!(state.user.level, 1);
        assert_eq!(state.user.xp, 0);
    }

    #[test]
    fn normalized_repairs_loaded_invariants() {
        let mut state = AppState::default();
        state.user.xp = 230;

        let mut goal = Goal::new("Ship", "work");
        goal.subtasks = vec![Subtask::new("a"), Subtask::new("b"), Subtask::new("c")];
        goal.subtasks[0].completed = true;
        goal.progress_percentage = 0;
        state.goals.push(goal);

        let mut habit = Habit::new("Walk", HabitFrequency::Daily);
        let day = NaiveDate::from_ymd_opt(2026, 1, 5).unwrap();
        habit.toggle_completion(day);
        habit.completions.push(habit.completions[0]);
        state.habits.push(habit);

        let state = state.normalized();
        assert_eq!(state.user.level, 3);
        assert_eq!(state.user.xp, 30);
        assert_eq!(state.goals[0].progress_percentage, 33);
        assert_eq!(state.habits[0].completions.len(), 1);
    }
}
