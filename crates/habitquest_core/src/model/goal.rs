//! Goal and subtask records.
//!
//! # Responsibility
//! - Define the goal record and its ordered subtask list.
//! - Derive progress from subtask completion when subtasks exist.
//!
//! # Invariants
//! - Non-empty `subtasks` means `progress_percentage` is derived and any
//!   caller-supplied value is overwritten.
//! - Empty `subtasks` means `progress_percentage` is caller-owned, `0..=100`.

use crate::model::validation::{normalize_title, validate_progress, ValidationError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

pub type GoalId = Uuid;
pub type SubtaskId = Uuid;

/// One checklist step of a goal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subtask {
    pub id: SubtaskId,
    pub title: String,
    #[serde(default)]
    pub completed: bool,
}

impl Subtask {
    /// Creates an incomplete subtask with a generated ID.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            completed: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Goal {
    pub id: GoalId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub progress_percentage: u8,
    #[serde(default)]
    pub subtasks: Vec<Subtask>,
}

/// Request model for creating a goal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GoalDraft {
    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub category: String,
}

impl Goal {
    /// Creates an empty goal with zero progress and no subtasks.
    pub fn new(title: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            description: None,
            due_date: None,
            category: category.into(),
            progress_percentage: 0,
            subtasks: Vec::new(),
        }
    }

    /// Builds a goal from draft input, trimming the title.
    pub fn from_draft(draft: GoalDraft) -> Result<Self, ValidationError> {
        let title = normalize_title(&draft.title)?;
        let description = draft
            .description
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty());
        Ok(Self {
            description,
            due_date: draft.due_date,
            ..Self::new(title, draft.category.trim())
        })
    }

    pub fn completed_subtasks(&self) -> usize {
        self.subtasks.iter().filter(|task| task.completed).count()
    }

    /// Returns the subtask-derived percentage, or `None` without subtasks.
    pub fn derived_progress(&self) -> Option<u8> {
        if self.subtasks.is_empty() {
            return None;
        }
        Some(rounded_percentage(
            self.completed_subtasks(),
            self.subtasks.len(),
        ))
    }

    /// Overwrites `progress_percentage` when subtasks exist.
    pub fn apply_derived_progress(&mut self) {
        if let Some(progress) = self.derived_progress() {
            self.progress_percentage = progress;
        }
    }

    /// Checks record invariants before persistence.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::BlankTitle);
        }
        validate_progress(i64::from(self.progress_percentage))?;
        let mut seen = HashSet::with_capacity(self.subtasks.len());
        if let Some(repeated) = self.subtasks.iter().find(|task| !seen.insert(task.id)) {
            return Err(ValidationError::DuplicateSubtaskId(repeated.id));
        }
        Ok(())
    }

    pub fn subtask_mut(&mut self, id: SubtaskId) -> Option<&mut Subtask> {
        self.subtasks.iter_mut().find(|task| task.id == id)
    }
}

/// `round(100 * part / total)` with halves rounded up.
///
/// Returns 0 when `total` is 0.
pub fn rounded_percentage(part: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let part = part.min(total) as u64;
    let total = total as u64;
    ((200 * part + total) / (2 * total)) as u8
}

#[cfg(test)]
mod tests {
    use super::{rounded_percentage, Goal, GoalDraft, Subtask};
    use crate::model::validation::ValidationError;

    #[test]
    fn percentages_round_half_up() {
        assert_eq!(rounded_percentage(1, 3), 33);
        assert_eq!(rounded_percentage(2, 3), 67);
        assert_eq!(rounded_percentage(1, 8), 13);
        assert_eq!(rounded_percentage(3, 3), 100);
        assert_eq!(rounded_percentage(0, 0), 0);
    }

    #[test]
    fn derived_progress_overwrites_supplied_value() {
        let mut goal = Goal::new("Read", "learning");
        goal.subtasks = vec![Subtask::new("a"), Subtask::new("b")];
        goal.subtasks[0].completed = true;
        goal.progress_percentage = 90;

        goal.apply_derived_progress();
        assert_eq!(goal.progress_percentage, 50);
    }

    #[test]
    fn manual_progress_is_kept_without_subtasks() {
        let mut goal = Goal::new("Save money", "finance");
        goal.progress_percentage = 45;
        goal.apply_derived_progress();
        assert_eq!(goal.progress_percentage, 45);
    }

    #[test]
    fn from_draft_trims_and_rejects_blank_titles() {
        let goal = Goal::from_draft(GoalDraft {
            title: "  Learn Rust ".to_string(),
            description: Some("   ".to_string()),
            due_date: None,
            category: "study".to_string(),
        })
        .unwrap();
        assert_eq!(goal.title, "Learn Rust");
        assert_eq!(goal.description, None);
        assert_eq!(goal.progress_percentage, 0);

        let err = Goal::from_draft(GoalDraft::default()).unwrap_err();
        assert_eq!(err, ValidationError::BlankTitle);
    }

    #[test]
    fn validate_rejects_repeated_subtask_ids() {
        let mut goal = Goal::new("Move", "home");
        let first = Subtask::new("pack");
        let mut second = Subtask::new("ship");
        second.id = first.id;
        goal.subtasks = vec![first, second];
        assert_eq!(
            goal.validate(),
            Err(ValidationError::DuplicateSubtaskId(goal.subtasks[0].id))
        );
    }

    #[test]
    fn validate_rejects_out_of_range_progress() {
        let mut goal = Goal::new("Run", "health");
        goal.progress_percentage = 120;
        assert_eq!(
            goal.validate(),
            Err(ValidationError::ProgressOutOfRange(120))
        );
    }
}
