//! Journal entry record.
//!
//! # Invariants
//! - `content` is never blank.
//! - An entry links to at most one goal or one habit, never both.
//! - `created_at` is assigned by the core at write time.

use crate::model::goal::GoalId;
use crate::model::habit::HabitId;
use crate::model::validation::ValidationError;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type JournalEntryId = Uuid;

/// Optional subject of a journal entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum JournalLink {
    Goal(GoalId),
    Habit(HabitId),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    pub id: JournalEntryId,
    /// Unix epoch milliseconds.
    pub created_at: i64,
    pub content: String,
    #[serde(default)]
    pub link: Option<JournalLink>,
}

/// Request model for writing a journal entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JournalDraft {
    pub content: String,
    pub related_goal_id: Option<GoalId>,
    pub related_habit_id: Option<HabitId>,
}

impl JournalDraft {
    /// Validates content and collapses the two optional references.
    pub fn link(&self) -> Result<Option<JournalLink>, ValidationError> {
        match (self.related_goal_id, self.related_habit_id) {
            (Some(_), Some(_)) => Err(ValidationError::ConflictingJournalLinks),
            (Some(goal_id), None) => Ok(Some(JournalLink::Goal(goal_id))),
            (None, Some(habit_id)) => Ok(Some(JournalLink::Habit(habit_id))),
            (None, None) => Ok(None),
        }
    }

    pub fn into_entry(self, created_at: i64) -> Result<JournalEntry, ValidationError> {
        if self.content.trim().is_empty() {
            return Err(ValidationError::EmptyJournalContent);
        }
        let link = self.link()?;
        Ok(JournalEntry {
            id: Uuid::new_v4(),
            created_at,
            content: self.content,
            link,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{JournalDraft, JournalLink};
    use crate::model::validation::ValidationError;
    use uuid::Uuid;

    #[test]
    fn draft_with_both_links_is_rejected() {
        let draft = JournalDraft {
            content: "felt good".to_string(),
            related_goal_id: Some(Uuid::new_v4()),
            related_habit_id: Some(Uuid::new_v4()),
        };
        assert_eq!(
            draft.into_entry(0).unwrap_err(),
            ValidationError::ConflictingJournalLinks
        );
    }

    #[test]
    fn blank_content_is_rejected_before_links() {
        let draft = JournalDraft {
            content: " \n ".to_string(),
            ..JournalDraft::default()
        };
        assert_eq!(
            draft.into_entry(0).unwrap_err(),
            ValidationError::EmptyJournalContent
        );
    }

    #[test]
    fn single_link_is_kept() {
        let habit_id = Uuid::new_v4();
        let entry = JournalDraft {
            content: "ran 5k".to_string(),
            related_goal_id: None,
            related_habit_id: Some(habit_id),
        }
        .into_entry(1_700_000_000_000)
        .unwrap();
        assert_eq!(entry.link, Some(JournalLink::Habit(habit_id)));
        assert_eq!(entry.created_at, 1_700_000_000_000);
    }
}
