//! Input validation errors shared by model records and services.

use chrono::NaiveDate;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Rejection raised before any state mutation happens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Goal or habit title is blank after trim.
    BlankTitle,
    /// Progress value outside `0..=100`.
    ProgressOutOfRange(i64),
    /// Journal content is blank after trim.
    EmptyJournalContent,
    /// Journal entry references both a goal and a habit.
    ConflictingJournalLinks,
    /// Completion day lies after the evaluation day.
    FutureCompletion { day: NaiveDate, today: NaiveDate },
    /// Habit frequency is not `daily` or `weekly`.
    UnknownFrequency(String),
    /// Subtask id appears twice, within one goal or across goals.
    DuplicateSubtaskId(Uuid),
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankTitle => write!(f, "title must not be blank"),
            Self::ProgressOutOfRange(value) => {
                write!(f, "progress must be within 0..=100, got {value}")
            }
            Self::EmptyJournalContent => write!(f, "journal content must not be blank"),
            Self::ConflictingJournalLinks => {
                write!(f, "journal entry may reference a goal or a habit, not both")
            }
            Self::FutureCompletion { day, today } => {
                write!(f, "cannot record completion for {day}, today is {today}")
            }
            Self::UnknownFrequency(value) => {
                write!(f, "unknown habit frequency `{value}`; expected daily|weekly")
            }
            Self::DuplicateSubtaskId(id) => write!(f, "subtask id {id} is already in use"),
        }
    }
}

impl Error for ValidationError {}

/// Rejects titles that are empty after trim and returns the trimmed value.
pub fn normalize_title(value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::BlankTitle);
    }
    Ok(trimmed.to_string())
}

/// Converts a caller-supplied progress value into a percentage.
pub fn validate_progress(value: i64) -> Result<u8, ValidationError> {
    if (0..=100).contains(&value) {
        Ok(value as u8)
    } else {
        Err(ValidationError::ProgressOutOfRange(value))
    }
}

#[cfg(test)]
mod tests {
    use super::{normalize_title, validate_progress, ValidationError};

    #[test]
    fn progress_bounds_are_inclusive() {
        assert_eq!(validate_progress(0), Ok(0));
        assert_eq!(validate_progress(100), Ok(100));
        assert_eq!(validate_progress(37), Ok(37));
        assert_eq!(
            validate_progress(101),
            Err(ValidationError::ProgressOutOfRange(101))
        );
        assert_eq!(
            validate_progress(-10),
            Err(ValidationError::ProgressOutOfRange(-10))
        );
    }

    #[test]
    fn blank_titles_are_rejected() {
        assert_eq!(normalize_title("   "), Err(ValidationError::BlankTitle));
        assert_eq!(normalize_title("  Run  ").as_deref(), Ok("Run"));
    }
}
