//! Habit record and its per-day completion log.
//!
//! # Invariants
//! - A completion is a calendar day; time-of-day is not recorded.
//! - At most one completion per calendar day per habit.

use crate::model::validation::{normalize_title, ValidationError};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

pub type HabitId = Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HabitFrequency {
    Daily,
    Weekly,
}

impl HabitFrequency {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
        }
    }
}

impl FromStr for HabitFrequency {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            other => Err(ValidationError::UnknownFrequency(other.to_string())),
        }
    }
}

/// A calendar day on which the habit was performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HabitCompletion {
    pub completion_date: NaiveDate,
}

/// Result of toggling one day on a habit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionToggle {
    Added,
    Removed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Habit {
    pub id: HabitId,
    pub title: String,
    pub frequency: HabitFrequency,
    #[serde(default)]
    pub completions: Vec<HabitCompletion>,
}

/// Request model for creating a habit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HabitDraft {
    pub title: String,
    pub frequency: HabitFrequency,
}

impl Habit {
    pub fn new(title: impl Into<String>, frequency: HabitFrequency) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            frequency,
            completions: Vec::new(),
        }
    }

    pub fn from_draft(draft: HabitDraft) -> Result<Self, ValidationError> {
        let title = normalize_title(&draft.title)?;
        Ok(Self::new(title, draft.frequency))
    }

    pub fn is_completed_on(&self, day: NaiveDate) -> bool {
        self.completions
            .iter()
            .any(|completion| completion.completion_date == day)
    }

    /// Removes the completion for `day` if present, otherwise appends one.
    pub fn toggle_completion(&mut self, day: NaiveDate) -> CompletionToggle {
        let before = self.completions.len();
        self.completions
            .retain(|completion| completion.completion_date != day);
        if self.completions.len() != before {
            return CompletionToggle::Removed;
        }
        self.completions.push(HabitCompletion {
            completion_date: day,
        });
        CompletionToggle::Added
    }

    pub fn completion_days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.completions
            .iter()
            .map(|completion| completion.completion_date)
    }

    /// Counts distinct completed days inside one calendar month.
    pub fn completions_in_month(&self, year: i32, month: u32) -> usize {
        let mut days: Vec<u32> = self
            .completion_days()
            .filter(|day| day.year() == year && day.month() == month)
            .map(|day| day.day())
            .collect();
        days.sort_unstable();
        days.dedup();
        days.len()
    }

    /// Drops duplicate days while keeping first-seen order.
    pub fn dedup_completions(&mut self) {
        let mut seen = Vec::with_capacity(self.completions.len());
        self.completions.retain(|completion| {
            if seen.contains(&completion.completion_date) {
                false
            } else {
                seen.push(completion.completion_date);
                true
            }
        });
    }
}

/// Number of days in the given month, or `None` for an invalid month.
pub fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    Some(next.signed_duration_since(first).num_days() as u32)
}
