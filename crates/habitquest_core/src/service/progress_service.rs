//! Goal/habit/journal progress use-cases.
//!
//! # Responsibility
//! - Apply user actions to the whole-state snapshot and persist the result.
//! - Award XP, level up, and merge newly unlocked achievements.
//! - Serve read models for dashboards (streaks, category shares, badges).
//!
//! # Invariants
//! - Validation and lookup failures happen before any save; a failed call
//!   never writes.
//! - XP is only granted, never deducted, by actions.
//! - Achievements are only merged, never removed.
//! - Goals with subtasks always carry subtask-derived progress.

use crate::gamification::achievements::{
    achievement_board, evaluate_achievements, merge_achievements, AchievementBadge,
};
use crate::gamification::streak::{local_day, StreakCalculator};
use crate::gamification::xp::{apply_xp, habit_completion_xp, subtask_completion_xp};
use crate::model::achievement::AchievementKey;
use crate::model::goal::{rounded_percentage, Goal, GoalDraft, GoalId, Subtask, SubtaskId};
use crate::model::habit::{CompletionToggle, Habit, HabitDraft, HabitFrequency, HabitId};
use crate::model::journal::{JournalDraft, JournalEntry, JournalLink};
use crate::model::state::AppState;
use crate::model::user::User;
use crate::model::validation::{validate_progress, ValidationError};
use crate::repo::state_repo::{RepoError, StateRepository};
use crate::service::clock::{Clock, SystemClock};
use chrono::{DateTime, NaiveDate, TimeZone};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Service error for progress use-cases.
#[derive(Debug)]
pub enum ServiceError {
    /// Target goal does not exist.
    GoalNotFound(GoalId),
    /// Target subtask does not exist on the goal.
    SubtaskNotFound {
        goal_id: GoalId,
        subtask_id: SubtaskId,
    },
    /// Target habit does not exist.
    HabitNotFound(HabitId),
    /// Input rejected before mutation.
    InvalidInput(ValidationError),
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl ServiceError {
    /// Stable code used in log lines.
    pub fn code(&self) -> &'static str {
        match self {
            Self::GoalNotFound(_) | Self::SubtaskNotFound { .. } | Self::HabitNotFound(_) => {
                "not_found"
            }
            Self::InvalidInput(_) => "invalid_input",
            Self::Repo(_) => "repo_failed",
        }
    }
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::GoalNotFound(id) => write!(f, "goal not found: {id}"),
            Self::SubtaskNotFound {
                goal_id,
                subtask_id,
            } => write!(f, "subtask {subtask_id} not found on goal {goal_id}"),
            Self::HabitNotFound(id) => write!(f, "habit not found: {id}"),
            Self::InvalidInput(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidInput(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for ServiceError {
    fn from(value: ValidationError) -> Self {
        Self::InvalidInput(value)
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Result of a state-changing action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionOutcome<T> {
    /// Record as persisted after the action.
    pub record: T,
    /// XP granted by this action before level conversion.
    pub xp_awarded: u32,
    /// Levels gained by this action.
    pub levels_gained: u32,
    /// Achievements unlocked by this action, in catalog order.
    pub unlocked: Vec<AchievementKey>,
    /// User profile after the action.
    pub user: User,
}

/// Habit after a completion toggle, with the direction applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToggledHabit {
    pub habit: Habit,
    pub change: CompletionToggle,
}

/// Current streak of one habit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HabitStreak {
    pub habit_id: HabitId,
    pub title: String,
    pub frequency: HabitFrequency,
    pub streak: u32,
}

/// Share of goals in one category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryShare {
    pub category: String,
    pub count: usize,
    /// Rounded share of all goals, `0..=100`.
    pub percentage: u8,
}

/// Progress service facade over a state repository.
pub struct ProgressService<R: StateRepository, C: Clock = SystemClock> {
    repo: R,
    clock: C,
}

impl<R: StateRepository> ProgressService<R, SystemClock> {
    /// Creates a service using the wall clock.
    pub fn new(repo: R) -> Self {
        Self::with_clock(repo, SystemClock)
    }
}

impl<R: StateRepository, C: Clock> ProgressService<R, C> {
    pub fn with_clock(repo: R, clock: C) -> Self {
        Self { repo, clock }
    }

    pub fn repo(&self) -> &R {
        &self.repo
    }

    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }

    pub fn into_repo(self) -> R {
        self.repo
    }

    /// Creates a goal with zero progress and no subtasks.
    pub fn create_goal(&mut self, draft: GoalDraft) -> ServiceResult<ActionOutcome<Goal>> {
        let result = self.create_goal_inner(draft);
        log_result("goal_create", &result);
        result
    }

    fn create_goal_inner(&mut self, draft: GoalDraft) -> ServiceResult<ActionOutcome<Goal>> {
        let goal = Goal::from_draft(draft)?;
        let mut state = self.load()?;
        state.goals.push(goal.clone());
        self.finish(state, 0, goal)
    }

    /// Replaces a goal with the supplied record.
    ///
    /// Progress is re-derived when subtasks exist; otherwise the supplied
    /// value must be within `0..=100`. Subtask ids must be unique across all
    /// goals. Each net newly completed subtask grants XP.
    pub fn update_goal(&mut self, goal: Goal) -> ServiceResult<ActionOutcome<Goal>> {
        let result = self.update_goal_inner(goal);
        log_result("goal_update", &result);
        result
    }

    fn update_goal_inner(&mut self, goal: Goal) -> ServiceResult<ActionOutcome<Goal>> {
        let state = self.load()?;
        self.apply_goal_update(state, goal)
    }

    /// Sets manual progress. Ignored for goals whose progress is derived.
    pub fn set_goal_progress(
        &mut self,
        goal_id: GoalId,
        progress: i64,
    ) -> ServiceResult<ActionOutcome<Goal>> {
        let result = self.set_goal_progress_inner(goal_id, progress);
        log_result("goal_progress", &result);
        result
    }

    fn set_goal_progress_inner(
        &mut self,
        goal_id: GoalId,
        progress: i64,
    ) -> ServiceResult<ActionOutcome<Goal>> {
        let progress = validate_progress(progress)?;
        let state = self.load()?;
        let mut goal = find_goal(&state, goal_id)?.clone();
        goal.progress_percentage = progress;
        self.apply_goal_update(state, goal)
    }

    /// Flips one subtask's completion flag.
    pub fn toggle_subtask(
        &mut self,
        goal_id: GoalId,
        subtask_id: SubtaskId,
    ) -> ServiceResult<ActionOutcome<Goal>> {
        let result = self.toggle_subtask_inner(goal_id, subtask_id);
        log_result("subtask_toggle", &result);
        result
    }

    fn toggle_subtask_inner(
        &mut self,
        goal_id: GoalId,
        subtask_id: SubtaskId,
    ) -> ServiceResult<ActionOutcome<Goal>> {
        let state = self.load()?;
        let mut goal = find_goal(&state, goal_id)?.clone();
        let subtask = goal
            .subtask_mut(subtask_id)
            .ok_or(ServiceError::SubtaskNotFound {
                goal_id,
                subtask_id,
            })?;
        subtask.completed = !subtask.completed;
        self.apply_goal_update(state, goal)
    }

    /// Replaces all subtasks with fresh incomplete ones.
    ///
    /// Blank titles are dropped. Progress restarts at 0.
    pub fn decompose_goal(
        &mut self,
        goal_id: GoalId,
        titles: Vec<String>,
    ) -> ServiceResult<ActionOutcome<Goal>> {
        let result = self.decompose_goal_inner(goal_id, titles);
        log_result("goal_decompose", &result);
        result
    }

    fn decompose_goal_inner(
        &mut self,
        goal_id: GoalId,
        titles: Vec<String>,
    ) -> ServiceResult<ActionOutcome<Goal>> {
        let state = self.load()?;
        let mut goal = find_goal(&state, goal_id)?.clone();
        goal.subtasks = titles
            .iter()
            .map(|title| title.trim())
            .filter(|title| !title.is_empty())
            .map(Subtask::new)
            .collect();
        goal.progress_percentage = 0;
        self.apply_goal_update(state, goal)
    }

    fn apply_goal_update(
        &mut self,
        mut state: AppState,
        mut updated: Goal,
    ) -> ServiceResult<ActionOutcome<Goal>> {
        let previous_completed = find_goal(&state, updated.id)?.completed_subtasks();

        updated.apply_derived_progress();
        updated.validate()?;
        if let Some(taken) = state
            .goals
            .iter()
            .filter(|goal| goal.id != updated.id)
            .flat_map(|goal| goal.subtasks.iter())
            .find(|task| updated.subtasks.iter().any(|own| own.id == task.id))
        {
            return Err(ValidationError::DuplicateSubtaskId(taken.id).into());
        }

        let xp = subtask_completion_xp(previous_completed, updated.completed_subtasks());
        let slot = state
            .goal_mut(updated.id)
            .ok_or(ServiceError::GoalNotFound(updated.id))?;
        *slot = updated.clone();
        self.finish(state, xp, updated)
    }

    /// Creates a habit with no completions.
    pub fn create_habit(&mut self, draft: HabitDraft) -> ServiceResult<ActionOutcome<Habit>> {
        let result = self.create_habit_inner(draft);
        log_result("habit_create", &result);
        result
    }

    fn create_habit_inner(&mut self, draft: HabitDraft) -> ServiceResult<ActionOutcome<Habit>> {
        let habit = Habit::from_draft(draft)?;
        let mut state = self.load()?;
        state.habits.push(habit.clone());
        self.finish(state, 0, habit)
    }

    /// Adds or removes the completion for `day`.
    ///
    /// Adding grants XP by frequency. Removing grants nothing and deducts
    /// nothing. Days after today are rejected once the habit is found.
    pub fn toggle_habit_completion(
        &mut self,
        habit_id: HabitId,
        day: NaiveDate,
    ) -> ServiceResult<ActionOutcome<ToggledHabit>> {
        let result = self.toggle_habit_completion_inner(habit_id, day);
        log_result("habit_toggle", &result);
        result
    }

    /// Same as [`Self::toggle_habit_completion`] for the local day of `instant`.
    pub fn toggle_habit_completion_at<Tz: TimeZone>(
        &mut self,
        habit_id: HabitId,
        instant: &DateTime<Tz>,
    ) -> ServiceResult<ActionOutcome<ToggledHabit>> {
        self.toggle_habit_completion(habit_id, local_day(instant))
    }

    fn toggle_habit_completion_inner(
        &mut self,
        habit_id: HabitId,
        day: NaiveDate,
    ) -> ServiceResult<ActionOutcome<ToggledHabit>> {
        let mut state = self.load()?;
        let habit = state
            .habit_mut(habit_id)
            .ok_or(ServiceError::HabitNotFound(habit_id))?;
        let today = self.clock.today();
        if day > today {
            return Err(ValidationError::FutureCompletion { day, today }.into());
        }
        let change = habit.toggle_completion(day);
        let xp = match change {
            CompletionToggle::Added => habit_completion_xp(habit.frequency),
            CompletionToggle::Removed => 0,
        };
        let record = ToggledHabit {
            habit: habit.clone(),
            change,
        };
        self.finish(state, xp, record)
    }

    /// Writes a journal entry stamped with the service clock.
    pub fn create_journal_entry(&mut self, draft: JournalDraft) -> ServiceResult<JournalEntry> {
        let result = self.create_journal_entry_inner(draft);
        match &result {
            Ok(entry) => info!(
                "event=journal_create module=service status=ok linked={}",
                entry.link.is_some()
            ),
            Err(err) => warn!(
                "event=journal_create module=service status=error error_code={} error={}",
                err.code(),
                err
            ),
        }
        result
    }

    fn create_journal_entry_inner(&mut self, draft: JournalDraft) -> ServiceResult<JournalEntry> {
        let entry = draft.into_entry(self.clock.now_epoch_ms())?;
        let mut state = self.load()?;
        match entry.link {
            Some(JournalLink::Goal(goal_id)) => {
                find_goal(&state, goal_id)?;
            }
            Some(JournalLink::Habit(habit_id)) => {
                state
                    .habit(habit_id)
                    .ok_or(ServiceError::HabitNotFound(habit_id))?;
            }
            None => {}
        }
        state.journal_entries.push(entry.clone());
        self.repo.save_state(&state)?;
        Ok(entry)
    }

    /// Returns the full normalized snapshot.
    pub fn state(&self) -> ServiceResult<AppState> {
        self.load()
    }

    pub fn user(&self) -> ServiceResult<User> {
        Ok(self.load()?.user)
    }

    pub fn goals(&self) -> ServiceResult<Vec<Goal>> {
        Ok(self.load()?.goals)
    }

    pub fn habits(&self) -> ServiceResult<Vec<Habit>> {
        Ok(self.load()?.habits)
    }

    /// Journal entries, newest first.
    pub fn journal_entries(&self) -> ServiceResult<Vec<JournalEntry>> {
        let mut entries = self.load()?.journal_entries;
        entries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(entries)
    }

    /// Current streak per habit, highest first.
    pub fn habit_streaks(&self) -> ServiceResult<Vec<HabitStreak>> {
        let calculator = StreakCalculator::new(self.clock.today());
        let mut streaks: Vec<HabitStreak> = self
            .load()?
            .habits
            .into_iter()
            .map(|habit| HabitStreak {
                streak: calculator.current_streak(habit.completion_days()),
                habit_id: habit.id,
                title: habit.title,
                frequency: habit.frequency,
            })
            .collect();
        streaks.sort_by(|a, b| b.streak.cmp(&a.streak));
        Ok(streaks)
    }

    /// Goal count per category, most common first.
    pub fn goal_category_shares(&self) -> ServiceResult<Vec<CategoryShare>> {
        let goals = self.load()?.goals;
        let mut counts: Vec<(String, usize)> = Vec::new();
        for goal in &goals {
            match counts.iter_mut().find(|(category, _)| *category == goal.category) {
                Some((_, count)) => *count += 1,
                None => counts.push((goal.category.clone(), 1)),
            }
        }
        counts.sort_by(|a, b| b.1.cmp(&a.1));
        Ok(counts
            .into_iter()
            .map(|(category, count)| CategoryShare {
                percentage: rounded_percentage(count, goals.len()),
                category,
                count,
            })
            .collect())
    }

    /// Achievement catalog with the user's unlock flags.
    pub fn achievement_board(&self) -> ServiceResult<Vec<AchievementBadge>> {
        Ok(achievement_board(&self.load()?.user))
    }

    fn load(&self) -> ServiceResult<AppState> {
        Ok(self.repo.load_state()?.normalized())
    }

    fn finish<T>(
        &mut self,
        mut state: AppState,
        xp_awarded: u32,
        record: T,
    ) -> ServiceResult<ActionOutcome<T>> {
        let previous_level = state.user.level;
        state.user = apply_xp(state.user, i64::from(xp_awarded));

        let candidates = evaluate_achievements(
            &state.user,
            &state.goals,
            &state.habits,
            self.clock.today(),
        );
        let unlocked = merge_achievements(&mut state.user, &candidates);

        self.repo.save_state(&state)?;

        Ok(ActionOutcome {
            record,
            xp_awarded,
            levels_gained: state.user.level.saturating_sub(previous_level),
            unlocked,
            user: state.user,
        })
    }
}

fn find_goal(state: &AppState, goal_id: GoalId) -> ServiceResult<&Goal> {
    state.goal(goal_id).ok_or(ServiceError::GoalNotFound(goal_id))
}

fn log_result<T>(event: &str, result: &ServiceResult<ActionOutcome<T>>) {
    match result {
        Ok(outcome) => info!(
            "event={event} module=service status=ok xp_awarded={} levels_gained={} level={} unlocked={}",
            outcome.xp_awarded,
            outcome.levels_gained,
            outcome.user.level,
            outcome.unlocked.len()
        ),
        Err(err) => warn!(
            "event={event} module=service status=error error_code={} error={}",
            err.code(),
            err
        ),
    }
}
