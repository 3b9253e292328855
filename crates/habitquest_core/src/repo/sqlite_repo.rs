//! SQLite-backed snapshot store.
//!
//! # Responsibility
//! - Map `AppState` onto the normalized tables created by migrations.
//! - Replace the stored snapshot inside one immediate transaction.
//!
//! # Invariants
//! - Collection order is preserved through `position` columns.
//! - Read paths reject invalid persisted rows with `InvalidData`.

use crate::db::migrations::latest_version;
use crate::db::{schema_version, DbError};
use crate::model::achievement::AchievementKey;
use crate::model::goal::{Goal, Subtask};
use crate::model::habit::{Habit, HabitCompletion, HabitFrequency};
use crate::model::journal::{JournalEntry, JournalLink};
use crate::model::state::AppState;
use crate::model::user::User;
use crate::repo::state_repo::{RepoError, RepoResult, StateRepository};
use chrono::NaiveDate;
use log::info;
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction, TransactionBehavior};
use std::collections::BTreeSet;
use std::time::Instant;
use uuid::Uuid;

const DAY_FORMAT: &str = "%Y-%m-%d";

/// SQLite snapshot repository over a migrated connection.
pub struct SqliteStateRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteStateRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    ///
    /// Rejects connections whose schema version differs from this binary's.
    pub fn try_new(conn: &'conn mut Connection) -> RepoResult<Self> {
        let version = schema_version(conn)?;
        let latest = latest_version();
        if version > latest {
            return Err(RepoError::Db(DbError::UnsupportedSchemaVersion {
                db_version: version,
                latest_supported: latest,
            }));
        }
        if version < latest {
            return Err(RepoError::InvalidData(format!(
                "connection schema version {version} is not migrated to {latest}"
            )));
        }
        Ok(Self { conn })
    }
}

impl StateRepository for SqliteStateRepository<'_> {
    fn load_state(&self) -> RepoResult<AppState> {
        let conn: &Connection = &*self.conn;
        let state = AppState {
            goals: load_goals(conn)?,
            habits: load_habits(conn)?,
            user: load_user(conn)?,
            journal_entries: load_journal(conn)?,
        };
        Ok(state)
    }

    fn save_state(&mut self, state: &AppState) -> RepoResult<()> {
        let started_at = Instant::now();
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        tx.execute_batch(
            "DELETE FROM journal_entries;
             DELETE FROM habit_completions;
             DELETE FROM habits;
             DELETE FROM subtasks;
             DELETE FROM goals;
             DELETE FROM user_achievements;",
        )?;
        save_user(&tx, &state.user)?;
        save_goals(&tx, &state.goals)?;
        save_habits(&tx, &state.habits)?;
        save_journal(&tx, &state.journal_entries)?;
        tx.commit()?;

        info!(
            "event=state_save module=repo status=ok store=sqlite goals={} habits={} journal_entries={} duration_ms={}",
            state.goals.len(),
            state.habits.len(),
            state.journal_entries.len(),
            started_at.elapsed().as_millis()
        );
        Ok(())
    }
}

fn load_user(conn: &Connection) -> RepoResult<User> {
    let profile = conn
        .query_row(
            "SELECT xp, level FROM user_profile WHERE id = 1;",
            [],
            |row| Ok((row.get::<_, i64>(0)?, row.get::<_, i64>(1)?)),
        )
        .optional()?;

    let mut user = User::default();
    if let Some((xp, level)) = profile {
        user.xp = u32::try_from(xp)
            .map_err(|_| RepoError::InvalidData(format!("invalid xp `{xp}` in user_profile.xp")))?;
        user.level = u32::try_from(level)
            .ok()
            .filter(|value| *value >= 1)
            .ok_or_else(|| {
                RepoError::InvalidData(format!("invalid level `{level}` in user_profile.level"))
            })?;
    }

    let mut stmt = conn.prepare("SELECT achievement_key FROM user_achievements;")?;
    let mut rows = stmt.query([])?;
    let mut achievements = BTreeSet::new();
    while let Some(row) = rows.next()? {
        let key_text: String = row.get(0)?;
        let key = AchievementKey::parse(&key_text).ok_or_else(|| {
            RepoError::InvalidData(format!(
                "unknown achievement `{key_text}` in user_achievements.achievement_key"
            ))
        })?;
        achievements.insert(key);
    }
    user.achievements = achievements;
    Ok(user)
}

fn load_goals(conn: &Connection) -> RepoResult<Vec<Goal>> {
    let mut goal_stmt = conn.prepare(
        "SELECT uuid, title, description, due_date, category, progress_percentage
         FROM goals
         ORDER BY position ASC;",
    )?;
    let mut subtask_stmt = conn.prepare(
        "SELECT uuid, title, completed
         FROM subtasks
         WHERE goal_uuid = ?1
         ORDER BY position ASC;",
    )?;

    let mut goals = Vec::new();
    let mut rows = goal_stmt.query([])?;
    while let Some(row) = rows.next()? {
        let mut goal = parse_goal_row(row)?;
        let mut subtask_rows = subtask_stmt.query([goal.id.to_string()])?;
        while let Some(subtask_row) = subtask_rows.next()? {
            goal.subtasks.push(Subtask {
                id: parse_uuid(subtask_row, "uuid", "subtasks.uuid")?,
                title: subtask_row.get("title")?,
                completed: parse_bool(subtask_row, "completed", "subtasks.completed")?,
            });
        }
        goals.push(goal);
    }
    Ok(goals)
}

fn parse_goal_row(row: &Row<'_>) -> RepoResult<Goal> {
    let due_date = match row.get::<_, Option<String>>("due_date")? {
        Some(text) => Some(parse_day(&text, "goals.due_date")?),
        None => None,
    };
    let progress: i64 = row.get("progress_percentage")?;
    let progress_percentage = u8::try_from(progress)
        .ok()
        .filter(|value| *value <= 100)
        .ok_or_else(|| {
            RepoError::InvalidData(format!(
                "invalid progress `{progress}` in goals.progress_percentage"
            ))
        })?;

    Ok(Goal {
        id: parse_uuid(row, "uuid", "goals.uuid")?,
        title: row.get("title")?,
        description: row.get("description")?,
        due_date,
        category: row.get("category")?,
        progress_percentage,
        subtasks: Vec::new(),
    })
}

fn load_habits(conn: &Connection) -> RepoResult<Vec<Habit>> {
    let mut habit_stmt = conn.prepare(
        "SELECT uuid, title, frequency
         FROM habits
         ORDER BY position ASC;",
    )?;
    let mut completion_stmt = conn.prepare(
        "SELECT completion_day
         FROM habit_completions
         WHERE habit_uuid = ?1
         ORDER BY position ASC;",
    )?;

    let mut habits = Vec::new();
    let mut rows = habit_stmt.query([])?;
    while let Some(row) = rows.next()? {
        let frequency_text: String = row.get("frequency")?;
        let frequency = parse_frequency(&frequency_text).ok_or_else(|| {
            RepoError::InvalidData(format!(
                "invalid frequency `{frequency_text}` in habits.frequency"
            ))
        })?;
        let mut habit = Habit {
            id: parse_uuid(row, "uuid", "habits.uuid")?,
            title: row.get("title")?,
            frequency,
            completions: Vec::new(),
        };

        let mut completion_rows = completion_stmt.query([habit.id.to_string()])?;
        while let Some(completion_row) = completion_rows.next()? {
            let text: String = completion_row.get(0)?;
            habit.completions.push(HabitCompletion {
                completion_date: parse_day(&text, "habit_completions.completion_day")?,
            });
        }
        habits.push(habit);
    }
    Ok(habits)
}

fn load_journal(conn: &Connection) -> RepoResult<Vec<JournalEntry>> {
    let mut stmt = conn.prepare(
        "SELECT uuid, created_at, content, related_goal_uuid, related_habit_uuid
         FROM journal_entries
         ORDER BY position ASC;",
    )?;
    let mut rows = stmt.query([])?;
    let mut entries = Vec::new();
    while let Some(row) = rows.next()? {
        let goal = parse_optional_uuid(row, "related_goal_uuid", "journal_entries.related_goal_uuid")?;
        let habit =
            parse_optional_uuid(row, "related_habit_uuid", "journal_entries.related_habit_uuid")?;
        let link = match (goal, habit) {
            (Some(_), Some(_)) => {
                return Err(RepoError::InvalidData(
                    "journal entry links both a goal and a habit".to_string(),
                ));
            }
            (Some(goal_id), None) => Some(JournalLink::Goal(goal_id)),
            (None, Some(habit_id)) => Some(JournalLink::Habit(habit_id)),
            (None, None) => None,
        };
        entries.push(JournalEntry {
            id: parse_uuid(row, "uuid", "journal_entries.uuid")?,
            created_at: row.get("created_at")?,
            content: row.get("content")?,
            link,
        });
    }
    Ok(entries)
}

fn save_user(tx: &Transaction<'_>, user: &User) -> RepoResult<()> {
    tx.execute(
        "INSERT INTO user_profile (id, xp, level) VALUES (1, ?1, ?2)
         ON CONFLICT(id) DO UPDATE SET xp = excluded.xp, level = excluded.level;",
        params![i64::from(user.xp), i64::from(user.level)],
    )?;
    let mut stmt = tx.prepare("INSERT INTO user_achievements (achievement_key) VALUES (?1);")?;
    for key in &user.achievements {
        stmt.execute([key.as_str()])?;
    }
    Ok(())
}

fn save_goals(tx: &Transaction<'_>, goals: &[Goal]) -> RepoResult<()> {
    let mut goal_stmt = tx.prepare(
        "INSERT INTO goals (
            uuid, position, title, description, due_date, category, progress_percentage
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
    )?;
    let mut subtask_stmt = tx.prepare(
        "INSERT INTO subtasks (uuid, goal_uuid, position, title, completed)
         VALUES (?1, ?2, ?3, ?4, ?5);",
    )?;

    for (position, goal) in goals.iter().enumerate() {
        let goal_uuid = goal.id.to_string();
        goal_stmt.execute(params![
            goal_uuid,
            position as i64,
            goal.title.as_str(),
            goal.description.as_deref(),
            goal.due_date.map(|day| day.format(DAY_FORMAT).to_string()),
            goal.category.as_str(),
            i64::from(goal.progress_percentage),
        ])?;
        for (subtask_position, subtask) in goal.subtasks.iter().enumerate() {
            subtask_stmt.execute(params![
                subtask.id.to_string(),
                goal_uuid,
                subtask_position as i64,
                subtask.title.as_str(),
                bool_to_int(subtask.completed),
            ])?;
        }
    }
    Ok(())
}

fn save_habits(tx: &Transaction<'_>, habits: &[Habit]) -> RepoResult<()> {
    let mut habit_stmt = tx.prepare(
        "INSERT INTO habits (uuid, position, title, frequency) VALUES (?1, ?2, ?3, ?4);",
    )?;
    let mut completion_stmt = tx.prepare(
        "INSERT INTO habit_completions (habit_uuid, completion_day, position)
         VALUES (?1, ?2, ?3);",
    )?;

    for (position, habit) in habits.iter().enumerate() {
        let habit_uuid = habit.id.to_string();
        habit_stmt.execute(params![
            habit_uuid,
            position as i64,
            habit.title.as_str(),
            habit.frequency.as_str(),
        ])?;
        for (completion_position, day) in habit.completion_days().enumerate() {
            completion_stmt.execute(params![
                habit_uuid,
                day.format(DAY_FORMAT).to_string(),
                completion_position as i64,
            ])?;
        }
    }
    Ok(())
}

fn save_journal(tx: &Transaction<'_>, entries: &[JournalEntry]) -> RepoResult<()> {
    let mut stmt = tx.prepare(
        "INSERT INTO journal_entries (
            uuid, position, created_at, content, related_goal_uuid, related_habit_uuid
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
    )?;
    for (position, entry) in entries.iter().enumerate() {
        let (goal_uuid, habit_uuid) = match entry.link {
            Some(JournalLink::Goal(id)) => (Some(id.to_string()), None),
            Some(JournalLink::Habit(id)) => (None, Some(id.to_string())),
            None => (None, None),
        };
        stmt.execute(params![
            entry.id.to_string(),
            position as i64,
            entry.created_at,
            entry.content.as_str(),
            goal_uuid,
            habit_uuid,
        ])?;
    }
    Ok(())
}

fn parse_uuid(row: &Row<'_>, column: &str, label: &str) -> RepoResult<Uuid> {
    let text: String = row.get(column)?;
    Uuid::parse_str(&text)
        .map_err(|_| RepoError::InvalidData(format!("invalid uuid value `{text}` in {label}")))
}

fn parse_optional_uuid(row: &Row<'_>, column: &str, label: &str) -> RepoResult<Option<Uuid>> {
    match row.get::<_, Option<String>>(column)? {
        Some(text) => Uuid::parse_str(&text).map(Some).map_err(|_| {
            RepoError::InvalidData(format!("invalid uuid value `{text}` in {label}"))
        }),
        None => Ok(None),
    }
}

fn parse_day(text: &str, label: &str) -> RepoResult<NaiveDate> {
    NaiveDate::parse_from_str(text, DAY_FORMAT)
        .map_err(|_| RepoError::InvalidData(format!("invalid date `{text}` in {label}")))
}

fn parse_bool(row: &Row<'_>, column: &str, label: &str) -> RepoResult<bool> {
    match row.get::<_, i64>(column)? {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(RepoError::InvalidData(format!(
            "invalid boolean value `{other}` in {label}"
        ))),
    }
}

fn parse_frequency(value: &str) -> Option<HabitFrequency> {
    match value {
        "daily" => Some(HabitFrequency::Daily),
        "weekly" => Some(HabitFrequency::Weekly),
        _ => None,
    }
}

fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}
