//! State repository contract, shared error type and in-memory store.

use crate::db::DbError;
use crate::model::state::AppState;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Persistence failure for snapshot load/save.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    Io(std::io::Error),
    Json(serde_json::Error),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Io(err) => write!(f, "state file i/o failed: {err}"),
            Self::Json(err) => write!(f, "state file is not valid json: {err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted state: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Io(err) => Some(err),
            Self::Json(err) => Some(err),
            Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<std::io::Error> for RepoError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for RepoError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

/// Whole-snapshot store for goals, habits, user and journal.
pub trait StateRepository {
    /// Returns the stored snapshot, or the default state when none exists.
    fn load_state(&self) -> RepoResult<AppState>;
    /// Replaces the stored snapshot.
    fn save_state(&mut self, state: &AppState) -> RepoResult<()>;
}

/// Process-local store, used by tests and embedders without storage.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStateRepository {
    state: AppState,
    save_count: usize,
}

impl InMemoryStateRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_state(state: AppState) -> Self {
        Self {
            state,
            save_count: 0,
        }
    }

    /// Number of successful `save_state` calls.
    pub fn save_count(&self) -> usize {
        self.save_count
    }

    pub fn snapshot(&self) -> &AppState {
        &self.state
    }
}

impl StateRepository for InMemoryStateRepository {
    fn load_state(&self) -> RepoResult<AppState> {
        Ok(self.state.clone())
    }

    fn save_state(&mut self, state: &AppState) -> RepoResult<()> {
        self.state = state.clone();
        self.save_count += 1;
        Ok(())
    }
}
