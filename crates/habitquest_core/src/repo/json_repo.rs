//! JSON snapshot file store.
//!
//! # Invariants
//! - A missing file loads as the default state.
//! - Missing fields load as their defaults.
//! - An unparsable file is an error; it is never silently replaced.
//! - Saves write a sibling temp file and rename it over the target.

use crate::model::state::AppState;
use crate::repo::state_repo::{RepoResult, StateRepository};
use log::{info, warn};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// File-backed snapshot store holding one JSON document.
#[derive(Debug, Clone)]
pub struct JsonFileStateRepository {
    path: PathBuf,
}

impl JsonFileStateRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|value| value.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl StateRepository for JsonFileStateRepository {
    fn load_state(&self) -> RepoResult<AppState> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!("event=state_load module=repo status=ok store=json source=default");
                return Ok(AppState::default());
            }
            Err(err) => return Err(err.into()),
        };

        let state = serde_json::from_str::<AppState>(&raw).map_err(|err| {
            warn!(
                "event=state_load module=repo status=error store=json error_code=invalid_json line={} column={}",
                err.line(),
                err.column()
            );
            err
        })?;
        info!(
            "event=state_load module=repo status=ok store=json goals={} habits={} journal_entries={}",
            state.goals.len(),
            state.habits.len(),
            state.journal_entries.len()
        );
        Ok(state)
    }

    fn save_state(&mut self, state: &AppState) -> RepoResult<()> {
        if let Some(parent) = self.path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let encoded = serde_json::to_string_pretty(state)?;
        let temp_path = self.temp_path();
        fs::write(&temp_path, encoded)?;
        fs::rename(&temp_path, &self.path)?;
        info!("event=state_save module=repo status=ok store=json");
        Ok(())
    }
}
