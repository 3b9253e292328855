use chrono::NaiveDate;
use habitquest_core::db::{open_db, open_db_in_memory};
use habitquest_core::{
    AchievementKey, AppState, Goal, Habit, HabitFrequency, JournalDraft, JsonFileStateRepository,
    RepoError, SqliteStateRepository, StateRepository, Subtask,
};
use uuid::Uuid;

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn sample_state() -> AppState {
    let mut state = AppState::default();
    state.user.xp = 40;
    state.user.level = 3;
    state.user.achievements.insert(AchievementKey::FirstHabit);
    state.user.achievements.insert(AchievementKey::LevelFive);

    let mut goal = Goal::new("Run a marathon", "health");
    goal.description = Some("spring race".to_string());
    goal.due_date = Some(day(2027, 4, 18));
    goal.subtasks = vec![Subtask::new("10k"), Subtask::new("half"), Subtask::new("full")];
    goal.subtasks[0].completed = true;
    goal.apply_derived_progress();
    let goal_id = goal.id;
    state.goals.push(goal);

    let mut manual = Goal::new("Save", "finance");
    manual.progress_percentage = 40;
    state.goals.push(manual);

    let mut habit = Habit::new("Stretch", HabitFrequency::Daily);
    habit.toggle_completion(day(2026, 10, 12));
    habit.toggle_completion(day(2026, 10, 10));
    habit.toggle_completion(day(2026, 10, 11));
    state.habits.push(habit);
    state
        .habits
        .push(Habit::new("Review week", HabitFrequency::Weekly));

    let entry = JournalDraft {
        content: "first long run".to_string(),
        related_goal_id: Some(goal_id),
        related_habit_id: None,
    }
    .into_entry(1_760_000_000_000)
    .unwrap();
    state.journal_entries.push(entry);
    state
}

#[test]
fn sqlite_fresh_database_loads_default_state() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteStateRepository::try_new(&mut conn).unwrap();

    let state = repo.load_state().unwrap();
    assert_eq!(state, AppState::default());
}

#[test]
fn sqlite_snapshot_survives_reopen_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("progress.db");
    let state = sample_state();

    {
        let mut conn = open_db(&path).unwrap();
        let mut repo = SqliteStateRepository::try_new(&mut conn).unwrap();
        repo.save_state(&state).unwrap();
    }

    let mut conn = open_db(&path).unwrap();
    let repo = SqliteStateRepository::try_new(&mut conn).unwrap();
    let loaded = repo.load_state().unwrap();
    assert_eq!(loaded, state);
    assert_eq!(
        loaded.habits[0]
            .completion_days()
            .collect::<Vec<_>>(),
        vec![day(2026, 10, 12), day(2026, 10, 10), day(2026, 10, 11)]
    );
}

#[test]
fn sqlite_save_replaces_previous_snapshot() {
    let mut conn = open_db_in_memory().unwrap();
    let mut repo = SqliteStateRepository::try_new(&mut conn).unwrap();

    repo.save_state(&sample_state()).unwrap();
    let mut smaller = AppState::default();
    smaller.goals.push(Goal::new("Only goal", "misc"));
    repo.save_state(&smaller).unwrap();

    let loaded = repo.load_state().unwrap();
    assert_eq!(loaded, smaller);
    assert!(loaded.habits.is_empty());
    assert!(loaded.journal_entries.is_empty());
    assert!(loaded.user.achievements.is_empty());
}

#[test]
fn sqlite_rejects_invalid_persisted_rows() {
    let mut conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO habits (uuid, position, title, frequency) VALUES (?1, 0, 'x', 'daily');",
        ["not-a-uuid"],
    )
    .unwrap();
    conn.execute(
        "INSERT INTO user_achievements (achievement_key) VALUES ('LEGACY_BADGE');",
        [],
    )
    .unwrap();

    let repo = SqliteStateRepository::try_new(&mut conn).unwrap();
    let err = repo.load_state().unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(message) if message.contains("habits.uuid")));
}

#[test]
fn json_missing_file_loads_default_state() {
    let dir = tempfile::tempdir().unwrap();
    let repo = JsonFileStateRepository::new(dir.path().join("state.json"));

    assert_eq!(repo.load_state().unwrap(), AppState::default());
    assert!(!repo.path().exists());
}

#[test]
fn json_snapshot_survives_save_and_load() {
    let dir = tempfile::tempdir().unwrap();
    let mut repo = JsonFileStateRepository::new(dir.path().join("nested").join("state.json"));
    let state = sample_state();

    repo.save_state(&state).unwrap();
    assert!(repo.path().exists());
    assert_eq!(repo.load_state().unwrap(), state);
}

#[test]
fn json_missing_fields_fill_with_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.json");
    let habit_id = Uuid::new_v4();
    std::fs::write(
        &path,
        format!(
            r#"{{
                "user": {{ "xp": 15 }},
                "habits": [{{ "id": "{habit_id}", "title": "Walk", "frequency": "weekly" }}]
            }}"#
        ),
    )
    .unwrap();

    let state = JsonFileStateRepository::new(&path).load_state().unwrap();
    assert_eq!(state.user.xp, 15);
    assert_eq!(state.user.level, 1);
    assert!(state.user.achievements.is_empty());
    assert!(state.goals.is_empty());
    assert!(state.journal_entries.is_empty());
    assert_eq!(state.habits[0].id, habit_id);
    assert!(state.habits[0].completions.is_empty());
}

#[test]
fn json_corrupt_file_is_reported_not_reset() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.json");
    std::fs::write(&path, "{ not json").unwrap();

    let err = JsonFileStateRepository::new(&path).load_state().unwrap_err();
    assert!(matches!(err, RepoError::Json(_)));
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "{ not json");
}
