//! CLI smoke entry point.
//!
//! # Responsibility
//! - Open a progress database (first argument, or in-memory).
//! - Write logs under the second argument, or `<temp>/habitquest-logs`.
//! - Print level, achievement board and habit streaks for quick checks.

use habitquest_core::db::{open_db, open_db_in_memory};
use habitquest_core::{
    core_version, default_log_level, init_logging, ProgressService, SqliteStateRepository,
};
use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("habitquest: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let log_dir = match args.get(1) {
        Some(dir) => PathBuf::from(dir),
        None => std::env::temp_dir().join("habitquest-logs"),
    };
    init_logging(default_log_level().as_str(), &log_dir.to_string_lossy())?;

    let mut conn = match args.first() {
        Some(path) => open_db(path)?,
        None => open_db_in_memory()?,
    };
    let repo = SqliteStateRepository::try_new(&mut conn)?;
    let service = ProgressService::new(repo);

    println!("habitquest_core version={}", core_version());

    let user = service.user()?;
    println!(
        "level={} xp={}/{}",
        user.level,
        user.xp,
        habitquest_core::XP_PER_LEVEL
    );

    for badge in service.achievement_board()? {
        let mark = if badge.unlocked { "x" } else { " " };
        println!("[{mark}] {} - {}", badge.title, badge.description);
    }

    for streak in service.habit_streaks()? {
        println!(
            "{} ({}) streak={}",
            streak.title,
            streak.frequency.as_str(),
            streak.streak
        );
    }

    Ok(())
}
