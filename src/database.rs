// src/database.rs

use crate::constants::PROGRESS_KEY;
use crate::models::UserProgress;
use log::debug;
use rusqlite::{params, Connection, OptionalExtension, Result};

pub fn init_db(conn: &Connection) -> Result<()> {
    debug!("init_db: checking database schema...");

    // A single key/value table; the learner record is one JSON entry,
    // mirroring the browser local-storage layout this replaces.
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS kv_store (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        );
        ",
    )?;

    Ok(())
}

/// Loads the persisted progress record, or the default for a fresh profile.
pub fn load_progress(conn: &Connection) -> Result<UserProgress> {
    let raw: Option<String> = conn
        .query_row(
            "SELECT value FROM kv_store WHERE key = ?",
            [PROGRESS_KEY],
            |row| row.get(0),
        )
        .optional()?;

    match raw {
        Some(json) => match serde_json::from_str(&json) {
            Ok(progress) => Ok(progress),
            Err(e) => {
                // A mangled record is unrecoverable without versioning;
                // start the learner over rather than crash.
                log::warn!("stored progress is unreadable ({e}), resetting");
                Ok(UserProgress::default())
            }
        },
        None => Ok(UserProgress::default()),
    }
}

/// Writes the whole progress record back under its fixed key.
pub fn save_progress(conn: &Connection, progress: &UserProgress) -> Result<()> {
    let json = serde_json::to_string(progress)
        .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;
    conn.execute(
        "INSERT OR REPLACE INTO kv_store (key, value) VALUES (?, ?)",
        params![PROGRESS_KEY, json],
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        init_db(&conn).unwrap();
        conn
    }

    #[test]
    fn fresh_profile_is_default() {
        let conn = test_conn();
        let progress = load_progress(&conn).unwrap();
        assert_eq!(progress, UserProgress::default());
    }

    #[test]
    fn save_then_load_round_trips() {
        let conn = test_conn();
        let mut progress = UserProgress::default();
        progress.challenges_completed.insert("singleton-debug".into());
        progress.patterns_completed.insert("singleton".into());
        progress.total_points = 100;
        progress.achievements.insert("first-challenge".into());
        progress.streak_days = 3;
        progress.last_activity_ts = 1_700_000_000;

        save_progress(&conn, &progress).unwrap();
        let reloaded = load_progress(&conn).unwrap();
        assert_eq!(reloaded, progress);
    }

    #[test]
    fn save_overwrites_previous_record() {
        let conn = test_conn();
        let mut progress = UserProgress::default();
        progress.total_points = 50;
        save_progress(&conn, &progress).unwrap();
        progress.total_points = 150;
        save_progress(&conn, &progress).unwrap();

        let reloaded = load_progress(&conn).unwrap();
        assert_eq!(reloaded.total_points, 150);
    }

    #[test]
    fn corrupt_record_resets_to_default() {
        let conn = test_conn();
        conn.execute(
            "INSERT INTO kv_store (key, value) VALUES (?, ?)",
            params![PROGRESS_KEY, "{not json"],
        )
        .unwrap();
        let progress = load_progress(&conn).unwrap();
        assert_eq!(progress, UserProgress::default());
    }
}
