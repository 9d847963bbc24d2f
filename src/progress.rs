// src/progress.rs

use crate::catalog::Catalog;
use crate::constants::*;
use crate::database;
use crate::models::{GameSession, UserProgress};
use chrono::{DateTime, Datelike, Utc};
use log::{debug, info};
use rusqlite::Connection;

// --- Public Interface ---

/// Records a completed challenge: adds it to the completed set, credits
/// the points, closes the pattern when all of its challenges are done,
/// then re-evaluates streak and achievements and persists the record.
pub fn update_progress(
    conn: &Connection,
    catalog: &Catalog,
    pattern_id: &str,
    challenge_id: &str,
    points: i64,
) -> Result<UserProgress, String> {
    let mut progress = database::load_progress(conn).map_err(|e| e.to_string())?;
    let now = Utc::now().timestamp();

    apply_update(&mut progress, catalog, pattern_id, challenge_id, points, now);
    info!(
        "Progress: +{points} pts for {challenge_id} (total {}, {} challenges, {} patterns)",
        progress.total_points,
        progress.challenges_completed.len(),
        progress.patterns_completed.len()
    );

    database::save_progress(conn, &progress).map_err(|e| e.to_string())?;
    Ok(progress)
}

pub fn get_progress(conn: &Connection) -> Result<UserProgress, String> {
    database::load_progress(conn).map_err(|e| e.to_string())
}

/// Opens a fresh in-memory attempt record. Replaces any stale one.
pub fn start_session(pattern_id: &str, challenge_id: &str) -> GameSession {
    debug!("Session start: {pattern_id}/{challenge_id}");
    GameSession {
        pattern_id: pattern_id.to_string(),
        challenge_id: challenge_id.to_string(),
        started_at: Utc::now().timestamp(),
        ended_at: None,
        completed: false,
        score: 0,
    }
}

/// Finalizes the attempt record and hands it back for display.
pub fn end_session(mut session: GameSession, completed: bool, score: i64) -> GameSession {
    session.ended_at = Some(Utc::now().timestamp());
    session.completed = completed;
    session.score = score;
    debug!(
        "Session end: {}/{} completed={completed} score={score}",
        session.pattern_id, session.challenge_id
    );
    session
}

// --- Internal Bookkeeping ---

fn apply_update(
    progress: &mut UserProgress,
    catalog: &Catalog,
    pattern_id: &str,
    challenge_id: &str,
    points: i64,
    now: i64,
) {
    progress.challenges_completed.insert(challenge_id.to_string());
    progress.total_points += points;

    // A pattern is completed exactly when every challenge under it is.
    if let Some(pattern) = catalog.pattern_by_id(pattern_id) {
        let all_done = pattern
            .challenges
            .iter()
            .all(|c| progress.challenges_completed.contains(&c.id));
        if all_done {
            progress.patterns_completed.insert(pattern.id.clone());
        }
    }

    update_streak(progress, now);
    progress.last_activity_ts = now;
    evaluate_achievements(progress, catalog);
}

fn update_streak(progress: &mut UserProgress, now: i64) {
    let today = day_of(now);
    let last = day_of(progress.last_activity_ts);

    progress.streak_days = if progress.last_activity_ts == 0 {
        1
    } else {
        match today - last {
            0 => progress.streak_days.max(1),
            1 => progress.streak_days + 1,
            _ => 1,
        }
    };
}

fn day_of(ts: i64) -> i64 {
    // Calendar day in UTC; good enough for a daily streak counter.
    DateTime::<Utc>::from_timestamp(ts, 0)
        .map(|t| i64::from(t.date_naive().num_days_from_ce()))
        .unwrap_or(0)
}

fn evaluate_achievements(progress: &mut UserProgress, catalog: &Catalog) {
    if !progress.challenges_completed.is_empty() {
        progress
            .achievements
            .insert(ACHIEVEMENT_FIRST_CHALLENGE.to_string());
    }
    if !progress.patterns_completed.is_empty() {
        progress
            .achievements
            .insert(ACHIEVEMENT_PATTERN_MASTER.to_string());
    }
    if progress.total_points >= POINT_COLLECTOR_THRESHOLD {
        progress
            .achievements
            .insert(ACHIEVEMENT_POINT_COLLECTOR.to_string());
    }
    let all_patterns_done = catalog
        .patterns()
        .iter()
        .all(|p| progress.patterns_completed.contains(&p.id));
    if all_patterns_done && !catalog.patterns().is_empty() {
        progress
            .achievements
            .insert(ACHIEVEMENT_GRAND_ARCHITECT.to_string());
    }
}
