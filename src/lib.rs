// src/lib.rs

pub mod catalog;
pub mod constants;
pub mod database;
pub mod grading;
pub mod models;
pub mod progress;
pub mod sandbox;
pub mod transpile;

use crate::catalog::Catalog;
use crate::constants::{RUN_DELAY_MS, SANDBOX_TIMEOUT_MS};
use crate::models::{
    AppState, DesignPattern, GameSession, PatternSummary, RunReport, RunStatus, SubmitReport,
    UserProgress, Verdict,
};
use crate::sandbox::CodeSandbox;
use crate::transpile::Dialect;
use log::info;
use rusqlite::Connection;
use std::fs;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::{Duration, Instant};
use tauri::{Manager, State};

#[tauri::command]
fn open_external_url(url: String) -> Result<(), String> {
    webbrowser::open(&url).map_err(|e| e.to_string())
}

#[tauri::command]
fn get_patterns(state: State<AppState>) -> Vec<PatternSummary> {
    state.catalog.summaries()
}

#[tauri::command]
fn get_pattern(
    state: State<AppState>,
    category: String,
    pattern_id: String,
) -> Option<DesignPattern> {
    state.catalog.pattern_by_ids(&category, &pattern_id).cloned()
}

#[tauri::command]
fn get_lesson(state: State<AppState>, category: String, pattern_id: String) -> Option<String> {
    let pattern = state.catalog.pattern_by_ids(&category, &pattern_id)?;
    Some(state.catalog.lesson_text(&state.lessons_dir, pattern))
}

#[tauri::command]
fn get_progress(state: State<AppState>) -> Result<UserProgress, String> {
    let conn = state.db.lock().unwrap();
    progress::get_progress(&conn)
}

#[tauri::command]
async fn run_code(code: String, dialect: String) -> RunReport {
    run_snippet(&code, &dialect).await
}

#[tauri::command]
fn submit_challenge(
    state: State<AppState>,
    pattern_id: String,
    challenge_id: String,
    code: String,
    console_output: Vec<String>,
) -> Result<SubmitReport, String> {
    let Some(challenge) = state.catalog.challenge(&pattern_id, &challenge_id) else {
        return Ok(SubmitReport {
            verdict: Verdict {
                accepted: false,
                results: Vec::new(),
                feedback: "Challenge not found.".to_string(),
            },
            progress: None,
            next_challenge_id: None,
        });
    };

    let verdict = grading::validate_challenge(challenge, &code, &console_output);
    if !verdict.accepted {
        return Ok(SubmitReport {
            verdict,
            progress: None,
            next_challenge_id: None,
        });
    }

    let conn = state.db.lock().unwrap();
    let progress = progress::update_progress(
        &conn,
        &state.catalog,
        &pattern_id,
        &challenge_id,
        challenge.points,
    )?;
    let next_challenge_id = state.catalog.next_challenge_id(&pattern_id, &challenge_id);
    info!("Accepted {challenge_id} (+{} pts)", challenge.points);

    Ok(SubmitReport {
        verdict,
        progress: Some(progress),
        next_challenge_id,
    })
}

#[tauri::command]
fn start_session(state: State<AppState>, pattern_id: String, challenge_id: String) -> GameSession {
    let session = progress::start_session(&pattern_id, &challenge_id);
    *state.session.lock().unwrap() = Some(session.clone());
    session
}

#[tauri::command]
fn end_session(state: State<AppState>, completed: bool, score: i64) -> Option<GameSession> {
    let mut slot = state.session.lock().unwrap();
    slot.take()
        .map(|session| progress::end_session(session, completed, score))
}

/// One full code run: fixed delay, strip, sandboxed execution, report.
pub async fn run_snippet(code: &str, dialect: &str) -> RunReport {
    let started = Instant::now();

    // Let the UI settle into its "running" state before work begins.
    tokio::time::sleep(Duration::from_millis(RUN_DELAY_MS)).await;

    let dialect = Dialect::from_str(dialect).unwrap_or(Dialect::TypeScript);
    let stripped = transpile::strip_types(code, dialect);

    match CodeSandbox::new(SANDBOX_TIMEOUT_MS).execute(&stripped) {
        Ok(outcome) => RunReport {
            status: RunStatus::Success,
            console: outcome.console,
            value: outcome.value,
            error: None,
            diagnostics: Vec::new(),
            listing: None,
            elapsed_ms: started.elapsed().as_millis() as u64,
        },
        Err(e) => RunReport {
            status: RunStatus::Error,
            console: Vec::new(),
            value: None,
            error: Some(e.to_string()),
            diagnostics: transpile::scan_residual_syntax(&stripped),
            listing: Some(transpile::number_lines(&stripped)),
            elapsed_ms: started.elapsed().as_millis() as u64,
        },
    }
}

pub fn run() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();

    info!("Starting Pattern Trainer backend...");
    tauri::Builder::default()
        .setup(|app| {
            let app_handle = app.handle();
            let app_data_dir = app_handle
                .path()
                .app_data_dir()
                .expect("failed to get app data dir");

            if !app_data_dir.exists() {
                fs::create_dir_all(&app_data_dir).expect("failed to create app data dir");
            }

            let db_path = app_data_dir.join("pattern_trainer.db");
            info!("Database path: {:?}", db_path);
            let conn = Connection::open(db_path).expect("Failed to open DB");
            database::init_db(&conn).expect("Failed to init DB");

            let catalog = Catalog::load().expect("Failed to parse pattern catalog");

            let lessons_dir = app_handle
                .path()
                .resource_dir()
                .map(|dir| dir.join("lessons"))
                .unwrap_or_else(|_| PathBuf::from("lessons"));

            app.manage(AppState::new(conn, catalog, lessons_dir));
            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            get_patterns,
            get_pattern,
            get_lesson,
            get_progress,
            run_code,
            submit_challenge,
            start_session,
            end_session,
            open_external_url
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
