// src/models.rs

use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Mutex;

use crate::catalog::Catalog;

// --- App State ---

pub struct AppState {
    pub db: Mutex<Connection>,
    pub catalog: Catalog,
    pub lessons_dir: PathBuf,
    pub session: Mutex<Option<GameSession>>,
}

impl AppState {
    pub fn new(conn: Connection, catalog: Catalog, lessons_dir: PathBuf) -> Self {
        AppState {
            db: Mutex::new(conn),
            catalog,
            lessons_dir,
            session: Mutex::new(None),
        }
    }
}

// --- Data Models ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Difficulty {
    Easy = 1,
    Medium = 2,
    Hard = 3,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }
}

impl FromStr for Difficulty {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Easy" => Ok(Difficulty::Easy),
            "Medium" => Ok(Difficulty::Medium),
            "Hard" => Ok(Difficulty::Hard),
            _ => Ok(Difficulty::Medium), // Default fallback
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatternCategory {
    Creational,
    Structural,
    Behavioral,
}

impl PatternCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            PatternCategory::Creational => "creational",
            PatternCategory::Structural => "structural",
            PatternCategory::Behavioral => "behavioral",
        }
    }
}

impl FromStr for PatternCategory {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "creational" => Ok(PatternCategory::Creational),
            "structural" => Ok(PatternCategory::Structural),
            "behavioral" => Ok(PatternCategory::Behavioral),
            other => Err(format!("unknown pattern category: {other}")),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct DesignPattern {
    pub id: String,
    pub name: String,
    pub category: PatternCategory,
    pub description: String,
    pub difficulty: String,
    pub lesson_path: String,
    pub reference_url: String,
    pub challenges: Vec<Challenge>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Challenge {
    pub id: String,
    pub title: String,
    pub description: String,
    pub difficulty: String,
    pub points: i64,
    pub starter_code: String,
    #[serde(default)]
    pub hints: Vec<String>,
    #[serde(default)]
    pub tests: Vec<ChallengeTest>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ChallengeTest {
    pub description: String,
    pub expected_output: String,
}

// Compact listing row for the overview screen.
#[derive(Serialize, Debug)]
pub struct PatternSummary {
    pub id: String,
    pub name: String,
    pub category: String,
    pub difficulty: String,
    pub challenge_count: usize,
    pub total_points: i64,
}

// --- Learner State ---

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct UserProgress {
    pub patterns_completed: BTreeSet<String>,
    pub challenges_completed: BTreeSet<String>,
    pub total_points: i64,
    pub achievements: BTreeSet<String>,
    pub streak_days: i64,
    pub last_activity_ts: i64,
}

/// One in-memory attempt record. Never persisted.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct GameSession {
    pub pattern_id: String,
    pub challenge_id: String,
    pub started_at: i64,
    pub ended_at: Option<i64>,
    pub completed: bool,
    pub score: i64,
}

// --- Code Runner Views ---

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    Success,
    Error,
}

#[derive(Serialize, Debug, Clone)]
pub struct RunReport {
    pub status: RunStatus,
    pub console: Vec<String>,
    pub value: Option<String>,
    pub error: Option<String>,
    pub diagnostics: Vec<String>,
    pub listing: Option<String>,
    pub elapsed_ms: u64,
}

#[derive(Serialize, Debug, Clone)]
pub struct TestResult {
    pub description: String,
    pub passed: bool,
}

#[derive(Serialize, Debug, Clone)]
pub struct Verdict {
    pub accepted: bool,
    pub results: Vec<TestResult>,
    pub feedback: String,
}

#[derive(Serialize, Debug)]
pub struct SubmitReport {
    pub verdict: Verdict,
    pub progress: Option<UserProgress>,
    pub next_challenge_id: Option<String>,
}
