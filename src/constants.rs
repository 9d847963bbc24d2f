// src/constants.rs

// --- Storage ---
pub const PROGRESS_KEY: &str = "user_progress";

// --- Time Constants ---
pub const DAY_SECONDS: i64 = 86400;

// --- Code Runner ---
pub const RUN_DELAY_MS: u64 = 400; // UI needs a beat to show the "running" state
pub const SANDBOX_TIMEOUT_MS: u64 = 5000;

// --- Achievements ---
pub const ACHIEVEMENT_FIRST_CHALLENGE: &str = "first-challenge";
pub const ACHIEVEMENT_PATTERN_MASTER: &str = "pattern-master";
pub const ACHIEVEMENT_POINT_COLLECTOR: &str = "point-collector";
pub const ACHIEVEMENT_GRAND_ARCHITECT: &str = "grand-architect";

pub const POINT_COLLECTOR_THRESHOLD: i64 = 500;
