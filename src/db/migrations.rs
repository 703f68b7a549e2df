// src/db/migrations.rs
//
// Database schema initialization and migrations
//
// PRINCIPLES:
// - Explicit schema versions
// - No automatic migrations
// - Idempotent operations

use rusqlite::Connection;
use crate::error::{AppError, AppResult};

/// Current schema version
/// Increment this when adding migrations
const CURRENT_SCHEMA_VERSION: i32 = 1;

const INITIAL_SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS schema_version (
    version     INTEGER PRIMARY KEY,
    applied_at  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS activity_counters (
    user_id                   TEXT PRIMARY KEY,
    my_list_count             INTEGER NOT NULL DEFAULT 0,
    ratings_count             INTEGER NOT NULL DEFAULT 0,
    reviews_count             INTEGER NOT NULL DEFAULT 0,
    search_filter_uses_count  INTEGER NOT NULL DEFAULT 0,
    trivia_current_streak     INTEGER NOT NULL DEFAULT 0,
    trivia_longest_streak     INTEGER NOT NULL DEFAULT 0,
    trivia_total_score        INTEGER NOT NULL DEFAULT 0,
    updated_at                TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS genre_reviews (
    user_id       TEXT NOT NULL REFERENCES activity_counters(user_id) ON DELETE CASCADE,
    genre_id      INTEGER NOT NULL,
    review_count  INTEGER NOT NULL DEFAULT 0,
    PRIMARY KEY (user_id, genre_id)
);

CREATE TABLE IF NOT EXISTS searched_decades (
    user_id        TEXT NOT NULL REFERENCES activity_counters(user_id) ON DELETE CASCADE,
    decade         INTEGER NOT NULL,
    first_seen_at  TEXT NOT NULL,
    PRIMARY KEY (user_id, decade)
);

CREATE TABLE IF NOT EXISTS unlocked_achievements (
    user_id         TEXT NOT NULL,
    achievement_id  TEXT NOT NULL,
    unlocked_at     TEXT NOT NULL,
    PRIMARY KEY (user_id, achievement_id)
);

CREATE INDEX IF NOT EXISTS idx_unlocked_achievements_user
    ON unlocked_achievements(user_id);
";

/// Initialize the database schema
///
/// Safe to call multiple times (idempotent).
pub fn initialize_database(conn: &Connection) -> AppResult<()> {
    let current_version = get_schema_version(conn)?;

    if current_version == 0 {
        apply_initial_schema(conn)?;
        set_schema_version(conn, 1)?;
    } else if current_version < CURRENT_SCHEMA_VERSION {
        return Err(AppError::Other(format!(
            "Schema version {} is outdated. Expected {}. Manual migration required.",
            current_version, CURRENT_SCHEMA_VERSION
        )));
    } else if current_version > CURRENT_SCHEMA_VERSION {
        return Err(AppError::Other(format!(
            "Schema version {} is newer than supported {}. Update the application.",
            current_version, CURRENT_SCHEMA_VERSION
        )));
    }

    Ok(())
}

/// Returns 0 if schema_version table doesn't exist (fresh database)
fn get_schema_version(conn: &Connection) -> AppResult<i32> {
    let table_exists: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version')",
        [],
        |row| row.get(0),
    )?;

    if !table_exists {
        return Ok(0);
    }

    let version: Option<i32> =
        conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| row.get(0))?;

    Ok(version.unwrap_or(0))
}

fn set_schema_version(conn: &Connection, version: i32) -> AppResult<()> {
    conn.execute(
        "INSERT OR IGNORE INTO schema_version (version, applied_at) VALUES (?1, datetime('now'))",
        [version],
    )?;
    Ok(())
}

fn apply_initial_schema(conn: &Connection) -> AppResult<()> {
    conn.execute_batch(INITIAL_SCHEMA)
        .map_err(|e| AppError::Other(format!("Failed to apply initial schema: {}", e)))
}

/// Runs SQLite's integrity check
pub fn verify_database_integrity(conn: &Connection) -> AppResult<()> {
    let result: String = conn.query_row("PRAGMA integrity_check", [], |row| row.get(0))?;

    if result != "ok" {
        return Err(AppError::Other(format!("Database integrity check failed: {}", result)));
    }

    Ok(())
}

/// Row counts and file size, for debugging
pub fn get_database_stats(conn: &Connection) -> AppResult<DatabaseStats> {
    let page_count: i64 = conn.query_row("PRAGMA page_count", [], |row| row.get(0))?;
    let page_size: i64 = conn.query_row("PRAGMA page_size", [], |row| row.get(0))?;

    let user_count: i64 = conn
        .query_row("SELECT COUNT(*) FROM activity_counters", [], |row| row.get(0))
        .unwrap_or(0);

    let unlock_count: i64 = conn
        .query_row("SELECT COUNT(*) FROM unlocked_achievements", [], |row| row.get(0))
        .unwrap_or(0);

    Ok(DatabaseStats {
        size_bytes: page_count * page_size,
        page_count,
        page_size,
        user_count,
        unlock_count,
    })
}

/// Database statistics
#[derive(Debug)]
pub struct DatabaseStats {
    pub size_bytes: i64,
    pub page_count: i64,
    pub page_size: i64,
    pub user_count: i64,
    pub unlock_count: i64,
}
