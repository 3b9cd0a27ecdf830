//! SQLite-backed stores.

mod profile_repo;
mod session_repo;

pub use profile_repo::SqliteProfileRepo;
pub use session_repo::SqliteSessionRepo;

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use crate::infrastructure::ports::RepoError;

/// Open (creating if needed) the database and make sure the schema exists.
pub async fn connect(db_path: &str) -> Result<SqlitePool, RepoError> {
    let pool = SqlitePool::connect(&format!("sqlite:{}?mode=rwc", db_path))
        .await
        .map_err(|e| RepoError::database("connect", e))?;

    for statement in SCHEMA {
        sqlx::query(statement)
            .execute(&pool)
            .await
            .map_err(|e| RepoError::database("schema", e))?;
    }

    tracing::info!(db_path, "SQLite store ready");
    Ok(pool)
}

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS games (
        url TEXT PRIMARY KEY,
        status TEXT NOT NULL,
        created_at TEXT NOT NULL,
        ended_at TEXT
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS memberships (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id TEXT NOT NULL,
        session_url TEXT NOT NULL,
        table_name TEXT NOT NULL,
        amount_cents INTEGER NOT NULL,
        joined_at TEXT NOT NULL,
        playing INTEGER NOT NULL DEFAULT 1,
        buyout_cents INTEGER,
        left_at TEXT
    )
    "#,
    // At most one seat in play per member and session
    r#"
    CREATE UNIQUE INDEX IF NOT EXISTS memberships_one_playing
        ON memberships (user_id, session_url) WHERE playing = 1
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS profiles (
        user_id TEXT PRIMARY KEY,
        display_name TEXT NOT NULL,
        venmo TEXT,
        cashapp TEXT,
        zelle TEXT,
        table_name TEXT,
        updated_at TEXT NOT NULL
    )
    "#,
];

fn parse_timestamp(table: &'static str, raw: &str) -> Result<DateTime<Utc>, RepoError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| RepoError::corrupt(table, format!("bad timestamp {:?}: {}", raw, e)))
}
