// src/common/migrations.rs
//! Database migration and schema management

use sqlx::SqlitePool;
use std::env;
use tracing::{info, warn};

/// Run all database migrations
///
/// Tables are created if missing. Set `RESET_DB=true` to drop and recreate
/// everything on startup.
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    let should_reset_db = env::var("RESET_DB").unwrap_or_else(|_| "false".to_string()) == "true";

    if should_reset_db {
        warn!("RESET_DB=true - Dropping all tables and recreating schema...");
        drop_all_tables(pool).await?;
        info!("Dropped old tables");
    }

    create_schema(pool).await?;

    info!("Database migration completed successfully");

    Ok(())
}

/// Create all tables and indexes if they don't exist
pub async fn create_schema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    create_user_tables(pool).await?;
    create_job_tables(pool).await?;
    create_candidate_tables(pool).await?;
    create_indexes(pool).await?;
    Ok(())
}

async fn drop_all_tables(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    let tables = ["candidate_profiles", "jobs", "users"];

    for table in tables {
        sqlx::query(&format!("DROP TABLE IF EXISTS {}", table))
            .execute(pool)
            .await?;
    }

    Ok(())
}

async fn create_user_tables(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id TEXT PRIMARY KEY,
            email TEXT UNIQUE NOT NULL,
            password_hash TEXT NOT NULL,
            role TEXT NOT NULL DEFAULT 'candidate',
            created_at TEXT DEFAULT (datetime('now'))
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_job_tables(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS jobs (
            id TEXT PRIMARY KEY,
            job_title TEXT NOT NULL,
            job_description TEXT,
            company_name TEXT,
            skills_required TEXT,
            marks_10th REAL,
            marks_12th REAL,
            college_cgpa REAL,
            posted_by TEXT,
            posted_at TEXT NOT NULL,
            updated_at TEXT
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_candidate_tables(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    // skills and academic hold JSON arrays of strings
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS candidate_profiles (
            email TEXT PRIMARY KEY,
            name TEXT NOT NULL DEFAULT '',
            skills TEXT NOT NULL DEFAULT '[]',
            summary TEXT NOT NULL DEFAULT '',
            academic TEXT NOT NULL DEFAULT '[]',
            uploaded_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_indexes(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    let indexes = [
        "CREATE INDEX IF NOT EXISTS idx_jobs_posted_at ON jobs(posted_at)",
        "CREATE INDEX IF NOT EXISTS idx_jobs_posted_by ON jobs(posted_by)",
    ];

    for index in indexes {
        sqlx::query(index).execute(pool).await?;
    }

    Ok(())
}
