//! Database schema and migrations
//!
//! Applies versioned SQL files in order and records each applied version.
//! Uses SQLite with WAL mode and foreign keys enforced.

use crate::error::{AppError, Result};
use sqlx::{sqlite::SqlitePool, Row};

/// Initialize database with schema
pub async fn initialize_database(pool: &SqlitePool) -> Result<()> {
    tracing::info!("Initializing database schema");

    sqlx::query("PRAGMA journal_mode = WAL")
        .execute(pool)
        .await?;

    sqlx::query("PRAGMA foreign_keys = ON")
        .execute(pool)
        .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS migrations (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    let current_version: i32 = sqlx::query("SELECT COALESCE(MAX(version), 0) FROM migrations")
        .fetch_one(pool)
        .await?
        .get(0);

    tracing::info!("Current database version: {}", current_version);

    apply_migrations(pool, current_version).await?;

    tracing::info!("Database initialization complete");
    Ok(())
}

async fn apply_migrations(pool: &SqlitePool, current_version: i32) -> Result<()> {
    for (version, sql) in get_migrations() {
        if version <= current_version {
            continue;
        }

        tracing::info!("Applying migration version {}", version);

        let mut tx = pool.begin().await?;

        for statement in sql.split(';').filter(|s| !s.trim().is_empty()) {
            sqlx::query(statement)
                .execute(&mut *tx)
                .await
                .map_err(|e| AppError::Migration(format!("version {}: {}", version, e)))?;
        }

        sqlx::query("INSERT INTO migrations (version) VALUES (?)")
            .bind(version)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::info!("Migration version {} applied successfully", version);
    }

    Ok(())
}

fn get_migrations() -> Vec<(i32, &'static str)> {
    vec![(1, include_str!("migrations/001_initial_schema.sql"))]
}
