//! SQLite storage for timesheets
//!
//! One database file per data directory holds employers, clients,
//! projects, categories, one `tasks` row per calendar day and the task
//! items booked on those days. `Repository` is the only way in; the
//! reference entities live in `repository.rs` and the time entries the
//! day list and weekly view read in `task_items.rs`.

pub mod models;
pub mod repository;
pub mod schema;
pub mod task_items;

pub use models::*;
pub use repository::Repository;
pub use schema::initialize_database;

use crate::error::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

/// Options for the timesheets file: created on first run, WAL journal,
/// foreign keys enforced so task items cannot outlive their references.
fn connect_options(db_path: &Path) -> std::result::Result<SqliteConnectOptions, sqlx::Error> {
    SqliteConnectOptions::from_str(&format!("sqlite://{}?mode=rwc", db_path.display())).map(
        |opts| {
            opts.create_if_missing(true)
                .busy_timeout(Duration::from_secs(5))
                .journal_mode(SqliteJournalMode::Wal)
                .foreign_keys(true)
        },
    )
}

/// Create and initialize a database connection pool.
///
/// Migrations run on a dedicated single-connection pool that is closed
/// before the application pool is created, so every pooled connection
/// sees the final schema.
pub async fn create_pool(db_path: &Path) -> Result<SqlitePool> {
    tracing::info!("Creating database connection pool at: {:?}", db_path);

    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let migration_pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(connect_options(db_path)?)
        .await?;

    initialize_database(&migration_pool).await?;
    migration_pool.close().await;

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(connect_options(db_path)?)
        .await?;

    tracing::info!("Database pool created successfully");

    Ok(pool)
}
