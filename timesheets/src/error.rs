//! Error types for the timesheets core
//!
//! All errors use thiserror for structured error handling.
//! Storage failures surface as `AppError::Database` and are never swallowed
//! inside the library; callers decide whether to log and continue.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Task item not found: {0}")]
    TaskItemNotFound(i64),

    #[error("Employer not found: {0}")]
    EmployerNotFound(i64),

    #[error("Project not found: {0}")]
    ProjectNotFound(i64),

    #[error("Category not found: {0}")]
    CategoryNotFound(i64),

    #[error("Invalid duration: {0}")]
    InvalidDuration(String),

    #[error("End time must be after start time")]
    InvalidTimeRange,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("{0}")]
    Generic(String),
}

pub type Result<T> = std::result::Result<T, AppError>;
