//! Task items service
//!
//! Business logic behind the day list and the edit dialogs: creating,
//! editing and removing entries, day totals, and picking the edit form
//! for an existing entry.

use crate::config::MAX_DESCRIPTION_LENGTH;
use crate::database::{NewTaskItem, Repository, TaskItem, TaskItemKind, UpdateTaskItem};
use crate::duration;
use crate::error::{AppError, Result};
use chrono::{Duration, NaiveDate};

fn validate_description(description: &str) -> Result<()> {
    if description.chars().count() > MAX_DESCRIPTION_LENGTH {
        return Err(AppError::Validation(format!(
            "Description must be at most {} characters",
            MAX_DESCRIPTION_LENGTH
        )));
    }
    Ok(())
}

/// Service for managing task items
#[derive(Clone)]
pub struct TaskItemsService {
    repo: Repository,
}

impl TaskItemsService {
    pub fn new(repo: Repository) -> Self {
        Self { repo }
    }

    /// Create a new task item
    pub async fn create_task_item(&self, req: NewTaskItem) -> Result<TaskItem> {
        tracing::info!("Creating {:?} task item on {}", req.timing.kind(), req.date);
        validate_description(&req.description)?;

        let id = self.repo.create_task_item(&req).await?;

        tracing::info!("Task item created successfully: {}", id);
        self.repo.get_task_item(id).await
    }

    /// Get a task item by ID
    pub async fn get_task_item(&self, id: i64) -> Result<TaskItem> {
        self.repo.get_task_item(id).await
    }

    /// Update a task item
    pub async fn update_task_item(&self, req: UpdateTaskItem) -> Result<TaskItem> {
        tracing::debug!("Updating task item: {}", req.task_item_id);
        validate_description(&req.description)?;

        let item = self.repo.update_task_item(&req).await?;

        tracing::debug!("Task item updated successfully: {}", item.task_item_id);
        Ok(item)
    }

    /// Delete a task item (soft delete)
    pub async fn delete_task_item(&self, id: i64) -> Result<()> {
        tracing::info!("Deleting task item: {}", id);

        self.repo.delete_task_item(id).await?;

        tracing::info!("Task item deleted successfully: {}", id);
        Ok(())
    }

    /// Active task items of one day
    pub async fn list_for_date(&self, date: NaiveDate) -> Result<Vec<TaskItem>> {
        self.repo.records_for_date(date).await
    }

    /// Total time booked on `date`
    pub async fn total_for_date(&self, date: NaiveDate) -> Result<Duration> {
        let durations = self.repo.durations_for_date(date).await?;
        duration::total(&durations)
    }

    /// Which edit form to open for a task item.
    ///
    /// `TaskItemKind::Unknown` means no such item; callers must not open a form for it.
    pub async fn edit_kind(&self, id: i64) -> Result<TaskItemKind> {
        let kind = self.repo.task_item_kind(id).await?;
        if kind == TaskItemKind::Unknown {
            tracing::warn!("No task item type found for task item {}", id);
        }
        Ok(kind)
    }
}
