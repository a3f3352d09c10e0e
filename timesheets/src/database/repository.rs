//! Repository layer for database operations
//!
//! CRUD operations for the reference entities task items point at:
//! employers, clients, projects, categories and per-day tasks.
//! Task item operations live in `task_items.rs`.

use super::models::*;
use crate::config::{MAX_NAME_LENGTH, MIN_NAME_LENGTH};
use crate::error::{AppError, Result};
use chrono::{NaiveDate, Utc};
use sqlx::SqlitePool;

/// Repository for database operations
#[derive(Clone)]
pub struct Repository {
    pub(super) pool: SqlitePool,
}

fn validate_name(field: &str, value: &str) -> Result<()> {
    let len = value.trim().chars().count();
    if !(MIN_NAME_LENGTH..=MAX_NAME_LENGTH).contains(&len) {
        return Err(AppError::Validation(format!(
            "{} must be between {} and {} characters",
            field, MIN_NAME_LENGTH, MAX_NAME_LENGTH
        )));
    }
    Ok(())
}

impl Repository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a new employer
    pub async fn create_employer(&self, req: NewEmployer) -> Result<Employer> {
        validate_name("Employer name", &req.name)?;
        let now = Utc::now();

        let employer = sqlx::query_as::<_, Employer>(
            r#"
            INSERT INTO employers (name, description, date_created, date_modified, is_active)
            VALUES (?, ?, ?, ?, 1)
            RETURNING *
            "#,
        )
        .bind(req.name.trim())
        .bind(&req.description)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        tracing::debug!("Created employer: {}", employer.employer_id);
        Ok(employer)
    }

    /// Get an employer by ID, including deactivated ones
    pub async fn get_employer(&self, id: i64) -> Result<Employer> {
        sqlx::query_as::<_, Employer>("SELECT * FROM employers WHERE employer_id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(AppError::EmployerNotFound(id))
    }

    /// Rename or redescribe an employer and stamp its modification time
    pub async fn update_employer(&self, req: UpdateEmployer) -> Result<Employer> {
        validate_name("Employer name", &req.name)?;

        let employer = sqlx::query_as::<_, Employer>(
            r#"
            UPDATE employers
            SET name = ?, description = ?, date_modified = ?
            WHERE employer_id = ?
            RETURNING *
            "#,
        )
        .bind(req.name.trim())
        .bind(&req.description)
        .bind(Utc::now())
        .bind(req.employer_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::EmployerNotFound(req.employer_id))?;

        tracing::debug!("Updated employer: {}", employer.employer_id);
        Ok(employer)
    }

    /// Soft delete an employer
    pub async fn delete_employer(&self, id: i64) -> Result<()> {
        let rows = sqlx::query(
            "UPDATE employers SET is_active = 0, date_modified = ? \
             WHERE employer_id = ? AND is_active = 1",
        )
        .bind(Utc::now())
        .bind(id)
        .execute(&self.pool)
        .await?
        .rows_affected();

        if rows == 0 {
            return Err(AppError::EmployerNotFound(id));
        }

        tracing::debug!("Soft deleted employer: {}", id);
        Ok(())
    }

    /// List active employers
    pub async fn list_employers(&self) -> Result<Vec<Employer>> {
        let employers = sqlx::query_as::<_, Employer>(
            "SELECT * FROM employers WHERE is_active = 1 ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(employers)
    }

    /// Create a new client for an employer
    pub async fn create_client(&self, req: NewClient) -> Result<Client> {
        validate_name("Client name", &req.name)?;
        let now = Utc::now();

        let client = sqlx::query_as::<_, Client>(
            r#"
            INSERT INTO clients (name, description, date_created, date_modified,
                                 is_active, employer_id)
            VALUES (?, ?, ?, ?, 1, ?)
            RETURNING *
            "#,
        )
        .bind(req.name.trim())
        .bind(&req.description)
        .bind(now)
        .bind(now)
        .bind(req.employer_id)
        .fetch_one(&self.pool)
        .await?;

        tracing::debug!("Created client: {} for employer: {}", client.client_id, req.employer_id);
        Ok(client)
    }

    /// Create a new project
    pub async fn create_project(&self, req: NewProject) -> Result<Project> {
        validate_name("Project name", &req.name)?;
        validate_name("Project display name", &req.display_name)?;
        if let Some(rate) = req.rate {
            if !rate.is_finite() || rate < 0.0 {
                return Err(AppError::Validation(format!("Invalid hourly rate: {}", rate)));
            }
        }
        let now = Utc::now();

        let project = sqlx::query_as::<_, Project>(
            r#"
            INSERT INTO projects (name, display_name, is_default, billable, rate,
                                  date_created, date_modified, is_active, employer_id, client_id)
            VALUES (?, ?, ?, ?, ?, ?, ?, 1, ?, ?)
            RETURNING *
            "#,
        )
        .bind(req.name.trim())
        .bind(req.display_name.trim())
        .bind(req.is_default)
        .bind(req.billable)
        .bind(req.rate)
        .bind(now)
        .bind(now)
        .bind(req.employer_id)
        .bind(req.client_id)
        .fetch_one(&self.pool)
        .await?;

        tracing::debug!("Created project: {}", project.project_id);
        Ok(project)
    }

    /// Get a project by ID
    pub async fn get_project(&self, id: i64) -> Result<Project> {
        sqlx::query_as::<_, Project>("SELECT * FROM projects WHERE project_id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(AppError::ProjectNotFound(id))
    }

    /// List active projects
    pub async fn list_projects(&self) -> Result<Vec<Project>> {
        let projects = sqlx::query_as::<_, Project>(
            "SELECT * FROM projects WHERE is_active = 1 ORDER BY display_name",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(projects)
    }

    /// Create a new category under a project
    pub async fn create_category(&self, req: NewCategory) -> Result<Category> {
        validate_name("Category name", &req.name)?;
        let now = Utc::now();

        let category = sqlx::query_as::<_, Category>(
            r#"
            INSERT INTO categories (name, color, billable, description,
                                    date_created, date_modified, is_active, project_id)
            VALUES (?, ?, ?, ?, ?, ?, 1, ?)
            RETURNING *
            "#,
        )
        .bind(req.name.trim())
        .bind(req.color)
        .bind(req.billable)
        .bind(&req.description)
        .bind(now)
        .bind(now)
        .bind(req.project_id)
        .fetch_one(&self.pool)
        .await?;

        tracing::debug!(
            "Created category: {} for project: {}",
            category.category_id,
            req.project_id
        );
        Ok(category)
    }

    /// Get a category by ID
    pub async fn get_category(&self, id: i64) -> Result<Category> {
        sqlx::query_as::<_, Category>("SELECT * FROM categories WHERE category_id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(AppError::CategoryNotFound(id))
    }

    /// Rewrite a category's fields and stamp its modification time
    pub async fn update_category(&self, req: UpdateCategory) -> Result<Category> {
        validate_name("Category name", &req.name)?;

        let category = sqlx::query_as::<_, Category>(
            r#"
            UPDATE categories
            SET name = ?, color = ?, billable = ?, description = ?, date_modified = ?
            WHERE category_id = ?
            RETURNING *
            "#,
        )
        .bind(req.name.trim())
        .bind(req.color)
        .bind(req.billable)
        .bind(&req.description)
        .bind(Utc::now())
        .bind(req.category_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::CategoryNotFound(req.category_id))?;

        tracing::debug!("Updated category: {}", category.category_id);
        Ok(category)
    }

    /// Soft delete a category. Task items booked against it keep pointing at it.
    pub async fn delete_category(&self, id: i64) -> Result<()> {
        let rows = sqlx::query(
            "UPDATE categories SET is_active = 0, date_modified = ? \
             WHERE category_id = ? AND is_active = 1",
        )
        .bind(Utc::now())
        .bind(id)
        .execute(&self.pool)
        .await?
        .rows_affected();

        if rows == 0 {
            return Err(AppError::CategoryNotFound(id));
        }

        tracing::debug!("Soft deleted category: {}", id);
        Ok(())
    }

    /// List active categories of a project
    pub async fn list_categories(&self, project_id: i64) -> Result<Vec<Category>> {
        let categories = sqlx::query_as::<_, Category>(
            "SELECT * FROM categories WHERE project_id = ? AND is_active = 1 ORDER BY name",
        )
        .bind(project_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(categories)
    }

    /// Return the task for `date`, creating it on first use
    pub async fn get_or_create_task(&self, date: NaiveDate) -> Result<Task> {
        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO tasks (task_date, date_created, date_modified, is_active)
            VALUES (?, ?, ?, 1)
            ON CONFLICT(task_date) DO NOTHING
            "#,
        )
        .bind(date)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;

        let task = sqlx::query_as::<_, Task>("SELECT * FROM tasks WHERE task_date = ?")
            .bind(date)
            .fetch_one(&self.pool)
            .await?;

        Ok(task)
    }

    /// Get a task by ID
    pub async fn get_task(&self, id: i64) -> Result<Task> {
        sqlx::query_as::<_, Task>("SELECT * FROM tasks WHERE task_id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::Generic(format!("Task not found: {}", id)))
    }

    /// Get a task item type row by ID
    pub async fn get_task_item_type(&self, id: i64) -> Result<TaskItemType> {
        sqlx::query_as::<_, TaskItemType>(
            "SELECT task_item_type_id, name FROM task_item_types WHERE task_item_type_id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::Generic(format!("Task item type not found: {}", id)))
    }
}
