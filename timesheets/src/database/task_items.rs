//! Task item storage
//!
//! Read side used by the day list and the weekly view, plus the create,
//! update and soft delete operations behind the edit dialogs.
//! Every read returns items with project, category, task and entry type
//! resolved and owned by the item.

use super::models::*;
use super::repository::Repository;
use crate::duration;
use crate::error::{AppError, Result};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use sqlx::FromRow;

/// Raw `task_items` row before references are resolved
#[derive(Debug, FromRow)]
struct TaskItemRow {
    task_item_id: i64,
    start_time: Option<NaiveTime>,
    end_time: Option<NaiveTime>,
    duration: String,
    description: String,
    billable: bool,
    calculated_rate: Option<f64>,
    date_created: DateTime<Utc>,
    date_modified: DateTime<Utc>,
    is_active: bool,
    task_item_type_id: i64,
    project_id: i64,
    category_id: i64,
    task_id: i64,
}

impl TaskItemRow {
    fn timing(&self) -> Result<Timing> {
        match (self.start_time, self.end_time) {
            (None, None) => Ok(Timing::Entry {
                duration: duration::parse(&self.duration)?,
            }),
            (Some(start), Some(end)) => Ok(Timing::Timed { start, end }),
            _ => Err(AppError::Generic(format!(
                "Task item {} has only one of start and end time",
                self.task_item_id
            ))),
        }
    }
}

const SELECT_TASK_ITEMS: &str = r#"
    SELECT task_items.task_item_id,
           task_items.start_time,
           task_items.end_time,
           task_items.duration,
           task_items.description,
           task_items.billable,
           task_items.calculated_rate,
           task_items.date_created,
           task_items.date_modified,
           task_items.is_active,
           task_items.task_item_type_id,
           task_items.project_id,
           task_items.category_id,
           task_items.task_id
    FROM task_items
    INNER JOIN tasks ON task_items.task_id = tasks.task_id
    INNER JOIN categories ON task_items.category_id = categories.category_id
    INNER JOIN projects ON task_items.project_id = projects.project_id
    INNER JOIN task_item_types ON task_items.task_item_type_id = task_item_types.task_item_type_id
"#;

/// Values written for a task item on create and update
struct TaskItemValues {
    timing: Timing,
    duration: String,
    calculated_rate: Option<f64>,
}

impl Repository {
    async fn resolve(&self, row: TaskItemRow) -> Result<TaskItem> {
        let timing = row.timing()?;

        Ok(TaskItem {
            task_item_id: row.task_item_id,
            timing,
            task_item_type: self.get_task_item_type(row.task_item_type_id).await?,
            project: self.get_project(row.project_id).await?,
            category: self.get_category(row.category_id).await?,
            task: self.get_task(row.task_id).await?,
            duration: row.duration,
            description: row.description,
            billable: row.billable,
            calculated_rate: row.calculated_rate,
            date_created: row.date_created,
            date_modified: row.date_modified,
            is_active: row.is_active,
        })
    }

    /// Derive the stored duration and rate from the timing and project
    async fn task_item_values(
        &self,
        timing: Timing,
        billable: bool,
        project_id: i64,
    ) -> Result<TaskItemValues> {
        let length = timing.duration()?;
        let project = self.get_project(project_id).await?;

        let calculated_rate = if billable {
            project.calculated_rate(length)
        } else {
            None
        };

        Ok(TaskItemValues {
            timing,
            duration: duration::format(length),
            calculated_rate,
        })
    }

    /// Active task items whose day is `date`, in insertion order
    pub async fn records_for_date(&self, date: NaiveDate) -> Result<Vec<TaskItem>> {
        self.records_for_range(date, date).await
    }

    /// Active task items dated `first..=last`, by day and then insertion order
    pub async fn records_for_range(
        &self,
        first: NaiveDate,
        last: NaiveDate,
    ) -> Result<Vec<TaskItem>> {
        let query = format!(
            "{} WHERE tasks.task_date BETWEEN ? AND ? AND task_items.is_active = 1 \
             ORDER BY tasks.task_date, task_items.task_item_id",
            SELECT_TASK_ITEMS
        );

        let rows = sqlx::query_as::<_, TaskItemRow>(&query)
            .bind(first)
            .bind(last)
            .fetch_all(&self.pool)
            .await?;

        let mut items = Vec::with_capacity(rows.len());
        for row in rows {
            items.push(self.resolve(row).await?);
        }

        tracing::debug!("Fetched {} task items for {} to {}", items.len(), first, last);
        Ok(items)
    }

    /// Durations of the active task items on `date`, for day totals
    pub async fn durations_for_date(&self, date: NaiveDate) -> Result<Vec<String>> {
        let durations = sqlx::query_scalar::<_, String>(
            r#"
            SELECT task_items.duration
            FROM task_items
            INNER JOIN tasks ON task_items.task_id = tasks.task_id
            WHERE tasks.task_date = ? AND task_items.is_active = 1
            ORDER BY task_items.task_item_id
            "#,
        )
        .bind(date)
        .fetch_all(&self.pool)
        .await?;

        Ok(durations)
    }

    /// Entry type of a task item; `TaskItemKind::Unknown` when no row matches
    pub async fn task_item_kind(&self, task_item_id: i64) -> Result<TaskItemKind> {
        let type_id: Option<i64> = sqlx::query_scalar(
            "SELECT task_item_type_id FROM task_items WHERE task_item_id = ?",
        )
        .bind(task_item_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(type_id.map_or(TaskItemKind::Unknown, TaskItemKind::from_id))
    }

    /// Get a task item by ID, including soft-deleted ones
    pub async fn get_task_item(&self, id: i64) -> Result<TaskItem> {
        let query = format!("{} WHERE task_items.task_item_id = ?", SELECT_TASK_ITEMS);

        let row = sqlx::query_as::<_, TaskItemRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(AppError::TaskItemNotFound(id))?;

        self.resolve(row).await
    }

    /// Create a task item on the day of `req.date`, returning its ID
    pub async fn create_task_item(&self, req: &NewTaskItem) -> Result<i64> {
        let values = self
            .task_item_values(req.timing, req.billable, req.project_id)
            .await?;
        let task = self.get_or_create_task(req.date).await?;
        let now = Utc::now();

        let id = sqlx::query(
            r#"
            INSERT INTO task_items (start_time, end_time, duration, description,
                                    billable, calculated_rate, date_created, date_modified,
                                    is_active, task_item_type_id, project_id, category_id,
                                    task_id)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, 1, ?, ?, ?, ?)
            "#,
        )
        .bind(values.timing.start_time())
        .bind(values.timing.end_time())
        .bind(&values.duration)
        .bind(&req.description)
        .bind(req.billable)
        .bind(values.calculated_rate)
        .bind(now)
        .bind(now)
        .bind(values.timing.kind().id())
        .bind(req.project_id)
        .bind(req.category_id)
        .bind(task.task_id)
        .execute(&self.pool)
        .await?
        .last_insert_rowid();

        tracing::debug!("Created task item: {} on {}", id, req.date);
        Ok(id)
    }

    /// Rewrite a task item's fields and stamp its modification time
    pub async fn update_task_item(&self, req: &UpdateTaskItem) -> Result<TaskItem> {
        let values = self
            .task_item_values(req.timing, req.billable, req.project_id)
            .await?;
        let now = Utc::now();

        let rows = sqlx::query(
            r#"
            UPDATE task_items
            SET start_time = ?, end_time = ?, duration = ?, description = ?,
                billable = ?, calculated_rate = ?, date_modified = ?,
                task_item_type_id = ?, project_id = ?, category_id = ?
            WHERE task_item_id = ?
            "#,
        )
        .bind(values.timing.start_time())
        .bind(values.timing.end_time())
        .bind(&values.duration)
        .bind(&req.description)
        .bind(req.billable)
        .bind(values.calculated_rate)
        .bind(now)
        .bind(values.timing.kind().id())
        .bind(req.project_id)
        .bind(req.category_id)
        .bind(req.task_item_id)
        .execute(&self.pool)
        .await?
        .rows_affected();

        if rows == 0 {
            return Err(AppError::TaskItemNotFound(req.task_item_id));
        }

        tracing::debug!("Updated task item: {}", req.task_item_id);
        self.get_task_item(req.task_item_id).await
    }

    /// Soft delete a task item
    pub async fn delete_task_item(&self, id: i64) -> Result<()> {
        let rows = sqlx::query(
            "UPDATE task_items SET is_active = 0, date_modified = ? \
             WHERE task_item_id = ? AND is_active = 1",
        )
        .bind(Utc::now())
        .bind(id)
        .execute(&self.pool)
        .await?
        .rows_affected();

        if rows == 0 {
            return Err(AppError::TaskItemNotFound(id));
        }

        tracing::debug!("Soft deleted task item: {}", id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::repository::tests::{create_test_repo, seed_project};
    use chrono::Duration;

    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    fn entry(
        date: NaiveDate,
        minutes: i64,
        description: &str,
        project: &Project,
        category: &Category,
    ) -> NewTaskItem {
        NewTaskItem {
            date,
            timing: Timing::Entry {
                duration: Duration::minutes(minutes),
            },
            description: description.to_string(),
            billable: true,
            project_id: project.project_id,
            category_id: category.category_id,
        }
    }

    #[tokio::test]
    async fn test_records_for_date_resolves_references() {
        let repo = create_test_repo().await;
        let (project, category) = seed_project(&repo, Some(30.0)).await;

        let id = repo
            .create_task_item(&entry(monday(), 90, "Cover sheets", &project, &category))
            .await
            .unwrap();

        let items = repo.records_for_date(monday()).await.unwrap();
        assert_eq!(items.len(), 1);

        let item = &items[0];
        assert_eq!(item.task_item_id, id);
        assert_eq!(item.duration, "01:30:00");
        assert_eq!(item.project.display_name, "TPS Reports");
        assert_eq!(item.category.name, "Development");
        assert_eq!(item.task.task_date, monday());
        assert_eq!(item.task_item_type.name, "Entry");
        assert_eq!(item.calculated_rate, Some(45.0));
        assert_eq!(item.kind(), TaskItemKind::Entry);
    }

    #[tokio::test]
    async fn test_records_for_date_keeps_insertion_order_and_filters_day() {
        let repo = create_test_repo().await;
        let (project, category) = seed_project(&repo, None).await;
        let tuesday = monday().succ_opt().unwrap();

        for (date, desc) in [(monday(), "A"), (tuesday, "X"), (monday(), "B"), (monday(), "C")] {
            repo.create_task_item(&entry(date, 15, desc, &project, &category))
                .await
                .unwrap();
        }

        let descriptions: Vec<String> = repo
            .records_for_date(monday())
            .await
            .unwrap()
            .into_iter()
            .map(|item| item.description)
            .collect();

        assert_eq!(descriptions, vec!["A", "B", "C"]);
    }

    #[tokio::test]
    async fn test_records_for_range_orders_by_day() {
        let repo = create_test_repo().await;
        let (project, category) = seed_project(&repo, None).await;
        let wednesday = NaiveDate::from_ymd_opt(2024, 1, 3).unwrap();
        let next_monday = NaiveDate::from_ymd_opt(2024, 1, 8).unwrap();

        let dated = [
            (wednesday, "W1"),
            (monday(), "M1"),
            (next_monday, "Out"),
            (wednesday, "W2"),
        ];
        for (date, desc) in dated {
            repo.create_task_item(&entry(date, 15, desc, &project, &category))
                .await
                .unwrap();
        }

        let descriptions: Vec<String> = repo
            .records_for_range(monday(), NaiveDate::from_ymd_opt(2024, 1, 7).unwrap())
            .await
            .unwrap()
            .into_iter()
            .map(|item| item.description)
            .collect();

        assert_eq!(descriptions, vec!["M1", "W1", "W2"]);
    }

    #[tokio::test]
    async fn test_timed_entry_derives_duration() {
        let repo = create_test_repo().await;
        let (project, category) = seed_project(&repo, None).await;

        let start = NaiveTime::from_hms_opt(9, 0, 0).unwrap();
        let end = NaiveTime::from_hms_opt(11, 20, 0).unwrap();

        let id = repo
            .create_task_item(&NewTaskItem {
                timing: Timing::Timed { start, end },
                ..entry(monday(), 0, "Meeting", &project, &category)
            })
            .await
            .unwrap();

        let item = repo.get_task_item(id).await.unwrap();
        assert_eq!(item.duration, "02:20:00");
        assert_eq!(item.timing, Timing::Timed { start, end });
        assert_eq!(item.calculated_rate, None);
        assert_eq!(repo.task_item_kind(id).await.unwrap(), TaskItemKind::Timed);
    }

    #[tokio::test]
    async fn test_timed_entry_rejects_inverted_range() {
        let repo = create_test_repo().await;
        let (project, category) = seed_project(&repo, None).await;

        let result = repo
            .create_task_item(&NewTaskItem {
                timing: Timing::Timed {
                    start: NaiveTime::from_hms_opt(12, 0, 0).unwrap(),
                    end: NaiveTime::from_hms_opt(11, 0, 0).unwrap(),
                },
                ..entry(monday(), 0, "Backwards", &project, &category)
            })
            .await;

        assert!(matches!(result, Err(AppError::InvalidTimeRange)));
    }

    #[tokio::test]
    async fn test_entry_rejects_zero_and_negative_duration() {
        let repo = create_test_repo().await;
        let (project, category) = seed_project(&repo, Some(60.0)).await;

        for minutes in [0, -30] {
            let result = repo
                .create_task_item(&entry(monday(), minutes, "Nothing", &project, &category))
                .await;
            assert!(matches!(result, Err(AppError::InvalidDuration(_))));
        }

        assert!(repo.records_for_date(monday()).await.unwrap().is_empty());

        let id = repo
            .create_task_item(&entry(monday(), 30, "Half hour", &project, &category))
            .await
            .unwrap();
        let result = repo
            .update_task_item(&UpdateTaskItem {
                task_item_id: id,
                timing: Timing::Entry {
                    duration: Duration::minutes(-30),
                },
                description: "Half hour".to_string(),
                billable: true,
                project_id: project.project_id,
                category_id: category.category_id,
            })
            .await;
        assert!(matches!(result, Err(AppError::InvalidDuration(_))));

        let item = repo.get_task_item(id).await.unwrap();
        assert_eq!(item.duration, "00:30:00");
        assert_eq!(item.calculated_rate, Some(30.0));
    }

    #[tokio::test]
    async fn test_unknown_id_kind_is_sentinel() {
        let repo = create_test_repo().await;

        assert_eq!(repo.task_item_kind(12345).await.unwrap(), TaskItemKind::Unknown);
    }

    #[tokio::test]
    async fn test_soft_delete_hides_from_day_and_totals() {
        let repo = create_test_repo().await;
        let (project, category) = seed_project(&repo, None).await;

        let keep = repo
            .create_task_item(&entry(monday(), 30, "Keep", &project, &category))
            .await
            .unwrap();
        let removed = repo
            .create_task_item(&entry(monday(), 45, "Drop", &project, &category))
            .await
            .unwrap();

        repo.delete_task_item(removed).await.unwrap();

        let items = repo.records_for_date(monday()).await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].task_item_id, keep);

        let durations = repo.durations_for_date(monday()).await.unwrap();
        assert_eq!(durations, vec!["00:30:00".to_string()]);

        let deleted = repo.get_task_item(removed).await.unwrap();
        assert!(!deleted.is_active);

        assert!(matches!(
            repo.delete_task_item(removed).await,
            Err(AppError::TaskItemNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_update_switches_timing_kind() {
        let repo = create_test_repo().await;
        let (project, category) = seed_project(&repo, Some(60.0)).await;

        let id = repo
            .create_task_item(&entry(monday(), 30, "Draft", &project, &category))
            .await
            .unwrap();

        let updated = repo
            .update_task_item(&UpdateTaskItem {
                task_item_id: id,
                timing: Timing::Timed {
                    start: NaiveTime::from_hms_opt(13, 0, 0).unwrap(),
                    end: NaiveTime::from_hms_opt(14, 30, 0).unwrap(),
                },
                description: "Final".to_string(),
                billable: true,
                project_id: project.project_id,
                category_id: category.category_id,
            })
            .await
            .unwrap();

        assert_eq!(updated.description, "Final");
        assert_eq!(updated.duration, "01:30:00");
        assert_eq!(updated.kind(), TaskItemKind::Timed);
        assert_eq!(updated.calculated_rate, Some(90.0));
        assert!(updated.date_modified >= updated.date_created);
    }

    #[tokio::test]
    async fn test_update_missing_item() {
        let repo = create_test_repo().await;
        let (project, category) = seed_project(&repo, None).await;

        let result = repo
            .update_task_item(&UpdateTaskItem {
                task_item_id: 404,
                timing: Timing::Entry {
                    duration: Duration::minutes(5),
                },
                description: String::new(),
                billable: false,
                project_id: project.project_id,
                category_id: category.category_id,
            })
            .await;

        assert!(matches!(result, Err(AppError::TaskItemNotFound(404))));
    }

    #[tokio::test]
    async fn test_storage_error_is_returned() {
        let repo = create_test_repo().await;
        repo.pool.close().await;

        let result = repo.records_for_date(monday()).await;
        assert!(matches!(result, Err(AppError::Database(_))));
    }
}
