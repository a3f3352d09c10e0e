//! Database models
//!
//! Rust structs representing database entities.
//! Reference entities map one-to-one onto their tables; a `TaskItem`
//! is assembled from its row plus the project, category, task and
//! entry type it references.

use crate::duration;
use crate::error::{AppError, Result};
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// An employer owning clients and projects
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Employer {
    pub employer_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub date_created: DateTime<Utc>,
    pub date_modified: DateTime<Utc>,
    pub is_active: bool,
}

/// A client of an employer
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Client {
    pub client_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub date_created: DateTime<Utc>,
    pub date_modified: DateTime<Utc>,
    pub is_active: bool,
    pub employer_id: i64,
}

/// A project that time is booked against
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Project {
    pub project_id: i64,
    pub name: String,
    /// Name shown in lists and the weekly view
    pub display_name: String,
    pub is_default: bool,
    pub billable: bool,
    /// Hourly rate, when known
    pub rate: Option<f64>,
    pub date_created: DateTime<Utc>,
    pub date_modified: DateTime<Utc>,
    pub is_active: bool,
    pub employer_id: i64,
    pub client_id: Option<i64>,
}

/// How time booked against a project is billed
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BillingScenario {
    NonBillable,
    BillableUnknownRate,
    BillableHourly(f64),
}

impl Project {
    pub fn billing(&self) -> BillingScenario {
        match (self.billable, self.rate) {
            (false, _) => BillingScenario::NonBillable,
            (true, None) => BillingScenario::BillableUnknownRate,
            (true, Some(rate)) => BillingScenario::BillableHourly(rate),
        }
    }

    /// Rate owed for `duration` of billable work, if this project bills hourly
    pub fn calculated_rate(&self, duration: Duration) -> Option<f64> {
        match self.billing() {
            BillingScenario::BillableHourly(rate) => {
                Some(rate * duration.num_seconds() as f64 / crate::config::SECONDS_PER_HOUR)
            }
            _ => None,
        }
    }
}

/// A category within a project
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Category {
    pub category_id: i64,
    pub name: String,
    /// 0xRRGGBB
    pub color: i64,
    pub billable: bool,
    pub description: Option<String>,
    pub date_created: DateTime<Utc>,
    pub date_modified: DateTime<Utc>,
    pub is_active: bool,
    pub project_id: i64,
}

/// One calendar day grouping task items
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Task {
    pub task_id: i64,
    pub task_date: NaiveDate,
    pub date_created: DateTime<Utc>,
    pub date_modified: DateTime<Utc>,
    pub is_active: bool,
}

/// Row of the `task_item_types` lookup table
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TaskItemType {
    pub task_item_type_id: i64,
    pub name: String,
}

/// Which edit form a task item belongs to.
///
/// `Unknown` is returned when a lookup finds no row; it is never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskItemKind {
    Unknown = 0,
    Entry = 1,
    Timed = 2,
}

impl TaskItemKind {
    pub fn from_id(id: i64) -> Self {
        match id {
            1 => TaskItemKind::Entry,
            2 => TaskItemKind::Timed,
            _ => TaskItemKind::Unknown,
        }
    }

    pub fn id(self) -> i64 {
        self as i64
    }
}

/// Either a duration typed in directly or a start/end pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Timing {
    Entry { duration: Duration },
    Timed { start: NaiveTime, end: NaiveTime },
}

impl Timing {
    pub fn kind(&self) -> TaskItemKind {
        match self {
            Timing::Entry { .. } => TaskItemKind::Entry,
            Timing::Timed { .. } => TaskItemKind::Timed,
        }
    }

    /// Entry durations are taken as given; timed durations are `end - start`.
    /// Either way the result is at least one whole second.
    pub fn duration(&self) -> Result<Duration> {
        let length = match *self {
            Timing::Entry { duration } => duration,
            Timing::Timed { start, end } => duration::between(start, end)?,
        };

        if length.num_seconds() < 1 {
            return Err(AppError::InvalidDuration(duration::format(length)));
        }
        Ok(length)
    }

    pub fn start_time(&self) -> Option<NaiveTime> {
        match *self {
            Timing::Timed { start, .. } => Some(start),
            Timing::Entry { .. } => None,
        }
    }

    pub fn end_time(&self) -> Option<NaiveTime> {
        match *self {
            Timing::Timed { end, .. } => Some(end),
            Timing::Entry { .. } => None,
        }
    }
}

/// A time entry with its references resolved
#[derive(Debug, Clone)]
pub struct TaskItem {
    pub task_item_id: i64,
    pub timing: Timing,
    /// `HH:MM:SS`
    pub duration: String,
    pub description: String,
    pub billable: bool,
    pub calculated_rate: Option<f64>,
    pub date_created: DateTime<Utc>,
    pub date_modified: DateTime<Utc>,
    pub is_active: bool,
    pub task_item_type: TaskItemType,
    pub project: Project,
    pub category: Category,
    pub task: Task,
}

impl TaskItem {
    pub fn kind(&self) -> TaskItemKind {
        self.timing.kind()
    }

    pub fn task_date(&self) -> NaiveDate {
        self.task.task_date
    }
}

/// Create employer request
#[derive(Debug, Clone, Deserialize)]
pub struct NewEmployer {
    pub name: String,
    pub description: Option<String>,
}

/// Update employer request
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateEmployer {
    pub employer_id: i64,
    pub name: String,
    pub description: Option<String>,
}

/// Create client request
#[derive(Debug, Clone, Deserialize)]
pub struct NewClient {
    pub name: String,
    pub description: Option<String>,
    pub employer_id: i64,
}

/// Create project request
#[derive(Debug, Clone, Deserialize)]
pub struct NewProject {
    pub name: String,
    pub display_name: String,
    pub is_default: bool,
    pub billable: bool,
    pub rate: Option<f64>,
    pub employer_id: i64,
    pub client_id: Option<i64>,
}

/// Create category request
#[derive(Debug, Clone, Deserialize)]
pub struct NewCategory {
    pub name: String,
    pub color: i64,
    pub billable: bool,
    pub description: Option<String>,
    pub project_id: i64,
}

/// Update category request
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateCategory {
    pub category_id: i64,
    pub name: String,
    pub color: i64,
    pub billable: bool,
    pub description: Option<String>,
}

/// Create task item request
#[derive(Debug, Clone)]
pub struct NewTaskItem {
    pub date: NaiveDate,
    pub timing: Timing,
    pub description: String,
    pub billable: bool,
    pub project_id: i64,
    pub category_id: i64,
}

/// Update task item request. The owning day is not changed.
#[derive(Debug, Clone)]
pub struct UpdateTaskItem {
    pub task_item_id: i64,
    pub timing: Timing,
    pub description: String,
    pub billable: bool,
    pub project_id: i64,
    pub category_id: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project(billable: bool, rate: Option<f64>) -> Project {
        Project {
            project_id: 1,
            name: "acme".to_string(),
            display_name: "ACME".to_string(),
            is_default: false,
            billable,
            rate,
            date_created: Utc::now(),
            date_modified: Utc::now(),
            is_active: true,
            employer_id: 1,
            client_id: None,
        }
    }

    #[test]
    fn test_billing_scenarios() {
        assert_eq!(project(false, Some(50.0)).billing(), BillingScenario::NonBillable);
        assert_eq!(project(true, None).billing(), BillingScenario::BillableUnknownRate);
        assert_eq!(project(true, Some(50.0)).billing(), BillingScenario::BillableHourly(50.0));
    }

    #[test]
    fn test_calculated_rate_only_for_hourly() {
        let ninety_minutes = Duration::minutes(90);

        assert_eq!(project(true, Some(40.0)).calculated_rate(ninety_minutes), Some(60.0));
        assert_eq!(project(true, None).calculated_rate(ninety_minutes), None);
        assert_eq!(project(false, Some(40.0)).calculated_rate(ninety_minutes), None);
    }

    #[test]
    fn test_task_item_kind_sentinel() {
        assert_eq!(TaskItemKind::from_id(1), TaskItemKind::Entry);
        assert_eq!(TaskItemKind::from_id(2), TaskItemKind::Timed);
        assert_eq!(TaskItemKind::from_id(0), TaskItemKind::Unknown);
        assert_eq!(TaskItemKind::from_id(42), TaskItemKind::Unknown);
        assert_eq!(TaskItemKind::Timed.id(), 2);
    }

    #[test]
    fn test_timing_duration() {
        let timed = Timing::Timed {
            start: NaiveTime::from_hms_opt(8, 15, 0).unwrap(),
            end: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
        };
        assert_eq!(timed.duration().unwrap(), Duration::minutes(45));
        assert_eq!(timed.kind(), TaskItemKind::Timed);
        assert!(timed.start_time().is_some() && timed.end_time().is_some());

        let entry = Timing::Entry { duration: Duration::hours(2) };
        assert_eq!(entry.duration().unwrap(), Duration::hours(2));
        assert!(entry.start_time().is_none() && entry.end_time().is_none());
    }

    #[test]
    fn test_entry_duration_must_be_positive() {
        for duration in [Duration::zero(), Duration::minutes(-30), Duration::milliseconds(400)] {
            assert!(matches!(
                Timing::Entry { duration }.duration(),
                Err(AppError::InvalidDuration(_))
            ));
        }

        let one_second = Timing::Entry { duration: Duration::seconds(1) };
        assert_eq!(one_second.duration().unwrap(), Duration::seconds(1));
    }
}
