//! Weekly view service
//!
//! Fetches the task items of one week in a single pass and builds the
//! populated weekly tree model from them.

use crate::database::{Repository, TaskItem};
use crate::dataview::{DateTraverser, Populated, WeeklyTreeModel, WEEK_DAYS};
use crate::duration;
use crate::error::Result;
use chrono::{Duration, NaiveDate, Weekday};

/// Service for the weekly task view
#[derive(Clone)]
pub struct WeeklyService {
    repo: Repository,
}

impl WeeklyService {
    pub fn new(repo: Repository) -> Self {
        Self { repo }
    }

    /// Task items of the seven days of `traverser`'s week, in one query
    pub async fn week_records(&self, traverser: &DateTraverser) -> Result<Vec<TaskItem>> {
        self.repo
            .records_for_range(traverser.day_date(Weekday::Mon), traverser.day_date(Weekday::Sun))
            .await
    }

    /// Build the populated tree for the week containing `date`
    pub async fn build_week(&self, date: NaiveDate) -> Result<WeeklyTreeModel<Populated>> {
        let traverser = DateTraverser::new(date);
        tracing::info!("Building weekly view for week of {}", traverser.day_date(Weekday::Mon));

        let records = self.week_records(&traverser).await?;
        tracing::debug!("Weekly view has {} task items", records.len());

        Ok(WeeklyTreeModel::new(&traverser).populate(records))
    }

    /// Total booked time for each day of the week containing `date`
    pub async fn day_totals(&self, date: NaiveDate) -> Result<Vec<(Weekday, Duration)>> {
        let traverser = DateTraverser::new(date);

        let mut totals = Vec::with_capacity(WEEK_DAYS.len());
        for day in WEEK_DAYS {
            let durations = self.repo.durations_for_date(traverser.day_date(day)).await?;
            totals.push((day, duration::total(&durations)?));
        }
        Ok(totals)
    }
}
