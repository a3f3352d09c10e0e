//! Week anchoring
//!
//! Resolves the calendar dates of a Monday-to-Sunday week from any date
//! inside it.

use crate::config::ISO_DATE_FORMAT;
use chrono::{Datelike, Duration, NaiveDate, Weekday};

/// Days of the week in display order
pub const WEEK_DAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Full English name of a weekday
pub fn day_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Answers "what is the ISO date of day N of this week"
pub trait WeekAnchor {
    fn day_iso_date(&self, day: Weekday) -> String;
}

/// Week anchor computed from a reference date
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateTraverser {
    monday: NaiveDate,
}

impl DateTraverser {
    pub fn new(date: NaiveDate) -> Self {
        let offset = date.weekday().num_days_from_monday() as i64;
        Self {
            monday: date - Duration::days(offset),
        }
    }

    pub fn day_date(&self, day: Weekday) -> NaiveDate {
        self.monday + Duration::days(day.num_days_from_monday() as i64)
    }

    /// The seven dates of the week, Monday first
    pub fn week_dates(&self) -> [NaiveDate; 7] {
        WEEK_DAYS.map(|day| self.day_date(day))
    }

    pub fn previous_week(&self) -> Self {
        Self {
            monday: self.monday - Duration::days(7),
        }
    }

    pub fn next_week(&self) -> Self {
        Self {
            monday: self.monday + Duration::days(7),
        }
    }
}

impl WeekAnchor for DateTraverser {
    fn day_iso_date(&self, day: Weekday) -> String {
        self.day_date(day).format(ISO_DATE_FORMAT).to_string()
    }
}
