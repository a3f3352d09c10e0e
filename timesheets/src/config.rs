//! Application configuration constants
//!
//! Central location for file names, validation boundaries, and the
//! display column layout of the weekly view.

// ===== Files =====

/// Database file created inside the data directory
pub const DATABASE_FILE_NAME: &str = "timesheets.db";

/// JSON settings file created inside the data directory
pub const SETTINGS_FILE_NAME: &str = "settings.json";

/// Subdirectory used for database backups
pub const BACKUPS_DIR_NAME: &str = "backups";

// ===== Validation Limits =====

/// Minimum length for employer, client, project and category names
pub const MIN_NAME_LENGTH: usize = 2;

/// Maximum length for employer, client, project and category names
pub const MAX_NAME_LENGTH: usize = 255;

/// Maximum length for a task item description
pub const MAX_DESCRIPTION_LENGTH: usize = 4000;

// ===== Time Formats =====

/// ISO-8601 calendar date format used for task dates
pub const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

/// Seconds in an hour, used when converting durations to billable hours
pub const SECONDS_PER_HOUR: f64 = 3600.0;
