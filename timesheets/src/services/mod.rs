//! Services module
//!
//! Business logic services that coordinate between callers and the repository.

pub mod settings;
pub mod task_items;
pub mod weekly;

pub use settings::{AppSettings, SettingsService};
pub use task_items::TaskItemsService;
pub use weekly::WeeklyService;
