//! Data view module
//!
//! Display-side models built from task items.

pub mod date_traverser;
pub mod weekly_model;

pub use date_traverser::{day_name, DateTraverser, WeekAnchor, WEEK_DAYS};
pub use weekly_model::{
    Column, ColumnType, ColumnValue, DayEntry, LeafData, NodeId, Populated, Unpopulated,
    WeeklyTreeModel,
};
