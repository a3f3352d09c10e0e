//! Timesheets library
//!
//! Task item storage and the weekly aggregation model, exposed for the
//! binary, for tests, and for any display front end.

pub mod app;
pub mod config;
pub mod database;
pub mod dataview;
pub mod duration;
pub mod error;
pub mod services;
