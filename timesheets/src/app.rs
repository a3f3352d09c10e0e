//! Application state and initialization
//!
//! This module manages the central application state and lifecycle.
//! All services are initialized here and made available through AppState.

use crate::database::{create_pool, Repository};
use crate::error::Result;
use crate::services::{AppSettings, SettingsService, TaskItemsService, WeeklyService};
use std::path::PathBuf;

/// Central application state holding all services
#[derive(Clone)]
pub struct AppState {
    pub app_data_dir: PathBuf,
    pub settings: AppSettings,
    pub settings_service: SettingsService,
    pub repo: Repository,
    pub task_items_service: TaskItemsService,
    pub weekly_service: WeeklyService,
}

/// Application setup - called once on startup
pub async fn setup(app_data_dir: PathBuf) -> Result<AppState> {
    tracing::info!("Initializing application");
    tracing::info!("App data directory: {:?}", app_data_dir);

    std::fs::create_dir_all(&app_data_dir)?;

    let settings_service = SettingsService::new(app_data_dir.clone());
    let settings = settings_service.load().await?;

    if settings.backup.enabled {
        std::fs::create_dir_all(settings.backup_dir(&app_data_dir))?;
    }

    let pool = create_pool(&settings.database_path(&app_data_dir)).await?;
    let repo = Repository::new(pool);

    let state = AppState {
        task_items_service: TaskItemsService::new(repo.clone()),
        weekly_service: WeeklyService::new(repo.clone()),
        repo,
        settings,
        settings_service,
        app_data_dir,
    };

    tracing::info!("Application initialized successfully");

    Ok(state)
}
