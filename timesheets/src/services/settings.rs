//! Settings service
//!
//! Manages application settings persistence using JSON file storage.

use crate::config::{BACKUPS_DIR_NAME, DATABASE_FILE_NAME, SETTINGS_FILE_NAME};
use crate::error::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;

/// Startup and exit behaviour
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralSettings {
    #[serde(default = "default_true")]
    pub confirm_on_exit: bool,
    #[serde(default)]
    pub start_on_boot: bool,
}

fn default_true() -> bool {
    true
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            confirm_on_exit: true,
            start_on_boot: false,
        }
    }
}

/// System tray behaviour
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TraySettings {
    #[serde(default)]
    pub minimize_to_tray: bool,
    #[serde(default)]
    pub close_to_tray: bool,
    #[serde(default)]
    pub show_balloon_notifications: bool,
}

/// Database backup configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct BackupSettings {
    #[serde(default)]
    pub enabled: bool,
    /// Custom backup location (if None, uses data_dir/backups)
    #[serde(default)]
    pub path: Option<String>,
}

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppSettings {
    /// Database file override (if None, uses data_dir/timesheets.db)
    #[serde(default)]
    pub database_path: Option<String>,
    #[serde(default)]
    pub general: GeneralSettings,
    #[serde(default)]
    pub tray: TraySettings,
    #[serde(default)]
    pub backup: BackupSettings,
}

impl AppSettings {
    pub fn database_path(&self, data_dir: &Path) -> PathBuf {
        self.database_path
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(|| data_dir.join(DATABASE_FILE_NAME))
    }

    pub fn backup_dir(&self, data_dir: &Path) -> PathBuf {
        self.backup
            .path
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(|| data_dir.join(BACKUPS_DIR_NAME))
    }
}

/// Service for managing application settings
#[derive(Clone)]
pub struct SettingsService {
    settings_path: PathBuf,
}

impl SettingsService {
    pub fn new(app_data_dir: PathBuf) -> Self {
        Self {
            settings_path: app_data_dir.join(SETTINGS_FILE_NAME),
        }
    }

    /// Load settings from disk or create default if not exists
    pub async fn load(&self) -> Result<AppSettings> {
        if !self.settings_path.exists() {
            tracing::info!("Settings file not found, creating default settings");
            let default = AppSettings::default();
            self.save(&default).await?;
            return Ok(default);
        }

        let content = fs::read_to_string(&self.settings_path).await?;
        let settings: AppSettings = serde_json::from_str(&content)
            .map_err(|e| AppError::Generic(format!("Failed to parse settings: {}", e)))?;

        Ok(settings)
    }

    /// Save settings to disk
    pub async fn save(&self, settings: &AppSettings) -> Result<()> {
        let content = serde_json::to_string_pretty(settings)?;

        fs::write(&self.settings_path, content).await?;
        tracing::info!("Settings saved to {:?}", self.settings_path);

        Ok(())
    }

    /// Update tray settings
    pub async fn update_tray(&self, tray: TraySettings) -> Result<()> {
        let mut settings = self.load().await?;
        settings.tray = tray;
        self.save(&settings).await
    }

    /// Update backup settings
    pub async fn update_backup(&self, backup: BackupSettings) -> Result<()> {
        let mut settings = self.load().await?;
        settings.backup = backup;
        self.save(&settings).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_service() -> (SettingsService, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let service = SettingsService::new(temp_dir.path().to_path_buf());
        (service, temp_dir)
    }

    #[tokio::test]
    async fn test_default_settings_created_on_load() {
        let (service, temp) = create_test_service();

        let settings = service.load().await.unwrap();

        assert!(settings.general.confirm_on_exit);
        assert!(!settings.tray.minimize_to_tray);
        assert!(!settings.backup.enabled);
        assert!(temp.path().join(SETTINGS_FILE_NAME).exists());
    }

    #[tokio::test]
    async fn test_settings_persistence() {
        let temp_dir = TempDir::new().unwrap();
        let data_dir = temp_dir.path().to_path_buf();

        {
            let service = SettingsService::new(data_dir.clone());
            service
                .update_backup(BackupSettings {
                    enabled: true,
                    path: Some("/mnt/backups".to_string()),
                })
                .await
                .unwrap();
        }

        {
            let service = SettingsService::new(data_dir.clone());
            let loaded = service.load().await.unwrap();
            assert!(loaded.backup.enabled);
            assert_eq!(loaded.backup_dir(&data_dir), PathBuf::from("/mnt/backups"));
        }
    }

    #[tokio::test]
    async fn test_partial_file_uses_defaults() {
        let (service, temp) = create_test_service();
        std::fs::write(
            temp.path().join(SETTINGS_FILE_NAME),
            r#"{"tray": {"close_to_tray": true}}"#,
        )
        .unwrap();

        let settings = service.load().await.unwrap();

        assert!(settings.tray.close_to_tray);
        assert!(!settings.tray.minimize_to_tray);
        assert!(settings.general.confirm_on_exit);
        assert_eq!(
            settings.database_path(temp.path()),
            temp.path().join(DATABASE_FILE_NAME)
        );
    }

    #[tokio::test]
    async fn test_tray_update_preserves_backup() {
        let (service, _temp) = create_test_service();

        service
            .update_backup(BackupSettings {
                enabled: true,
                ..BackupSettings::default()
            })
            .await
            .unwrap();

        service
            .update_tray(TraySettings {
                minimize_to_tray: true,
                ..TraySettings::default()
            })
            .await
            .unwrap();

        let settings = service.load().await.unwrap();
        assert!(settings.backup.enabled);
        assert!(settings.tray.minimize_to_tray);
    }

    #[tokio::test]
    async fn test_unknown_backup_keys_are_ignored() {
        let (service, temp) = create_test_service();
        std::fs::write(
            temp.path().join(SETTINGS_FILE_NAME),
            r#"{"backup": {"enabled": true, "retention_days": 14}}"#,
        )
        .unwrap();

        let settings = service.load().await.unwrap();

        assert!(settings.backup.enabled);
        assert_eq!(
            settings.backup_dir(temp.path()),
            temp.path().join(BACKUPS_DIR_NAME)
        );
    }

    #[tokio::test]
    async fn test_malformed_settings_file() {
        let (service, temp) = create_test_service();
        std::fs::write(temp.path().join(SETTINGS_FILE_NAME), "not json").unwrap();

        assert!(service.load().await.is_err());
    }
}
