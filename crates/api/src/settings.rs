//! File-persisted operator settings.
//!
//! Holds the automation engine webhook URL. The value is written as JSON to
//! the configured path on every update and reloaded at start-up.

use std::path::{Path, PathBuf};

use pige_core::settings::{normalize_webhook_url, EngineSettings};
use tokio::sync::RwLock;

use crate::error::{AppError, AppResult};

pub struct SettingsStore {
    path: Option<PathBuf>,
    current: RwLock<EngineSettings>,
}

impl SettingsStore {
    /// Settings that live only in memory.
    pub fn in_memory() -> Self {
        Self {
            path: None,
            current: RwLock::new(EngineSettings::default()),
        }
    }

    /// Load settings from `path`. A missing file yields defaults.
    pub async fn load(path: &Path) -> AppResult<Self> {
        let current = match tokio::fs::read(path).await {
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|e| {
                AppError::InternalError(format!("Invalid settings file {}: {e}", path.display()))
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => EngineSettings::default(),
            Err(e) => {
                return Err(AppError::InternalError(format!(
                    "Failed to read settings file {}: {e}",
                    path.display()
                )))
            }
        };

        Ok(Self {
            path: Some(path.to_path_buf()),
            current: RwLock::new(current),
        })
    }

    pub async fn get(&self) -> EngineSettings {
        self.current.read().await.clone()
    }

    /// Validate and store a new webhook URL. Blank input clears it.
    pub async fn set_webhook_url(&self, input: Option<&str>) -> AppResult<EngineSettings> {
        let webhook_url = normalize_webhook_url(input)?;
        let updated = EngineSettings { webhook_url };

        let mut current = self.current.write().await;
        if let Some(path) = &self.path {
            let bytes = serde_json::to_vec_pretty(&updated)
                .map_err(|e| AppError::InternalError(format!("Failed to encode settings: {e}")))?;
            tokio::fs::write(path, bytes).await.map_err(|e| {
                AppError::InternalError(format!(
                    "Failed to write settings file {}: {e}",
                    path.display()
                ))
            })?;
        }
        *current = updated.clone();

        Ok(updated)
    }
}
