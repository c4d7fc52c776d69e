//! Local filesystem photo store

use async_trait::async_trait;
use chrono::Utc;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

use super::PhotoStore;
use crate::core::error::AppError;

/// Attempts at finding a free name before giving up
const MAX_NAME_ATTEMPTS: u32 = 100;

/// Photo store backed by a directory on disk
pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    /// Create the store, creating `base_path` if it doesn't exist
    pub async fn new(base_path: impl Into<PathBuf>) -> Result<Self, AppError> {
        let base_path = base_path.into();
        fs::create_dir_all(&base_path).await.map_err(|e| {
            AppError::Internal(format!(
                "Failed to create upload directory {}: {}",
                base_path.display(),
                e
            ))
        })?;
        tracing::info!("LocalStorage initialized at {}", base_path.display());
        Ok(Self { base_path })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// `<YYYYmmdd_HHMMSS>_<filename>`, with a counter after the timestamp on retries
    fn candidate_name(timestamp: &str, filename: &str, attempt: u32) -> String {
        if attempt == 0 {
            format!("{}_{}", timestamp, filename)
        } else {
            format!("{}_{}_{}", timestamp, attempt, filename)
        }
    }
}

#[async_trait]
impl PhotoStore for LocalStorage {
    async fn save(&self, filename: &str, data: &[u8]) -> Result<String, AppError> {
        let timestamp = Utc::now().format("%Y%m%d_%H%M%S").to_string();

        for attempt in 0..MAX_NAME_ATTEMPTS {
            let name = Self::candidate_name(&timestamp, filename, attempt);
            let path = self.base_path.join(&name);

            // create_new never overwrites a photo uploaded in the same second
            let mut file = match fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await
            {
                Ok(file) => file,
                Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
                Err(e) => {
                    tracing::error!("Failed to create {}: {:?}", path.display(), e);
                    return Err(AppError::Internal(format!("Failed to store photo: {}", e)));
                }
            };

            file.write_all(data).await.map_err(|e| {
                tracing::error!("Failed to write {}: {:?}", path.display(), e);
                AppError::Internal(format!("Failed to store photo: {}", e))
            })?;
            file.flush()
                .await
                .map_err(|e| AppError::Internal(format!("Failed to store photo: {}", e)))?;

            tracing::info!("Stored photo {} ({} bytes)", name, data.len());
            return Ok(name);
        }

        Err(AppError::Internal(format!(
            "No free file name for photo {}",
            filename
        )))
    }

    async fn remove(&self, stored_name: &str) -> Result<(), AppError> {
        let path = self.base_path.join(stored_name);
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::Internal(format!(
                "Failed to remove photo {}: {}",
                stored_name, e
            ))),
        }
    }
}
