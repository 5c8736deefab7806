//! Persistence of uploaded room pictures.
//!
//! Files land under `<images_path>/rooms/` with uuid names; the stored
//! URL is the path relative to the images mount.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tokio::fs;
use tracing::{info, warn};

use crate::config::Config;

/// Upload failures with a distinct user-facing message per limit.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Too many files: at most {max} per upload")]
    TooManyFiles { max: usize },

    #[error("File '{name}' exceeds the maximum size of {max_mb} MB")]
    FileTooLarge { name: String, max_mb: u64 },

    #[error("Storage error: {0}")]
    Io(String),
}

pub struct ImageService {
    config: Config,
}

impl ImageService {
    #[must_use]
    pub const fn new(config: Config) -> Self {
        Self { config }
    }

    /// Enforces the per-request file count limit before any file is
    /// written.
    pub fn check_batch_size(&self, count: usize) -> Result<(), StorageError> {
        let max = self.config.uploads.max_files_per_upload;
        if count > max {
            return Err(StorageError::TooManyFiles { max });
        }
        Ok(())
    }

    /// Writes one uploaded file and returns its relative URL.
    pub async fn save_room_image(
        &self,
        original_name: &str,
        bytes: &[u8],
    ) -> Result<String, StorageError> {
        let max_mb = self.config.uploads.max_file_size_mb;
        if bytes.len() as u64 > max_mb * 1024 * 1024 {
            return Err(StorageError::FileTooLarge {
                name: original_name.to_string(),
                max_mb,
            });
        }

        let extension = Path::new(original_name)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("jpg");

        let filename = format!("{}.{}", uuid::Uuid::new_v4(), extension);

        let rooms_dir = self.rooms_dir();
        if !rooms_dir.exists() {
            fs::create_dir_all(&rooms_dir)
                .await
                .map_err(|e| StorageError::Io(e.to_string()))?;
        }

        let file_path = rooms_dir.join(&filename);

        fs::write(&file_path, bytes)
            .await
            .map_err(|e| StorageError::Io(format!("Failed to write {}: {e}", file_path.display())))?;

        info!(path = %file_path.display(), "Stored room image");

        Ok(format!("rooms/{filename}"))
    }

    /// Best-effort removal of a stored image; a missing file only warns.
    pub async fn delete_image(&self, url: &str) {
        let file_path = PathBuf::from(&self.config.uploads.images_path).join(url);

        if let Err(e) = fs::remove_file(&file_path).await {
            warn!(path = %file_path.display(), "Failed to remove image file: {e}");
        }
    }

    fn rooms_dir(&self) -> PathBuf {
        PathBuf::from(&self.config.uploads.images_path).join("rooms")
    }
}
