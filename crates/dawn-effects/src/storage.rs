//! Layer 3: Storage Effect Handlers - Production Only
//!
//! Filesystem implementation of `StorageEffects`. Each key maps to one file
//! under the base directory.

use async_trait::async_trait;
use dawn_core::effects::StorageEffects;
use dawn_core::DawnError;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use tokio::fs;

/// Filesystem-based storage handler for production use
///
/// This handler stores each value as a `<key>.dat` file. It is stateless and
/// delegates all storage operations to the filesystem.
#[derive(Debug, Clone)]
pub struct FilesystemStorageHandler {
    /// Base directory for storage files
    base_path: PathBuf,
}

impl FilesystemStorageHandler {
    /// Create a new filesystem storage handler
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    /// Base directory of this handler.
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn file_path(&self, key: &str) -> Result<PathBuf, DawnError> {
        if key.is_empty() {
            return Err(DawnError::invalid("Key cannot be empty"));
        }
        let relative = Path::new(key);
        if relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_)))
        {
            return Err(DawnError::invalid(format!(
                "Key must be a relative path without parent segments: {key}"
            )));
        }
        Ok(self.base_path.join(format!("{key}.dat")))
    }
}

#[async_trait]
impl StorageEffects for FilesystemStorageHandler {
    async fn get(&self, key: &str) -> Result<Option<String>, DawnError> {
        let file_path = self.file_path(key)?;
        match fs::read_to_string(&file_path).await {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(DawnError::storage(format!("Failed to read {key}: {e}"))),
        }
    }

    async fn set(&self, key: &str, value: String) -> Result<(), DawnError> {
        let file_path = self.file_path(key)?;
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).await.map_err(|e| {
                DawnError::storage(format!("Failed to create directory: {e}"))
            })?;
        }

        // Readers never observe a partially written value.
        let tmp_path = file_path.with_extension("dat.tmp");
        fs::write(&tmp_path, value)
            .await
            .map_err(|e| DawnError::storage(format!("Failed to write {key}: {e}")))?;
        fs::rename(&tmp_path, &file_path)
            .await
            .map_err(|e| DawnError::storage(format!("Failed to commit {key}: {e}")))?;

        tracing::trace!(key, path = %file_path.display(), "stored value");
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), DawnError> {
        let file_path = self.file_path(key)?;
        match fs::remove_file(&file_path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(DawnError::storage(format!("Failed to remove {key}: {e}"))),
        }
    }
}
