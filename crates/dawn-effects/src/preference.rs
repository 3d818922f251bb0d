//! Preferences kept in local storage for hosts without a backend daemon.

use std::sync::Arc;

use async_trait::async_trait;
use dawn_core::effects::{ConfigValue, PreferenceEffects, StorageEffects};
use dawn_core::DawnError;

/// Key prefix under which preferences are stored.
const PREFERENCE_PREFIX: &str = "config";

/// `PreferenceEffects` backed by any `StorageEffects`.
///
/// Values are stored as JSON under `config/<path>`. A missing value reads
/// back as an explicit null.
#[derive(Clone)]
pub struct LocalPreferenceHandler {
    storage: Arc<dyn StorageEffects>,
}

impl LocalPreferenceHandler {
    /// Create a handler writing through `storage`.
    pub fn new(storage: Arc<dyn StorageEffects>) -> Self {
        Self { storage }
    }

    fn key(path: &str) -> String {
        format!("{PREFERENCE_PREFIX}/{path}")
    }
}

#[async_trait]
impl PreferenceEffects for LocalPreferenceHandler {
    async fn get_value(&self, path: &str) -> Result<ConfigValue, DawnError> {
        match self.storage.get(&Self::key(path)).await? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(ConfigValue {
                b: None,
                is_null: true,
            }),
        }
    }

    async fn set_value(&self, path: &str, value: ConfigValue) -> Result<(), DawnError> {
        let raw = serde_json::to_string(&value)?;
        self.storage.set(&Self::key(path), raw).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FilesystemStorageHandler;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_missing_preference_is_null() {
        let dir = TempDir::new().unwrap();
        let prefs = LocalPreferenceHandler::new(Arc::new(FilesystemStorageHandler::new(dir.path())));
        let value = prefs.get_value("ui.touchIDEnabled").await.unwrap();
        assert!(value.is_null);
        assert!(!value.as_bool());
    }

    #[tokio::test]
    async fn test_preference_roundtrip() {
        let dir = TempDir::new().unwrap();
        let prefs = LocalPreferenceHandler::new(Arc::new(FilesystemStorageHandler::new(dir.path())));
        prefs
            .set_value("ui.touchIDEnabled", ConfigValue::bool(true))
            .await
            .unwrap();
        assert!(prefs.get_value("ui.touchIDEnabled").await.unwrap().as_bool());
    }
}
