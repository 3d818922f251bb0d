//! Key-value persistence effects

use async_trait::async_trait;

use crate::DawnError;

/// String key-value store backing small pieces of UI state.
///
/// Missing keys are not errors: `get` returns `Ok(None)` and `remove` of an
/// absent key succeeds.
#[async_trait]
pub trait StorageEffects: Send + Sync {
    /// Read the value stored under `key`.
    async fn get(&self, key: &str) -> Result<Option<String>, DawnError>;

    /// Store `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: String) -> Result<(), DawnError>;

    /// Delete `key`.
    async fn remove(&self, key: &str) -> Result<(), DawnError>;
}
