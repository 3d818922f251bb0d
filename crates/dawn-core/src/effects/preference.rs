//! Daemon-backed user preferences

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::DawnError;

/// A typed config value as exchanged with the daemon.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigValue {
    /// Boolean payload
    #[serde(default)]
    pub b: Option<bool>,
    /// Explicit null marker
    #[serde(rename = "isNull", default)]
    pub is_null: bool,
}

impl ConfigValue {
    /// A boolean value.
    pub fn bool(value: bool) -> Self {
        Self {
            b: Some(value),
            is_null: false,
        }
    }

    /// Boolean payload, `false` when absent or null.
    pub fn as_bool(&self) -> bool {
        !self.is_null && self.b.unwrap_or(false)
    }
}

/// Config RPC exposed by the backend daemon.
#[async_trait]
pub trait PreferenceEffects: Send + Sync {
    /// Read the value at a dotted config path such as `ui.touchIDEnabled`.
    async fn get_value(&self, path: &str) -> Result<ConfigValue, DawnError>;

    /// Write the value at a dotted config path.
    async fn set_value(&self, path: &str, value: ConfigValue) -> Result<(), DawnError>;
}
