//! In-memory preference RPC

use async_trait::async_trait;
use dawn_core::effects::{ConfigValue, PreferenceEffects};
use dawn_core::DawnError;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Preference handler with an in-memory map and switchable read failures.
#[derive(Debug, Clone, Default)]
pub struct MockPreferenceHandler {
    values: Arc<Mutex<HashMap<String, ConfigValue>>>,
    writes: Arc<Mutex<Vec<(String, ConfigValue)>>>,
    fail_reads: Arc<AtomicBool>,
}

impl MockPreferenceHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a boolean value
    pub fn with_bool(self, path: &str, value: bool) -> Self {
        self.values
            .lock()
            .insert(path.to_string(), ConfigValue::bool(value));
        self
    }

    /// Make every read fail with a network error
    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Every write so far
    pub fn writes(&self) -> Vec<(String, ConfigValue)> {
        self.writes.lock().clone()
    }
}

#[async_trait]
impl PreferenceEffects for MockPreferenceHandler {
    async fn get_value(&self, path: &str) -> Result<ConfigValue, DawnError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(DawnError::network(format!("injected failure reading {path}")));
        }
        Ok(self.values.lock().get(path).cloned().unwrap_or(ConfigValue {
            b: None,
            is_null: true,
        }))
    }

    async fn set_value(&self, path: &str, value: ConfigValue) -> Result<(), DawnError> {
        self.values.lock().insert(path.to_string(), value.clone());
        self.writes.lock().push((path.to_string(), value));
        Ok(())
    }
}
