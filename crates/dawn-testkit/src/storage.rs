//! Mock storage effect handlers for testing
//!
//! Shared in-memory map behind `Arc<RwLock<>>` with switchable failures.

use async_lock::RwLock;
use async_trait::async_trait;
use dawn_core::effects::StorageEffects;
use dawn_core::DawnError;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

/// Memory storage handler for testing
#[derive(Debug, Clone, Default)]
pub struct MemoryStorageHandler {
    data: Arc<RwLock<HashMap<String, String>>>,
    fail_reads: Arc<AtomicBool>,
    fail_writes: Arc<AtomicBool>,
    writes: Arc<AtomicUsize>,
    removes: Arc<AtomicUsize>,
}

impl MemoryStorageHandler {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with one pre-seeded value
    pub fn with_value(key: &str, value: &str) -> Self {
        let mut data = HashMap::new();
        data.insert(key.to_string(), value.to_string());
        Self {
            data: Arc::new(RwLock::new(data)),
            ..Self::default()
        }
    }

    /// Make every `get` fail with a storage error
    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Make every `set` and `remove` fail with a storage error
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Raw value under `key`, bypassing failure injection
    pub async fn raw(&self, key: &str) -> Option<String> {
        self.data.read().await.get(key).cloned()
    }

    /// Number of successful `set` calls
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Number of `remove` calls that reached the map
    pub fn remove_count(&self) -> usize {
        self.removes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl StorageEffects for MemoryStorageHandler {
    async fn get(&self, key: &str) -> Result<Option<String>, DawnError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(DawnError::storage(format!("injected read failure for {key}")));
        }
        Ok(self.data.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> Result<(), DawnError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(DawnError::storage(format!("injected write failure for {key}")));
        }
        self.data.write().await.insert(key.to_string(), value);
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), DawnError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(DawnError::storage(format!("injected remove failure for {key}")));
        }
        self.data.write().await.remove(key);
        self.removes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
