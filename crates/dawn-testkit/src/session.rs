//! Mock session RPC

use async_trait::async_trait;
use dawn_core::effects::SessionEffects;
use dawn_core::DawnError;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

/// Session handler counting logouts.
#[derive(Debug, Clone, Default)]
pub struct MockSessionHandler {
    logouts: Arc<AtomicUsize>,
    fail: Arc<AtomicBool>,
}

impl MockSessionHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make logout RPCs fail
    pub fn fail_logout(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub fn logout_count(&self) -> usize {
        self.logouts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SessionEffects for MockSessionHandler {
    async fn logout(&self) -> Result<(), DawnError> {
        self.logouts.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            return Err(DawnError::network("injected logout failure"));
        }
        Ok(())
    }
}
