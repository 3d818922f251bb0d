//! Session handler for hosts without a backend daemon.

use async_trait::async_trait;
use dawn_core::effects::SessionEffects;
use dawn_core::DawnError;

/// Logout that only needs local bookkeeping.
#[derive(Debug, Default, Clone)]
pub struct LocalSessionHandler;

impl LocalSessionHandler {
    /// Create a new local session handler
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl SessionEffects for LocalSessionHandler {
    async fn logout(&self) -> Result<(), DawnError> {
        tracing::debug!("local session ended");
        Ok(())
    }
}
