//! Session effects

use async_trait::async_trait;

use crate::DawnError;

/// Session operations carried out by the backend daemon.
#[async_trait]
pub trait SessionEffects: Send + Sync {
    /// End the current session.
    async fn logout(&self) -> Result<(), DawnError>;
}
