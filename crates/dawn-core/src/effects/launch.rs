//! Launch source producers (deep links and push notifications)

use async_trait::async_trait;

use crate::{DawnError, PushLaunch};

/// Producers for whatever launched the app.
///
/// Both sources may legitimately report nothing; `Ok(None)` is the common
/// case for a plain cold start.
#[async_trait]
pub trait LaunchEffects: Send + Sync {
    /// URI the app was opened with, if any.
    async fn initial_link(&self) -> Result<Option<String>, DawnError>;

    /// Push notification the app was opened from, if any.
    async fn initial_push(&self) -> Result<Option<PushLaunch>, DawnError>;
}
