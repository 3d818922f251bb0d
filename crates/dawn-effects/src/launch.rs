//! Launch source handler for hosts that extract launch details themselves.

use async_trait::async_trait;
use dawn_core::effects::LaunchEffects;
use dawn_core::{DawnError, PushLaunch};

/// Launch sources handed over by the host at process start.
///
/// Desktop and CLI hosts know their launch arguments up front; this handler
/// simply replays them.
#[derive(Debug, Clone, Default)]
pub struct ColdLaunchHandler {
    link: Option<String>,
    push: Option<PushLaunch>,
}

impl ColdLaunchHandler {
    /// A plain cold start with no link and no push.
    pub fn new() -> Self {
        Self::default()
    }

    /// Report `link` as the initial URI.
    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }

    /// Report `push` as the launching notification.
    pub fn with_push(mut self, push: PushLaunch) -> Self {
        self.push = Some(push);
        self
    }
}

#[async_trait]
impl LaunchEffects for ColdLaunchHandler {
    async fn initial_link(&self) -> Result<Option<String>, DawnError> {
        Ok(self.link.clone())
    }

    async fn initial_push(&self) -> Result<Option<PushLaunch>, DawnError> {
        Ok(self.push.clone())
    }
}
