//! Scripted launch sources

use async_trait::async_trait;
use dawn_core::effects::LaunchEffects;
use dawn_core::{DawnError, PushLaunch};
use std::time::Duration;

/// Launch handler with scripted answers and optional latency.
#[derive(Debug, Clone)]
pub struct MockLaunchHandler {
    link: Result<Option<String>, DawnError>,
    push: Result<Option<PushLaunch>, DawnError>,
    latency: Option<Duration>,
}

impl Default for MockLaunchHandler {
    fn default() -> Self {
        Self {
            link: Ok(None),
            push: Ok(None),
            latency: None,
        }
    }
}

impl MockLaunchHandler {
    /// Nothing launched the app
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_link(mut self, link: &str) -> Self {
        self.link = Ok(Some(link.to_string()));
        self
    }

    pub fn with_push(mut self, push: PushLaunch) -> Self {
        self.push = Ok(Some(push));
        self
    }

    pub fn with_link_error(mut self, error: DawnError) -> Self {
        self.link = Err(error);
        self
    }

    pub fn with_push_error(mut self, error: DawnError) -> Self {
        self.push = Err(error);
        self
    }

    /// Delay every answer by `latency`
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    async fn delay(&self) {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
    }
}

#[async_trait]
impl LaunchEffects for MockLaunchHandler {
    async fn initial_link(&self) -> Result<Option<String>, DawnError> {
        self.delay().await;
        self.link.clone()
    }

    async fn initial_push(&self) -> Result<Option<PushLaunch>, DawnError> {
        self.delay().await;
        self.push.clone()
    }
}
