//! Startup resolution.
//!
//! Three independent sources are fetched concurrently: the persisted route,
//! the launching deep link and the launching push notification. Each fetch is
//! wrapped so that no failure aborts the join, then the first present source
//! in priority order (push, deep link, route) becomes the decision.

use std::sync::Arc;

use dawn_core::effects::{LaunchEffects, StorageEffects};
use dawn_core::{DawnError, PushLaunch, RouteSnapshot, StartupDecision, StartupSource};
use tokio::task::JoinError;

use crate::signal::OneShot;

/// Result of fetching one startup source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceOutcome<T> {
    /// The source produced a value
    Present(T),
    /// The source had nothing to offer
    Absent,
    /// The fetch failed
    Failed(DawnError),
}

impl<T> SourceOutcome<T> {
    fn from_fetch(result: Result<Option<T>, DawnError>) -> Self {
        match result {
            Ok(Some(value)) => Self::Present(value),
            Ok(None) => Self::Absent,
            Err(e) => Self::Failed(e),
        }
    }

    fn from_join(result: Result<Self, JoinError>) -> Self {
        result.unwrap_or_else(|e| {
            Self::Failed(DawnError::internal(format!("fetch task failed: {e}")))
        })
    }

    /// The value, logging failures under `source`.
    pub fn present(self, source: &'static str) -> Option<T> {
        match self {
            Self::Present(value) => Some(value),
            Self::Absent => None,
            Self::Failed(error) => {
                tracing::warn!(source, %error, "startup source failed; treating as absent");
                None
            }
        }
    }
}

/// Resolves the [`StartupDecision`] once per process.
#[derive(Clone)]
pub struct StartupResolver {
    storage: Arc<dyn StorageEffects>,
    launch: Arc<dyn LaunchEffects>,
    route_state_key: String,
}

impl StartupResolver {
    /// Create a resolver reading the persisted route from `route_state_key`.
    pub fn new(
        storage: Arc<dyn StorageEffects>,
        launch: Arc<dyn LaunchEffects>,
        route_state_key: impl Into<String>,
    ) -> Self {
        Self {
            storage,
            launch,
            route_state_key: route_state_key.into(),
        }
    }

    /// Fetch every source concurrently and merge them by priority.
    ///
    /// Never fails: failed or malformed sources count as absent.
    pub async fn resolve(&self) -> StartupDecision {
        let route = {
            let storage = self.storage.clone();
            let key = self.route_state_key.clone();
            tokio::spawn(async move { read_route(storage.as_ref(), &key).await })
        };
        let link = {
            let launch = self.launch.clone();
            tokio::spawn(async move { read_link(launch.as_ref()).await })
        };
        let push = {
            let launch = self.launch.clone();
            tokio::spawn(async move { read_push(launch.as_ref()).await })
        };

        let (route, link, push) = tokio::join!(route, link, push);
        let route = SourceOutcome::from_join(route).present("route");
        let link = SourceOutcome::from_join(link).present("deep link");
        let push = SourceOutcome::from_join(push).present("push");

        let decision = StartupDecision::first_match([
            push.map(StartupSource::Push),
            link.map(StartupSource::DeepLink),
            route.map(StartupSource::PersistedRoute),
        ]);
        tracing::info!(?decision, "startup decision resolved");
        decision
    }

    /// Resolve and publish to `signal`.
    ///
    /// Publishing twice is rejected with [`DawnError::AlreadyPublished`] and
    /// leaves the first decision in place.
    pub async fn resolve_and_publish(
        &self,
        signal: &OneShot<StartupDecision>,
    ) -> Result<StartupDecision, DawnError> {
        let decision = self.resolve().await;
        signal.publish(decision.clone())?;
        Ok(decision)
    }
}

async fn read_route(storage: &dyn StorageEffects, key: &str) -> SourceOutcome<RouteSnapshot> {
    let raw = match storage.get(key).await {
        Ok(Some(raw)) => raw,
        Ok(None) => return SourceOutcome::Absent,
        Err(e) => return SourceOutcome::Failed(e),
    };
    match RouteSnapshot::decode(&raw) {
        Ok(snapshot) => SourceOutcome::from_fetch(Ok(snapshot)),
        Err(error) => {
            tracing::warn!(key, %error, "discarding malformed route snapshot");
            SourceOutcome::Absent
        }
    }
}

async fn read_link(launch: &dyn LaunchEffects) -> SourceOutcome<String> {
    SourceOutcome::from_fetch(
        launch
            .initial_link()
            .await
            .map(|link| link.filter(|link| !link.is_empty())),
    )
}

async fn read_push(launch: &dyn LaunchEffects) -> SourceOutcome<PushLaunch> {
    SourceOutcome::from_fetch(launch.initial_push().await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use dawn_core::{ConversationId, Tab};
    use dawn_testkit::{MemoryStorageHandler, MockLaunchHandler};
    use std::time::Duration;

    const KEY: &str = "routeState";

    fn resolver(storage: MemoryStorageHandler, launch: MockLaunchHandler) -> StartupResolver {
        StartupResolver::new(Arc::new(storage), Arc::new(launch), KEY)
    }

    fn push() -> PushLaunch {
        PushLaunch {
            conversation: Some(ConversationId::new("pushed")),
            follow_user: None,
        }
    }

    #[tokio::test]
    async fn test_nothing_present() {
        let decision = resolver(MemoryStorageHandler::new(), MockLaunchHandler::new())
            .resolve()
            .await;
        assert!(decision.is_empty());
    }

    #[tokio::test]
    async fn test_route_only() {
        let storage = MemoryStorageHandler::with_value(
            KEY,
            r#"{"selectedConversationIDKey":"c1","tab":"chat"}"#,
        );
        let decision = resolver(storage, MockLaunchHandler::new()).resolve().await;
        assert_eq!(decision.tab, Some(Tab::Chat));
        assert_eq!(decision.conversation, Some(ConversationId::new("c1")));
        assert!(!decision.from_push);
    }

    #[tokio::test]
    async fn test_push_beats_link_and_route() {
        let storage = MemoryStorageHandler::with_value(KEY, r#"{"tab":"teams"}"#);
        let launch = MockLaunchHandler::new()
            .with_link("app://x")
            .with_push(push());
        let decision = resolver(storage, launch).resolve().await;
        assert!(decision.from_push);
        assert_eq!(decision.conversation, Some(ConversationId::new("pushed")));
        assert_eq!(decision.deep_link, None);
        assert_eq!(decision.tab, None);
    }

    #[tokio::test]
    async fn test_link_beats_route() {
        let storage = MemoryStorageHandler::with_value(KEY, r#"{"tab":"teams"}"#);
        let launch = MockLaunchHandler::new().with_link("app://x");
        let decision = resolver(storage, launch).resolve().await;
        assert_eq!(decision.deep_link.as_deref(), Some("app://x"));
        assert_eq!(decision.tab, None);
    }

    #[tokio::test]
    async fn test_empty_link_is_absent() {
        let storage = MemoryStorageHandler::with_value(KEY, r#"{"tab":"files"}"#);
        let launch = MockLaunchHandler::new().with_link("");
        let decision = resolver(storage, launch).resolve().await;
        assert_eq!(decision.deep_link, None);
        assert_eq!(decision.tab, Some(Tab::Files));
    }

    #[tokio::test]
    async fn test_malformed_route_is_absent() {
        for raw in ["{not json", "null", r#"{"tab":"login"}"#, r#"{"tab":"nowhere"}"#] {
            let storage = MemoryStorageHandler::with_value(KEY, raw);
            let decision = resolver(storage, MockLaunchHandler::new()).resolve().await;
            assert!(decision.is_empty(), "payload {raw} should be absent");
        }
    }

    #[tokio::test]
    async fn test_failed_sources_do_not_abort_the_join() {
        let storage = MemoryStorageHandler::with_value(KEY, r#"{"tab":"git"}"#);
        let launch = MockLaunchHandler::new()
            .with_link_error(DawnError::network("link lookup failed"))
            .with_push_error(DawnError::network("push lookup failed"));
        let decision = resolver(storage, launch).resolve().await;
        assert_eq!(decision.tab, Some(Tab::Git));

        let storage = MemoryStorageHandler::new();
        storage.fail_reads(true);
        let launch = MockLaunchHandler::new().with_link("app://y");
        let decision = resolver(storage, launch).resolve().await;
        assert_eq!(decision.deep_link.as_deref(), Some("app://y"));
    }

    #[tokio::test]
    async fn test_slow_sources_are_still_joined() {
        let launch = MockLaunchHandler::new()
            .with_push(push())
            .with_latency(Duration::from_millis(20));
        let decision = resolver(MemoryStorageHandler::new(), launch).resolve().await;
        assert!(decision.from_push);
    }

    #[tokio::test]
    async fn test_publish_once() {
        let signal = OneShot::new("startup decision");
        let launch = MockLaunchHandler::new().with_link("app://z");
        let resolver = resolver(MemoryStorageHandler::new(), launch);

        let first = resolver.resolve_and_publish(&signal).await.unwrap();
        assert_eq!(signal.get(), Some(first));
        assert_matches!(
            resolver.resolve_and_publish(&signal).await,
            Err(DawnError::AlreadyPublished { .. })
        );
    }
}
