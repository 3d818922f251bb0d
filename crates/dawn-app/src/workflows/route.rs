//! Last-route persistence.
//!
//! Every navigation change while logged in issues a write of the current
//! [`RouteSnapshot`]; logout issues a delete. Writes are applied in the order
//! they were issued: a write that reaches storage after a newer one has been
//! applied is dropped.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dawn_core::effects::StorageEffects;
use dawn_core::{NavigationContext, RouteSnapshot};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

/// Writer for the persisted route snapshot.
#[derive(Clone)]
pub struct RoutePersistence {
    storage: Arc<dyn StorageEffects>,
    key: Arc<str>,
    issued: Arc<AtomicU64>,
    applied: Arc<Mutex<u64>>,
}

/// A write or delete that has been issued but not yet applied.
pub struct PendingRouteWrite {
    persistence: RoutePersistence,
    generation: u64,
    value: Option<String>,
}

impl RoutePersistence {
    /// Persist snapshots to `storage` under `key`.
    pub fn new(storage: Arc<dyn StorageEffects>, key: impl Into<Arc<str>>) -> Self {
        Self {
            storage,
            key: key.into(),
            issued: Arc::new(AtomicU64::new(0)),
            applied: Arc::new(Mutex::new(0)),
        }
    }

    /// Storage key of the snapshot.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Issue the write for `context`: the snapshot for a valid initial tab,
    /// a delete otherwise.
    pub fn issue_navigation(&self, context: &NavigationContext) -> PendingRouteWrite {
        let value = RouteSnapshot::from_navigation(context).and_then(|snapshot| {
            snapshot
                .encode()
                .map_err(|error| tracing::warn!(%error, "failed to encode route snapshot"))
                .ok()
        });
        self.issue(value)
    }

    /// Issue a delete.
    pub fn issue_clear(&self) -> PendingRouteWrite {
        self.issue(None)
    }

    /// Persist `context` in the background.
    pub fn on_navigation_changed(&self, context: &NavigationContext) -> JoinHandle<()> {
        tokio::spawn(self.issue_navigation(context).apply())
    }

    /// Best-effort delete of the snapshot. Failures are logged.
    pub async fn on_logout(&self) {
        self.issue_clear().apply().await;
    }

    fn issue(&self, value: Option<String>) -> PendingRouteWrite {
        let generation = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        PendingRouteWrite {
            persistence: self.clone(),
            generation,
            value,
        }
    }
}

impl PendingRouteWrite {
    /// Issue order of this write.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Apply the write unless a newer one has already been applied.
    pub async fn apply(self) {
        let persistence = self.persistence;
        let key = persistence.key.as_ref();
        let mut applied = persistence.applied.lock().await;
        if *applied > self.generation {
            tracing::debug!(key, generation = self.generation, "skipping superseded route write");
            return;
        }

        let result = match self.value {
            Some(value) => persistence.storage.set(key, value).await,
            None => persistence.storage.remove(key).await,
        };
        if let Err(error) = result {
            tracing::warn!(key, generation = self.generation, %error, "route write failed");
        }
        *applied = self.generation;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dawn_core::{ConversationId, Tab};
    use dawn_testkit::MemoryStorageHandler;
    use proptest::prelude::*;

    const KEY: &str = "routeState";

    fn persistence(storage: &MemoryStorageHandler) -> RoutePersistence {
        RoutePersistence::new(Arc::new(storage.clone()), KEY)
    }

    async fn stored(storage: &MemoryStorageHandler) -> Option<RouteSnapshot> {
        let raw = storage.raw(KEY).await?;
        RouteSnapshot::decode(&raw).unwrap()
    }

    #[tokio::test]
    async fn test_writes_snapshot_for_conversation() {
        let storage = MemoryStorageHandler::new();
        let context = NavigationContext::new(["chat", "conversation"], Some(ConversationId::new("c9")));
        persistence(&storage)
            .on_navigation_changed(&context)
            .await
            .unwrap();

        let snapshot = stored(&storage).await.unwrap();
        assert_eq!(snapshot.tab, Tab::Chat);
        assert_eq!(snapshot.selected_conversation, Some(ConversationId::new("c9")));
    }

    #[tokio::test]
    async fn test_invalid_tab_clears_key() {
        let storage = MemoryStorageHandler::with_value(KEY, r#"{"tab":"chat"}"#);
        persistence(&storage)
            .on_navigation_changed(&NavigationContext::new(["login"], None))
            .await
            .unwrap();
        assert_eq!(storage.raw(KEY).await, None);
        assert_eq!(storage.remove_count(), 1);
    }

    #[tokio::test]
    async fn test_logout_clears_and_swallows_failure() {
        let storage = MemoryStorageHandler::with_value(KEY, r#"{"tab":"chat"}"#);
        let persistence = persistence(&storage);
        persistence.on_logout().await;
        assert_eq!(storage.raw(KEY).await, None);

        storage.fail_writes(true);
        persistence.on_logout().await;
    }

    #[tokio::test]
    async fn test_last_issued_write_wins() {
        let storage = MemoryStorageHandler::new();
        let persistence = persistence(&storage);

        let older = persistence.issue_navigation(&NavigationContext::new(["files"], None));
        let newer = persistence.issue_navigation(&NavigationContext::new(["teams"], None));
        assert!(newer.generation() > older.generation());

        newer.apply().await;
        older.apply().await;

        assert_eq!(stored(&storage).await.unwrap().tab, Tab::Teams);
        assert_eq!(storage.write_count(), 1);
    }

    #[tokio::test]
    async fn test_logout_supersedes_pending_navigation() {
        let storage = MemoryStorageHandler::new();
        let persistence = persistence(&storage);

        let navigation = persistence.issue_navigation(&NavigationContext::new(["git"], None));
        persistence.on_logout().await;
        navigation.apply().await;

        assert_eq!(storage.raw(KEY).await, None);
    }

    proptest! {
        #[test]
        fn prop_last_issued_write_wins_in_any_apply_order(
            order in Just((0..4usize).collect::<Vec<_>>()).prop_shuffle()
        ) {
            let tabs = [Tab::People, Tab::Files, Tab::Teams, Tab::Git];
            let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
            let stored_tab = runtime.block_on(async {
                let storage = MemoryStorageHandler::new();
                let persistence = persistence(&storage);
                let mut writes: Vec<Option<PendingRouteWrite>> = tabs
                    .iter()
                    .map(|tab| Some(persistence.issue_navigation(&NavigationContext::new([tab.as_str()], None))))
                    .collect();
                for index in &order {
                    if let Some(write) = writes[*index].take() {
                        write.apply().await;
                    }
                }
                stored(&storage).await.map(|snapshot| snapshot.tab)
            });
            prop_assert_eq!(stored_tab, Some(Tab::Git));
        }
    }
}
