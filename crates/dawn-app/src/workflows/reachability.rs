//! Network reachability watcher.

use std::sync::Arc;

use dawn_core::effects::ReachabilityEffects;

use crate::events::{AppEvent, EventBus};

/// Emit [`AppEvent::CheckReachability`] for every observed connection change.
///
/// Changes arriving faster than they are handled collapse into one. Returns
/// when the source closes.
pub async fn watch_reachability(source: Arc<dyn ReachabilityEffects>, events: EventBus) {
    let mut changes = source.connection_changes();
    changes.borrow_and_update();
    tracing::debug!("reachability watcher started");

    while changes.changed().await.is_ok() {
        let change = *changes.borrow_and_update();
        tracing::debug!(change, "connection changed");
        events.emit(AppEvent::CheckReachability);
    }
    tracing::debug!("reachability source closed");
}
