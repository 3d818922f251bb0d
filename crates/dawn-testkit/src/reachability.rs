//! Manually driven reachability source

use dawn_core::effects::ReachabilityEffects;
use std::sync::Arc;
use tokio::sync::watch;

/// Reachability source that tests poke by hand.
#[derive(Debug, Clone)]
pub struct ManualReachability {
    tx: Arc<watch::Sender<u64>>,
}

impl Default for ManualReachability {
    fn default() -> Self {
        Self::new()
    }
}

impl ManualReachability {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(0);
        Self { tx: Arc::new(tx) }
    }

    /// Report one connection change
    pub fn notify_change(&self) {
        self.tx.send_modify(|count| *count += 1);
    }
}

impl ReachabilityEffects for ManualReachability {
    fn connection_changes(&self) -> watch::Receiver<u64> {
        self.tx.subscribe()
    }
}
