//! Network reachability effects

use tokio::sync::watch;

/// Source of connection-change notifications.
///
/// The receiver carries a change counter. Only the latest value matters, so
/// bursts of changes collapse into a single wake-up.
pub trait ReachabilityEffects: Send + Sync {
    /// Subscribe to connection changes.
    fn connection_changes(&self) -> watch::Receiver<u64>;
}
