//! App event stream.
//!
//! Every trigger the orchestrator reacts to, and every state change it
//! publishes, travels over one broadcast bus. Emitting never blocks; slow
//! subscribers lag and are told how many events they missed.

use dawn_core::{
    ConversationId, LifecycleState, ServiceAppState, StartupDecision, TouchIdState,
};
use tokio::sync::broadcast;

/// Events exchanged between the host, the orchestrator and UI observers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// OS lifecycle transition
    MobileAppState(LifecycleState),
    /// Focus derived from a lifecycle transition
    ChangedFocus {
        /// Whether the user can interact with the app
        app_focused: bool,
        /// State reported to the backend service
        service_state: ServiceAppState,
    },
    /// Daemon handshake `version` started; boot-phase work may register waits
    DaemonHandshake {
        /// Handshake version
        version: u32,
    },
    /// Every handshake wait was released
    DaemonHandshakeDone,
    /// The startup decision was published
    StartupDetailsLoaded(StartupDecision),
    /// A session is active
    LoggedIn,
    /// Logout requested
    Logout,
    /// Logout completed
    LoggedOut,
    /// Navigation switched to a new route path
    SwitchTo {
        /// Route segments from the root
        route_path: Vec<String>,
    },
    /// Chat selection changed
    SelectConversation {
        /// Selected conversation, `None` when deselected
        conversation: Option<ConversationId>,
    },
    /// Capability label reported by the sensor probe, empty when unsupported
    TouchIdAllowedBySystem {
        /// Human-readable sensor label
        label: String,
    },
    /// The user preference for biometric unlock changed
    TouchIdEnabled {
        /// New preference
        enabled: bool,
        /// Whether the preference must be written back to the daemon
        write_to_config: bool,
    },
    /// The re-authentication gate changed state
    TouchIdState(TouchIdState),
    /// Engine listeners may be installed
    SetupEngineListeners,
    /// Connectivity changed; reachability should be re-checked
    CheckReachability,
}

/// Broadcast bus for [`AppEvent`]s.
#[derive(Debug, Clone)]
pub struct EventBus {
    tx: broadcast::Sender<AppEvent>,
}

impl EventBus {
    /// Create a bus buffering up to `capacity` events per subscriber.
    pub fn new(capacity: usize) -> Self {
        let (tx, _rx) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// Publish an event. Having no subscribers is not an error.
    pub fn emit(&self, event: AppEvent) {
        tracing::trace!(?event, "emit");
        let _ = self.tx.send(event);
    }

    /// Subscribe to events emitted from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<AppEvent> {
        self.tx.subscribe()
    }
}
