//! Process-wide platform state.
//!
//! [`PlatformCore`] bundles the shared state slice, the event bus and the
//! startup signal. It is cheap to clone and handed to every workflow.

use std::sync::Arc;

use dawn_core::{
    ConversationId, HandshakeState, LifecycleState, NavigationContext, StartupDecision,
    TouchIdState,
};
use parking_lot::RwLock;

use crate::config::AppConfig;
use crate::events::{AppEvent, EventBus};
use crate::signal::OneShot;

/// Config slice read by the workflows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlatformState {
    /// Progress of the daemon handshake
    pub daemon_handshake_state: HandshakeState,
    /// Whether a session is active
    pub logged_in: bool,
    /// Last OS lifecycle state
    pub mobile_app_state: LifecycleState,
    /// Whether the user can interact with the app
    pub app_focused: bool,
    /// Sensor label; empty when the OS reports no usable sensor
    pub touch_id_allowed_by_system: String,
    /// User preference for biometric unlock
    pub touch_id_enabled: bool,
    /// Published state of the re-authentication gate
    pub touch_id_state: TouchIdState,
    /// Current route segments
    pub route_path: Vec<String>,
    /// Conversation selected in the chat store
    pub selected_conversation: Option<ConversationId>,
}

impl PlatformState {
    /// Biometric unlock is both supported and wanted.
    pub fn touch_id_active(&self) -> bool {
        !self.touch_id_allowed_by_system.is_empty() && self.touch_id_enabled
    }

    /// Current navigation context.
    pub fn navigation(&self) -> NavigationContext {
        NavigationContext {
            route_path: self.route_path.clone(),
            selected_conversation: self.selected_conversation.clone(),
        }
    }
}

/// Shared handle to config, state, event bus and startup signal.
#[derive(Debug, Clone)]
pub struct PlatformCore {
    config: Arc<AppConfig>,
    state: Arc<RwLock<PlatformState>>,
    events: EventBus,
    startup: OneShot<StartupDecision>,
}

impl PlatformCore {
    /// Create a core with default state.
    pub fn new(config: AppConfig) -> Self {
        let events = EventBus::new(config.event_capacity);
        Self {
            config: Arc::new(config),
            state: Arc::new(RwLock::new(PlatformState::default())),
            events,
            startup: OneShot::new("startup decision"),
        }
    }

    /// Configuration the core was built with.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Bus every workflow publishes to.
    pub fn events(&self) -> &EventBus {
        &self.events
    }

    /// The once-per-process startup decision.
    pub fn startup(&self) -> &OneShot<StartupDecision> {
        &self.startup
    }

    /// Copy of the current state.
    pub fn snapshot(&self) -> PlatformState {
        self.state.read().clone()
    }

    /// Mutate the state. The lock is never held across an await.
    pub fn update<R>(&self, f: impl FnOnce(&mut PlatformState) -> R) -> R {
        f(&mut self.state.write())
    }

    /// Record and broadcast a new gate state.
    pub fn publish_touch_id_state(&self, state: TouchIdState) {
        self.update(|s| s.touch_id_state = state);
        tracing::debug!(?state, "touch id state");
        self.events.emit(AppEvent::TouchIdState(state));
    }
}
