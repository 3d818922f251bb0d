//! Platform orchestrator.
//!
//! Owns the dispatch loop over the [`EventBus`]. Each event updates
//! [`PlatformState`](crate::PlatformState) synchronously and hands any
//! effectful work to the task registry, so dispatch itself never suspends.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

use dawn_core::effects::{
    BiometricEffects, HandshakeEffects, LaunchEffects, PreferenceEffects, ReachabilityEffects,
    SessionEffects, StorageEffects,
};
use dawn_core::{DawnError, HandshakeState, LifecycleState};
use parking_lot::Mutex;
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::mpsc;

use crate::config::AppConfig;
use crate::events::AppEvent;
use crate::state::PlatformCore;
use crate::task_registry::TaskRegistry;
use crate::workflows::{
    focus, prepare_startup_wait, reachability, save_touch_id_enabled, AuthGate, GateTrigger,
    RoutePersistence, StartupResolver, TouchIdProbe,
};

/// Effect handlers the orchestrator runs against.
#[derive(Clone)]
pub struct PlatformHandlers {
    /// Key-value store holding the route snapshot
    pub storage: Arc<dyn StorageEffects>,
    /// Deep link and push producers
    pub launch: Arc<dyn LaunchEffects>,
    /// Biometric sensor
    pub biometric: Arc<dyn BiometricEffects>,
    /// Daemon config RPC
    pub preferences: Arc<dyn PreferenceEffects>,
    /// Daemon session RPC
    pub session: Arc<dyn SessionEffects>,
    /// Boot handshake sequencer
    pub sequencer: Arc<dyn HandshakeEffects>,
    /// Optional; the reachability watcher is skipped without one
    pub reachability: Option<Arc<dyn ReachabilityEffects>>,
}

/// Wires the workflows to the app event stream.
pub struct PlatformOrchestrator {
    core: PlatformCore,
    handlers: PlatformHandlers,
    route: RoutePersistence,
    gate: AuthGate,
    gate_tx: mpsc::UnboundedSender<GateTrigger>,
    gate_rx: Mutex<Option<mpsc::UnboundedReceiver<GateTrigger>>>,
    tasks: TaskRegistry,
    started: AtomicBool,
    reachability_started: AtomicBool,
}

impl PlatformOrchestrator {
    /// Build an orchestrator over `core`.
    pub fn new(core: PlatformCore, handlers: PlatformHandlers) -> Arc<Self> {
        let route = RoutePersistence::new(
            handlers.storage.clone(),
            core.config().route_state_key.as_str(),
        );
        let gate = AuthGate::new(core.clone(), handlers.biometric.clone());
        let (gate_tx, gate_rx) = mpsc::unbounded_channel();
        Arc::new(Self {
            core,
            handlers,
            route,
            gate,
            gate_tx,
            gate_rx: Mutex::new(Some(gate_rx)),
            tasks: TaskRegistry::new(),
            started: AtomicBool::new(false),
            reachability_started: AtomicBool::new(false),
        })
    }

    /// Build an orchestrator with a fresh core for `config`.
    pub fn with_config(config: AppConfig, handlers: PlatformHandlers) -> Arc<Self> {
        Self::new(PlatformCore::new(config), handlers)
    }

    /// Shared core the workflows run against.
    pub fn core(&self) -> &PlatformCore {
        &self.core
    }

    /// The re-authentication gate.
    pub fn gate(&self) -> &AuthGate {
        &self.gate
    }

    /// Registry of every task spawned by the orchestrator.
    pub fn tasks(&self) -> &TaskRegistry {
        &self.tasks
    }

    /// Start the dispatch loop and launch startup resolution.
    ///
    /// Resolution is not gated on anything; it overlaps the rest of boot.
    pub fn start(self: &Arc<Self>) -> Result<(), DawnError> {
        if self.started.swap(true, Ordering::SeqCst) {
            return Err(DawnError::invalid("orchestrator already started"));
        }

        let events = self.core.events().subscribe();
        let this = Arc::downgrade(self);
        self.tasks.spawn_cancellable(dispatch_loop(this, events));
        self.start_gate_worker();

        let resolver = StartupResolver::new(
            self.handlers.storage.clone(),
            self.handlers.launch.clone(),
            self.core.config().route_state_key.clone(),
        );
        let core = self.core.clone();
        self.tasks.spawn(async move {
            match resolver.resolve_and_publish(core.startup()).await {
                Ok(decision) => core.events().emit(AppEvent::StartupDetailsLoaded(decision)),
                Err(error) => tracing::error!(%error, "startup decision not published"),
            }
        });

        tracing::info!("platform orchestrator started");
        Ok(())
    }

    /// Apply one event.
    pub fn dispatch(&self, event: &AppEvent) {
        tracing::trace!(?event, "dispatch");
        match event {
            AppEvent::MobileAppState(state) => self.on_lifecycle(*state),
            AppEvent::DaemonHandshake { version } => self.on_handshake(*version),
            AppEvent::DaemonHandshakeDone => {
                self.core
                    .update(|s| s.daemon_handshake_state = HandshakeState::Done);
                self.trigger_gate(GateTrigger::BootComplete);
            }
            AppEvent::StartupDetailsLoaded(decision) => {
                tracing::debug!(?decision, "startup details loaded");
            }
            AppEvent::LoggedIn => self.core.update(|s| s.logged_in = true),
            AppEvent::Logout => self.on_logout(),
            AppEvent::LoggedOut => {
                self.core.update(|s| s.logged_in = false);
                let clear = self.route.issue_clear();
                self.tasks.spawn(clear.apply());
            }
            AppEvent::SwitchTo { route_path } => {
                self.core.update(|s| s.route_path = route_path.clone());
                self.persist_route();
            }
            AppEvent::SelectConversation { conversation } => {
                self.core
                    .update(|s| s.selected_conversation = conversation.clone());
                self.persist_route();
            }
            AppEvent::TouchIdAllowedBySystem { label } => {
                self.core
                    .update(|s| s.touch_id_allowed_by_system = label.clone());
            }
            AppEvent::TouchIdEnabled {
                enabled,
                write_to_config,
            } => {
                self.core.update(|s| s.touch_id_enabled = *enabled);
                if *write_to_config {
                    let preferences = self.handlers.preferences.clone();
                    let enabled = *enabled;
                    self.tasks.spawn(async move {
                        save_touch_id_enabled(preferences.as_ref(), enabled).await;
                    });
                }
            }
            AppEvent::SetupEngineListeners => self.start_reachability(),
            AppEvent::ChangedFocus { .. }
            | AppEvent::TouchIdState(_)
            | AppEvent::CheckReachability => {}
        }
    }

    /// Stop every spawned task. Pending handshake waits are released.
    pub fn shutdown(&self) {
        tracing::info!("platform orchestrator shutting down");
        self.tasks.shutdown();
    }

    fn on_lifecycle(&self, state: LifecycleState) {
        self.core.update(|s| s.mobile_app_state = state);
        focus::update_changed_focus(&self.core, state);
        self.trigger_gate(GateTrigger::Lifecycle(state));
    }

    fn on_handshake(&self, version: u32) {
        self.core.update(|s| {
            s.daemon_handshake_state = HandshakeState::WaitingForWaiters { version };
        });

        // Both waits are registered before either can be released.
        let startup = prepare_startup_wait(
            self.handlers.sequencer.clone(),
            self.core.startup(),
            version,
        );
        let probe = TouchIdProbe::register(
            self.core.clone(),
            self.handlers.biometric.clone(),
            self.handlers.preferences.clone(),
            self.handlers.sequencer.clone(),
            version,
        );

        self.tasks.spawn(async move {
            if let Err(error) = startup.wait().await {
                tracing::warn!(%error, "startup wait ended without a decision");
            }
        });
        self.tasks.spawn(async move {
            probe.run().await;
        });
    }

    fn on_logout(&self) {
        let session = self.handlers.session.clone();
        let core = self.core.clone();
        self.tasks.spawn(async move {
            if let Err(error) = session.logout().await {
                tracing::warn!(%error, "logout request failed");
            }
            core.update(|s| s.logged_in = false);
            tracing::info!("logged out");
            core.events().emit(AppEvent::LoggedOut);
        });
    }

    fn persist_route(&self) {
        let state = self.core.snapshot();
        if !state.logged_in {
            return;
        }
        let write = self.route.issue_navigation(&state.navigation());
        self.tasks.spawn(write.apply());
    }

    /// Queue a gate evaluation. Triggers are evaluated one at a time in
    /// dispatch order; a trigger dispatched during a challenge is dropped.
    fn trigger_gate(&self, trigger: GateTrigger) {
        if self.gate.state().is_challenging() {
            tracing::debug!(?trigger, "challenge in flight; dropping trigger");
            return;
        }
        self.start_gate_worker();
        if self.gate_tx.send(trigger).is_err() {
            tracing::warn!(?trigger, "auth gate worker stopped; dropping trigger");
        }
    }

    fn start_gate_worker(&self) {
        let Some(triggers) = self.gate_rx.lock().take() else {
            return;
        };
        self.tasks.spawn(gate_worker(self.gate.clone(), triggers));
    }

    fn start_reachability(&self) {
        let Some(source) = self.handlers.reachability.clone() else {
            tracing::debug!("no reachability source configured");
            return;
        };
        if self.reachability_started.swap(true, Ordering::SeqCst) {
            return;
        }
        let events = self.core.events().clone();
        self.tasks
            .spawn_cancellable(reachability::watch_reachability(source, events));
    }
}

async fn gate_worker(gate: AuthGate, mut triggers: mpsc::UnboundedReceiver<GateTrigger>) {
    while let Some(trigger) = triggers.recv().await {
        let outcome = gate.on_trigger(trigger).await;
        tracing::debug!(?trigger, ?outcome, "auth gate evaluated");
    }
}

async fn dispatch_loop(
    orchestrator: Weak<PlatformOrchestrator>,
    mut events: tokio::sync::broadcast::Receiver<AppEvent>,
) {
    loop {
        let event = match events.recv().await {
            Ok(event) => event,
            Err(RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "dispatcher lagged behind the event bus");
                continue;
            }
            Err(RecvError::Closed) => break,
        };
        let Some(orchestrator) = orchestrator.upgrade() else {
            break;
        };
        orchestrator.dispatch(&event);
    }
}
