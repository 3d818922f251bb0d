//! Lifecycle-driven biometric re-authentication.
//!
//! Sending the app to the background while biometric unlock is active arms
//! the gate; the next return to the foreground challenges the user. A failed
//! challenge logs the user out. Evaluations never overlap: a trigger arriving
//! while one is in progress is dropped, and the orchestrator stops queueing
//! triggers while a challenge is on screen.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use dawn_core::effects::BiometricEffects;
use dawn_core::{LifecycleState, TouchIdState};
use tokio::sync::broadcast::error::RecvError;

use crate::events::AppEvent;
use crate::state::PlatformCore;

/// Mutable state owned by the gate.
#[derive(Debug, Default)]
pub struct AuthGateState {
    reentrancy_guard: AtomicBool,
    was_backgrounded: AtomicBool,
    challenging: AtomicBool,
}

impl AuthGateState {
    /// Take the re-entrancy guard, or `None` when an evaluation is running.
    pub fn try_enter(&self) -> Option<EvaluationGuard<'_>> {
        self.reentrancy_guard
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| EvaluationGuard { state: self })
    }

    /// Whether an evaluation currently holds the guard.
    pub fn is_evaluating(&self) -> bool {
        self.reentrancy_guard.load(Ordering::Acquire)
    }

    /// Whether the app went to the background since the last unlock.
    pub fn was_backgrounded(&self) -> bool {
        self.was_backgrounded.load(Ordering::Acquire)
    }

    /// Whether a biometric prompt is on screen.
    pub fn is_challenging(&self) -> bool {
        self.challenging.load(Ordering::Acquire)
    }
}

/// Held for the span of one evaluation; releases the guard when dropped.
#[derive(Debug)]
pub struct EvaluationGuard<'a> {
    state: &'a AuthGateState,
}

impl EvaluationGuard<'_> {
    fn set_backgrounded(&self, value: bool) {
        self.state.was_backgrounded.store(value, Ordering::Release);
    }
}

impl Drop for EvaluationGuard<'_> {
    fn drop(&mut self) {
        self.state.reentrancy_guard.store(false, Ordering::Release);
    }
}

/// What caused an evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateTrigger {
    /// OS lifecycle transition
    Lifecycle(LifecycleState),
    /// The boot handshake completed; uses the current lifecycle state
    BootComplete,
}

/// How an evaluation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateOutcome {
    /// Another evaluation held the guard
    Ignored,
    /// Boot has not finished
    NotBooted,
    /// Biometric unlock is unsupported or switched off
    Disabled,
    /// No session to protect
    NotLoggedIn,
    /// Backgrounded; the lock screen is up
    Armed,
    /// Challenge passed
    Unlocked,
    /// Challenge failed; the user was logged out
    LoggedOut,
    /// Nothing to do for this transition
    Settled,
}

/// Re-authentication gate.
#[derive(Clone)]
pub struct AuthGate {
    core: PlatformCore,
    biometric: Arc<dyn BiometricEffects>,
    state: Arc<AuthGateState>,
}

impl AuthGate {
    /// Create a gate with a cleared flag and a free guard.
    pub fn new(core: PlatformCore, biometric: Arc<dyn BiometricEffects>) -> Self {
        Self {
            core,
            biometric,
            state: Arc::new(AuthGateState::default()),
        }
    }

    /// Flags shared by every clone of this gate.
    pub fn state(&self) -> &AuthGateState {
        &self.state
    }

    /// Evaluate one trigger.
    pub async fn on_trigger(&self, trigger: GateTrigger) -> GateOutcome {
        let Some(guard) = self.state.try_enter() else {
            tracing::debug!(?trigger, "auth gate busy; dropping trigger");
            return GateOutcome::Ignored;
        };

        let snapshot = self.core.snapshot();
        if !snapshot.daemon_handshake_state.is_done() {
            return GateOutcome::NotBooted;
        }
        if !snapshot.touch_id_active() {
            guard.set_backgrounded(false);
            return GateOutcome::Disabled;
        }
        if !snapshot.logged_in {
            return GateOutcome::NotLoggedIn;
        }

        let lifecycle = match trigger {
            GateTrigger::Lifecycle(state) => state,
            GateTrigger::BootComplete => snapshot.mobile_app_state,
        };

        if lifecycle == LifecycleState::Background {
            guard.set_backgrounded(true);
            self.core.publish_touch_id_state(TouchIdState::Asking);
            tracing::info!("app backgrounded; biometric unlock armed");
            return GateOutcome::Armed;
        }

        let outcome = if lifecycle == LifecycleState::Active && self.state.was_backgrounded() {
            self.challenge().await
        } else {
            GateOutcome::Settled
        };
        guard.set_backgrounded(false);
        outcome
    }

    async fn challenge(&self) -> GateOutcome {
        self.state.challenging.store(true, Ordering::Release);
        self.core.publish_touch_id_state(TouchIdState::Asking);
        self.core.publish_touch_id_state(TouchIdState::Authenticating);

        let prompt = self.core.config().biometric_prompt.clone();
        let outcome = match self.biometric.authenticate(&prompt).await {
            Ok(()) => {
                tracing::info!("biometric challenge passed");
                GateOutcome::Unlocked
            }
            Err(error) => {
                tracing::warn!(%error, "biometric challenge failed; logging out");
                self.logout().await;
                GateOutcome::LoggedOut
            }
        };
        self.state.challenging.store(false, Ordering::Release);
        self.core.publish_touch_id_state(TouchIdState::Done);
        outcome
    }

    async fn logout(&self) {
        let mut events = self.core.events().subscribe();
        self.core.events().emit(AppEvent::Logout);
        loop {
            match events.recv().await {
                Ok(AppEvent::LoggedOut) => return,
                Ok(_) => {}
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "auth gate lagged while waiting for logout");
                    if !self.core.snapshot().logged_in {
                        return;
                    }
                }
                Err(RecvError::Closed) => return,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AppConfig;
    use dawn_core::{DawnError, HandshakeState};
    use dawn_testkit::MockBiometricHandler;
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;

    const BACKGROUND: GateTrigger = GateTrigger::Lifecycle(LifecycleState::Background);
    const ACTIVE: GateTrigger = GateTrigger::Lifecycle(LifecycleState::Active);
    const INACTIVE: GateTrigger = GateTrigger::Lifecycle(LifecycleState::Inactive);

    fn ready_core() -> PlatformCore {
        let core = PlatformCore::new(AppConfig::default());
        core.update(|s| {
            s.daemon_handshake_state = HandshakeState::Done;
            s.logged_in = true;
            s.touch_id_allowed_by_system = "FaceID".into();
            s.touch_id_enabled = true;
        });
        core
    }

    /// Answers every `Logout` with `LoggedOut`, like the orchestrator does.
    fn answer_logouts(core: &PlatformCore) -> Arc<AtomicUsize> {
        let count = Arc::new(AtomicUsize::new(0));
        let mut rx = core.events().subscribe();
        let events = core.events().clone();
        let seen = count.clone();
        tokio::spawn(async move {
            while let Ok(event) = rx.recv().await {
                if event == AppEvent::Logout {
                    seen.fetch_add(1, Ordering::SeqCst);
                    events.emit(AppEvent::LoggedOut);
                }
            }
        });
        count
    }

    fn touch_id_states(rx: &mut tokio::sync::broadcast::Receiver<AppEvent>) -> Vec<TouchIdState> {
        let mut states = Vec::new();
        while let Ok(event) = rx.try_recv() {
            if let AppEvent::TouchIdState(state) = event {
                states.push(state);
            }
        }
        states
    }

    #[tokio::test]
    async fn test_not_booted_leaves_flag_clear() {
        let core = ready_core();
        core.update(|s| s.daemon_handshake_state = HandshakeState::Starting);
        let gate = AuthGate::new(core, Arc::new(MockBiometricHandler::supported("FaceID")));

        let outcome = gate.on_trigger(BACKGROUND).await;
        assert_eq!(outcome, GateOutcome::NotBooted);
        assert!(!gate.state().was_backgrounded());
        assert!(!gate.state().is_evaluating());
    }

    #[tokio::test]
    async fn test_guard_held_ignores_trigger() {
        let core = ready_core();
        let mut rx = core.events().subscribe();
        let gate = AuthGate::new(core, Arc::new(MockBiometricHandler::supported("FaceID")));

        let held = gate.state().try_enter().unwrap();
        let outcome = gate.on_trigger(BACKGROUND).await;
        assert_eq!(outcome, GateOutcome::Ignored);
        assert!(!gate.state().was_backgrounded());
        assert!(touch_id_states(&mut rx).is_empty());
        drop(held);
        assert!(!gate.state().is_evaluating());
    }

    #[tokio::test]
    async fn test_disabled_clears_flag() {
        let core = ready_core();
        let gate = AuthGate::new(core.clone(), Arc::new(MockBiometricHandler::supported("FaceID")));
        gate.on_trigger(BACKGROUND).await;
        assert!(gate.state().was_backgrounded());

        core.update(|s| s.touch_id_enabled = false);
        let outcome = gate.on_trigger(ACTIVE).await;
        assert_eq!(outcome, GateOutcome::Disabled);
        assert!(!gate.state().was_backgrounded());
    }

    #[tokio::test]
    async fn test_not_logged_in() {
        let core = ready_core();
        core.update(|s| s.logged_in = false);
        let gate = AuthGate::new(core, Arc::new(MockBiometricHandler::supported("FaceID")));
        let outcome = gate.on_trigger(BACKGROUND).await;
        assert_eq!(outcome, GateOutcome::NotLoggedIn);
    }

    #[tokio::test]
    async fn test_background_then_active_unlocks() {
        let core = ready_core();
        let mut rx = core.events().subscribe();
        let biometric = MockBiometricHandler::supported("FaceID");
        let gate = AuthGate::new(core.clone(), Arc::new(biometric.clone()));

        assert_eq!(gate.on_trigger(BACKGROUND).await, GateOutcome::Armed);
        assert_eq!(gate.on_trigger(ACTIVE).await, GateOutcome::Unlocked);

        assert_eq!(
            touch_id_states(&mut rx),
            vec![
                TouchIdState::Asking,
                TouchIdState::Asking,
                TouchIdState::Authenticating,
                TouchIdState::Done,
            ]
        );
        assert_eq!(biometric.prompts(), vec![crate::config::DEFAULT_BIOMETRIC_PROMPT]);
        assert!(!gate.state().was_backgrounded());
        assert_eq!(core.snapshot().touch_id_state, TouchIdState::Done);
    }

    #[tokio::test]
    async fn test_failed_challenge_logs_out_once() {
        let core = ready_core();
        let logouts = answer_logouts(&core);
        let biometric = MockBiometricHandler::supported("FaceID");
        biometric.set_challenge_result(Err(DawnError::biometric("user cancelled")));
        let gate = AuthGate::new(core.clone(), Arc::new(biometric.clone()));

        gate.on_trigger(BACKGROUND).await;
        let outcome = tokio::time::timeout(Duration::from_secs(1), gate.on_trigger(ACTIVE))
            .await
            .unwrap();

        assert_eq!(outcome, GateOutcome::LoggedOut);
        assert_eq!(biometric.challenge_count(), 1);
        assert_eq!(core.snapshot().touch_id_state, TouchIdState::Done);
        assert_eq!(logouts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_overlapping_trigger_dropped_during_challenge() {
        let core = ready_core();
        let biometric = MockBiometricHandler::supported("FaceID");
        biometric.pause_challenges();
        let gate = AuthGate::new(core, Arc::new(biometric.clone()));

        gate.on_trigger(BACKGROUND).await;
        let running = {
            let gate = gate.clone();
            tokio::spawn(async move { gate.on_trigger(ACTIVE).await })
        };
        biometric.challenge_started().await;

        assert_eq!(gate.on_trigger(BACKGROUND).await, GateOutcome::Ignored);

        biometric.resume_challenge();
        assert_eq!(running.await.unwrap(), GateOutcome::Unlocked);
        assert_eq!(biometric.challenge_count(), 1);
        assert!(!gate.state().is_evaluating());
    }

    #[tokio::test]
    async fn test_challenge_flag_spans_prompt() {
        let core = ready_core();
        let biometric = MockBiometricHandler::supported("FaceID");
        biometric.pause_challenges();
        let gate = AuthGate::new(core, Arc::new(biometric.clone()));

        gate.on_trigger(BACKGROUND).await;
        assert!(!gate.state().is_challenging());
        let running = {
            let gate = gate.clone();
            tokio::spawn(async move { gate.on_trigger(ACTIVE).await })
        };
        biometric.challenge_started().await;
        assert!(gate.state().is_challenging());

        biometric.resume_challenge();
        assert_eq!(running.await.unwrap(), GateOutcome::Unlocked);
        assert!(!gate.state().is_challenging());
    }

    #[tokio::test]
    async fn test_logout_wait_survives_lagged_receiver() {
        let core = PlatformCore::new(AppConfig {
            event_capacity: 1,
            ..AppConfig::default()
        });
        core.update(|s| {
            s.daemon_handshake_state = HandshakeState::Done;
            s.logged_in = true;
            s.touch_id_allowed_by_system = "FaceID".into();
            s.touch_id_enabled = true;
        });

        // Answer the logout, then push the answer out of a one-slot channel.
        let mut rx = core.events().subscribe();
        let responder = core.clone();
        tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(AppEvent::Logout) => break,
                    Ok(_) | Err(RecvError::Lagged(_)) => {}
                    Err(RecvError::Closed) => return,
                }
            }
            responder.update(|s| s.logged_in = false);
            responder.events().emit(AppEvent::LoggedOut);
            for _ in 0..4 {
                responder.events().emit(AppEvent::CheckReachability);
            }
        });

        let biometric = MockBiometricHandler::supported("FaceID");
        biometric.set_challenge_result(Err(DawnError::biometric("lockout")));
        let gate = AuthGate::new(core.clone(), Arc::new(biometric));
        gate.on_trigger(BACKGROUND).await;

        let outcome = tokio::time::timeout(Duration::from_secs(1), gate.on_trigger(ACTIVE))
            .await
            .unwrap();
        assert_eq!(outcome, GateOutcome::LoggedOut);
        assert!(!core.snapshot().logged_in);
        assert!(!gate.state().is_evaluating());
    }

    #[tokio::test]
    async fn test_inactive_clears_flag() {
        let core = ready_core();
        let biometric = MockBiometricHandler::supported("FaceID");
        let gate = AuthGate::new(core, Arc::new(biometric.clone()));

        gate.on_trigger(BACKGROUND).await;
        assert_eq!(gate.on_trigger(INACTIVE).await, GateOutcome::Settled);
        assert_eq!(gate.on_trigger(ACTIVE).await, GateOutcome::Settled);
        assert_eq!(biometric.challenge_count(), 0);
    }

    #[tokio::test]
    async fn test_boot_complete_uses_current_lifecycle() {
        let core = ready_core();
        core.update(|s| s.mobile_app_state = LifecycleState::Background);
        let gate = AuthGate::new(core, Arc::new(MockBiometricHandler::supported("FaceID")));
        assert_eq!(gate.on_trigger(GateTrigger::BootComplete).await, GateOutcome::Armed);
        assert!(gate.state().was_backgrounded());
    }
}
