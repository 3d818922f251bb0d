//! Holding the boot handshake open until the startup decision is published.

use std::sync::Arc;

use dawn_core::effects::HandshakeEffects;
use dawn_core::{DawnError, HandshakeWait, StartupDecision};

use crate::signal::OneShot;

/// Wait name registered while the startup decision is pending.
pub const STARTUP_WAIT_NAME: &str = "platform.native-waitStartupDetails";

/// A registered handshake wait, released when dropped.
///
/// The release is emitted on every exit path, including task abort.
pub struct HandshakeWaitGuard {
    sequencer: Arc<dyn HandshakeEffects>,
    name: &'static str,
    version: u32,
}

impl HandshakeWaitGuard {
    /// Register `name` for handshake `version`.
    pub fn acquire(sequencer: Arc<dyn HandshakeEffects>, name: &'static str, version: u32) -> Self {
        sequencer.wait(HandshakeWait::acquire(name, version));
        Self {
            sequencer,
            name,
            version,
        }
    }

    /// Name the wait was registered under.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Handshake version the wait belongs to.
    pub fn version(&self) -> u32 {
        self.version
    }
}

impl std::fmt::Debug for HandshakeWaitGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandshakeWaitGuard")
            .field("name", &self.name)
            .field("version", &self.version)
            .finish()
    }
}

impl Drop for HandshakeWaitGuard {
    fn drop(&mut self) {
        self.sequencer
            .wait(HandshakeWait::release(self.name, self.version));
    }
}

/// Startup wait prepared for one handshake version.
#[derive(Debug)]
pub enum PendingStartupWait {
    /// The decision was already published; nothing was registered
    Ready(StartupDecision),
    /// A wait is registered and released once the decision arrives
    Waiting {
        /// Registered wait
        guard: HandshakeWaitGuard,
        /// Signal carrying the decision
        signal: OneShot<StartupDecision>,
    },
}

impl PendingStartupWait {
    /// Whether a handshake wait was registered.
    pub fn is_registered(&self) -> bool {
        matches!(self, Self::Waiting { .. })
    }

    /// Suspend until the decision is published, then release the wait.
    pub async fn wait(self) -> Result<StartupDecision, DawnError> {
        match self {
            Self::Ready(decision) => Ok(decision),
            Self::Waiting { guard, signal } => {
                let decision = signal.wait().await;
                tracing::debug!(
                    version = guard.version(),
                    "startup details loaded; releasing handshake wait"
                );
                drop(guard);
                decision
            }
        }
    }
}

/// Register the startup wait unless the decision is already published.
///
/// Synchronous so the registration happens before the sequencer can observe
/// its outstanding count drop to zero.
pub fn prepare_startup_wait(
    sequencer: Arc<dyn HandshakeEffects>,
    signal: &OneShot<StartupDecision>,
    version: u32,
) -> PendingStartupWait {
    if let Some(decision) = signal.get() {
        return PendingStartupWait::Ready(decision);
    }
    PendingStartupWait::Waiting {
        guard: HandshakeWaitGuard::acquire(sequencer, STARTUP_WAIT_NAME, version),
        signal: signal.clone(),
    }
}

/// Hold handshake `version` open until the startup decision is published.
pub async fn await_startup(
    sequencer: Arc<dyn HandshakeEffects>,
    signal: &OneShot<StartupDecision>,
    version: u32,
) -> Result<StartupDecision, DawnError> {
    prepare_startup_wait(sequencer, signal, version).wait().await
}
