//! Recording boot sequencer

use dawn_core::effects::HandshakeEffects;
use dawn_core::HandshakeWait;
use parking_lot::Mutex;
use std::sync::Arc;

/// Sequencer that records every wait it receives.
#[derive(Debug, Clone, Default)]
pub struct RecordingSequencer {
    waits: Arc<Mutex<Vec<HandshakeWait>>>,
}

impl RecordingSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every wait in arrival order
    pub fn waits(&self) -> Vec<HandshakeWait> {
        self.waits.lock().clone()
    }

    /// Registrations for `name`
    pub fn increments(&self, name: &str) -> usize {
        self.count(name, true)
    }

    /// Releases for `name`
    pub fn decrements(&self, name: &str) -> usize {
        self.count(name, false)
    }

    /// Registrations minus releases across all names
    pub fn outstanding(&self) -> i64 {
        self.waits
            .lock()
            .iter()
            .map(|w| if w.increment { 1 } else { -1 })
            .sum()
    }

    fn count(&self, name: &str, increment: bool) -> usize {
        self.waits
            .lock()
            .iter()
            .filter(|w| w.name == name && w.increment == increment)
            .count()
    }
}

impl HandshakeEffects for RecordingSequencer {
    fn wait(&self, wait: HandshakeWait) {
        self.waits.lock().push(wait);
    }
}
