//! Counting boot handshake sequencer.
//!
//! Components that must finish before startup is declared complete register
//! a named wait for the current handshake version and release it later. The
//! handshake is done when a release brings the outstanding count back to
//! zero.

use std::collections::HashMap;

use dawn_core::effects::HandshakeEffects;
use dawn_core::HandshakeWait;
use parking_lot::Mutex;

use crate::events::{AppEvent, EventBus};

#[derive(Debug, Default)]
struct SequencerInner {
    version: Option<u32>,
    counts: HashMap<String, u32>,
    outstanding: u32,
    done: bool,
}

/// In-process [`HandshakeEffects`] implementation driving the boot phase.
#[derive(Debug)]
pub struct BootSequencer {
    events: EventBus,
    inner: Mutex<SequencerInner>,
}

impl BootSequencer {
    /// Create a sequencer with no handshake in progress.
    pub fn new(events: EventBus) -> Self {
        Self {
            events,
            inner: Mutex::new(SequencerInner::default()),
        }
    }

    /// Start handshake `version`, discarding any earlier one.
    pub fn begin(&self, version: u32) {
        {
            let mut inner = self.inner.lock();
            *inner = SequencerInner {
                version: Some(version),
                ..SequencerInner::default()
            };
        }
        tracing::info!(version, "daemon handshake started");
        self.events.emit(AppEvent::DaemonHandshake { version });
    }

    /// Version of the handshake in progress.
    pub fn version(&self) -> Option<u32> {
        self.inner.lock().version
    }

    /// Waits registered and not yet released.
    pub fn outstanding(&self) -> u32 {
        self.inner.lock().outstanding
    }

    /// Whether the current handshake has released every wait.
    pub fn is_done(&self) -> bool {
        self.inner.lock().done
    }
}

impl HandshakeEffects for BootSequencer {
    fn wait(&self, wait: HandshakeWait) {
        let finished = {
            let mut guard = self.inner.lock();
            let inner = &mut *guard;
            if inner.version != Some(wait.version) {
                tracing::warn!(
                    name = %wait.name,
                    version = wait.version,
                    current = ?inner.version,
                    "ignoring wait for stale handshake"
                );
                return;
            }
            if inner.done {
                tracing::warn!(name = %wait.name, version = wait.version, "wait after handshake completed");
                return;
            }

            let count = inner.counts.entry(wait.name.clone()).or_insert(0);
            if wait.increment {
                *count += 1;
                inner.outstanding += 1;
                tracing::debug!(name = %wait.name, version = wait.version, "handshake wait registered");
                false
            } else if *count == 0 {
                tracing::warn!(name = %wait.name, version = wait.version, "unmatched handshake release");
                false
            } else {
                *count -= 1;
                inner.outstanding -= 1;
                tracing::debug!(name = %wait.name, version = wait.version, "handshake wait released");
                if inner.outstanding == 0 {
                    inner.done = true;
                }
                inner.done
            }
        };

        if finished {
            tracing::info!(version = wait.version, "daemon handshake done");
            self.events.emit(AppEvent::DaemonHandshakeDone);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::broadcast::error::TryRecvError;

    #[tokio::test]
    async fn test_done_after_every_wait_released() {
        let events = EventBus::new(16);
        let mut rx = events.subscribe();
        let sequencer = BootSequencer::new(events);

        sequencer.begin(1);
        assert_eq!(rx.recv().await.unwrap(), AppEvent::DaemonHandshake { version: 1 });

        sequencer.wait(HandshakeWait::acquire("a", 1));
        sequencer.wait(HandshakeWait::acquire("b", 1));
        sequencer.wait(HandshakeWait::release("a", 1));
        assert!(!sequencer.is_done());
        assert_eq!(sequencer.outstanding(), 1);
        assert_eq!(rx.try_recv(), Err(TryRecvError::Empty));

        sequencer.wait(HandshakeWait::release("b", 1));
        assert!(sequencer.is_done());
        assert_eq!(rx.recv().await.unwrap(), AppEvent::DaemonHandshakeDone);
    }

    #[tokio::test]
    async fn test_stale_and_unmatched_waits_ignored() {
        let events = EventBus::new(16);
        let sequencer = BootSequencer::new(events);
        sequencer.begin(2);

        sequencer.wait(HandshakeWait::acquire("a", 1));
        assert_eq!(sequencer.outstanding(), 0);

        sequencer.wait(HandshakeWait::acquire("a", 2));
        sequencer.wait(HandshakeWait::release("b", 2));
        assert_eq!(sequencer.outstanding(), 1);
        assert!(!sequencer.is_done());
    }

    #[tokio::test]
    async fn test_begin_resets_counts() {
        let sequencer = BootSequencer::new(EventBus::new(16));
        sequencer.begin(1);
        sequencer.wait(HandshakeWait::acquire("a", 1));
        sequencer.begin(2);
        assert_eq!(sequencer.version(), Some(2));
        assert_eq!(sequencer.outstanding(), 0);
    }
}
