//! Boot handshake sequencer effects

use crate::HandshakeWait;

/// Counting gate that delays declaring startup complete.
///
/// `wait` is a synchronous dispatch so it can be called from drop guards;
/// implementations must not block.
pub trait HandshakeEffects: Send + Sync {
    /// Register or release a wait.
    fn wait(&self, wait: HandshakeWait);
}
