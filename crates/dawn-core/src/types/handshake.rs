//! Boot handshake tokens.

use serde::{Deserialize, Serialize};

/// A counting wait registered with the boot sequencer.
///
/// Every `increment: true` for a `(name, version)` pair must be matched by
/// exactly one later `increment: false` for the same pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HandshakeWait {
    /// Name of the waiting component
    pub name: String,
    /// Handshake version the wait belongs to
    pub version: u32,
    /// `true` to register, `false` to release
    pub increment: bool,
}

impl HandshakeWait {
    /// Register a wait.
    pub fn acquire(name: impl Into<String>, version: u32) -> Self {
        Self {
            name: name.into(),
            version,
            increment: true,
        }
    }

    /// Release a previously registered wait.
    pub fn release(name: impl Into<String>, version: u32) -> Self {
        Self {
            name: name.into(),
            version,
            increment: false,
        }
    }
}

/// Progress of the daemon handshake.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum HandshakeState {
    /// No handshake has started
    #[default]
    Starting,
    /// Handshake `version` started; registered waits are outstanding
    WaitingForWaiters {
        /// Handshake version in progress
        version: u32,
    },
    /// All waits released
    Done,
}

impl HandshakeState {
    /// Whether boot has finished.
    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done)
    }
}
