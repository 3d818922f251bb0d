//! App lifecycle and re-authentication states.

use serde::{Deserialize, Serialize};
use std::fmt;

/// OS-level app state, delivered on every lifecycle transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LifecycleState {
    /// In the foreground and receiving events
    #[default]
    Active,
    /// Not visible
    Background,
    /// Visible but not receiving events (system UI, incoming call)
    Inactive,
}

impl LifecycleState {
    /// Whether the user can currently interact with the app.
    pub fn is_focused(&self) -> bool {
        matches!(self, Self::Active)
    }

    /// App state reported to the backend service.
    pub fn service_state(&self) -> ServiceAppState {
        match self {
            Self::Active => ServiceAppState::Foreground,
            Self::Background => ServiceAppState::Background,
            Self::Inactive => ServiceAppState::Inactive,
        }
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Active => f.write_str("active"),
            Self::Background => f.write_str("background"),
            Self::Inactive => f.write_str("inactive"),
        }
    }
}

/// App state as understood by the backend service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceAppState {
    /// Foreground
    Foreground,
    /// Background
    Background,
    /// Inactive
    Inactive,
}

impl fmt::Display for ServiceAppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Foreground => f.write_str("foreground"),
            Self::Background => f.write_str("background"),
            Self::Inactive => f.write_str("inactive"),
        }
    }
}

/// Published state of the biometric re-authentication gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TouchIdState {
    /// No gate has been evaluated yet
    #[default]
    Idle,
    /// A lock screen should be shown
    Asking,
    /// The sensor challenge is in flight
    Authenticating,
    /// The gate has been satisfied (or the user was logged out)
    Done,
}
