//! Identifiers

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque conversation identifier as handed out by the chat service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConversationId(String);

impl ConversationId {
    /// Wrap a raw conversation key.
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Borrow the raw key.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConversationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ConversationId {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

impl From<String> for ConversationId {
    fn from(key: String) -> Self {
        Self(key)
    }
}
