//! Navigation tabs and the persisted route snapshot.
//!
//! The snapshot is the only piece of navigation state that survives a process
//! restart. It is written on every navigation change while logged in and read
//! exactly once during boot.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::ConversationId;
use crate::DawnError;

/// Top-level navigation tabs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tab {
    /// People / activity feed
    People,
    /// Chat inbox and conversations
    Chat,
    /// File browser
    Files,
    /// Teams
    Teams,
    /// Wallets
    Wallets,
    /// Git repositories
    Git,
    /// Device management
    Devices,
    /// Settings
    Settings,
    /// Login flow; never a valid place to resume into
    Login,
}

impl Tab {
    /// Tabs the app may resume into after a restart.
    pub const VALID_INITIAL: [Tab; 8] = [
        Tab::People,
        Tab::Chat,
        Tab::Files,
        Tab::Teams,
        Tab::Wallets,
        Tab::Git,
        Tab::Devices,
        Tab::Settings,
    ];

    /// Wire name of the tab.
    pub fn as_str(&self) -> &'static str {
        match self {
            Tab::People => "people",
            Tab::Chat => "chat",
            Tab::Files => "files",
            Tab::Teams => "teams",
            Tab::Wallets => "wallets",
            Tab::Git => "git",
            Tab::Devices => "devices",
            Tab::Settings => "settings",
            Tab::Login => "login",
        }
    }

    /// Whether the app may resume into this tab.
    pub fn is_valid_initial(&self) -> bool {
        Self::VALID_INITIAL.contains(self)
    }

    /// Parse a route segment, keeping it only if it names a valid initial tab.
    pub fn parse_initial(segment: &str) -> Option<Tab> {
        segment
            .parse::<Tab>()
            .ok()
            .filter(|tab| tab.is_valid_initial())
    }
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tab {
    type Err = DawnError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "people" => Ok(Tab::People),
            "chat" => Ok(Tab::Chat),
            "files" => Ok(Tab::Files),
            "teams" => Ok(Tab::Teams),
            "wallets" => Ok(Tab::Wallets),
            "git" => Ok(Tab::Git),
            "devices" => Ok(Tab::Devices),
            "settings" => Ok(Tab::Settings),
            "login" => Ok(Tab::Login),
            other => Err(DawnError::invalid(format!("unknown tab: {other}"))),
        }
    }
}

/// Where the user currently is in the navigation tree.
///
/// `route_path` is the list of route segments from the root; its first entry
/// names the active tab. A chat path of depth one is the inbox list, anything
/// deeper means a specific conversation is open.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavigationContext {
    /// Route segments from the root
    pub route_path: Vec<String>,
    /// Conversation currently selected in the chat store
    pub selected_conversation: Option<ConversationId>,
}

impl NavigationContext {
    /// Build a context from route segments and the selected conversation.
    pub fn new<S: Into<String>>(
        route_path: impl IntoIterator<Item = S>,
        selected_conversation: Option<ConversationId>,
    ) -> Self {
        Self {
            route_path: route_path.into_iter().map(Into::into).collect(),
            selected_conversation,
        }
    }

    /// The first route segment, if any.
    pub fn current_tab(&self) -> Option<&str> {
        self.route_path.first().map(String::as_str)
    }
}

/// Persisted "last route" summary.
///
/// Stored as `{"selectedConversationIDKey": string|null, "tab": string}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteSnapshot {
    /// Open conversation, only when the chat tab shows a conversation
    #[serde(rename = "selectedConversationIDKey", default)]
    pub selected_conversation: Option<ConversationId>,
    /// Active top-level tab
    pub tab: Tab,
}

impl RouteSnapshot {
    /// Summarize a navigation context.
    ///
    /// Returns `None` when the active tab is not a valid initial tab, in which
    /// case any previously persisted snapshot should be cleared.
    pub fn from_navigation(context: &NavigationContext) -> Option<Self> {
        let tab = context.current_tab().and_then(Tab::parse_initial)?;
        let in_conversation = tab == Tab::Chat && context.route_path.len() > 1;
        Some(Self {
            selected_conversation: if in_conversation {
                context.selected_conversation.clone()
            } else {
                None
            },
            tab,
        })
    }

    /// Encode for storage.
    pub fn encode(&self) -> Result<String, DawnError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Decode a stored payload.
    ///
    /// A JSON `null` decodes to `Ok(None)`. A payload naming a tab the app
    /// cannot resume into is rejected like any other malformed payload.
    pub fn decode(raw: &str) -> Result<Option<Self>, DawnError> {
        let snapshot: Option<RouteSnapshot> = serde_json::from_str(raw)?;
        match snapshot {
            Some(snapshot) if !snapshot.tab.is_valid_initial() => Err(DawnError::invalid(
                format!("tab {} is not a valid initial tab", snapshot.tab),
            )),
            other => Ok(other),
        }
    }
}
