//! Startup decision model.

use serde::{Deserialize, Serialize};

use super::{ConversationId, RouteSnapshot, Tab};

/// Details extracted from the push notification that launched the app.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushLaunch {
    /// Conversation the notification points at
    pub conversation: Option<ConversationId>,
    /// User the notification asks us to follow
    pub follow_user: Option<String>,
}

/// A resolved candidate for where the app should resume.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartupSource {
    /// App was launched by tapping a push notification
    Push(PushLaunch),
    /// App was launched through a deep link
    DeepLink(String),
    /// Route persisted by the previous session
    PersistedRoute(RouteSnapshot),
}

/// Where the app resumes after a cold start. Resolved once per process.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartupDecision {
    /// Whether the decision came from a push notification
    pub from_push: bool,
    /// Conversation to open
    pub conversation: Option<ConversationId>,
    /// User to open a follow prompt for
    pub follow_user: Option<String>,
    /// Deep link to route
    pub deep_link: Option<String>,
    /// Tab to select
    pub tab: Option<Tab>,
}

impl StartupDecision {
    /// Pick the first present candidate; later candidates never contribute.
    ///
    /// Callers order the candidates by priority. When none is present the
    /// decision is empty.
    pub fn first_match<I>(candidates: I) -> Self
    where
        I: IntoIterator<Item = Option<StartupSource>>,
    {
        candidates
            .into_iter()
            .flatten()
            .next()
            .map(Self::from_source)
            .unwrap_or_default()
    }

    /// Build a decision populated only from `source`.
    pub fn from_source(source: StartupSource) -> Self {
        match source {
            StartupSource::Push(push) => Self {
                from_push: true,
                conversation: push.conversation,
                follow_user: push.follow_user.filter(|user| !user.is_empty()),
                ..Self::default()
            },
            StartupSource::DeepLink(link) => Self {
                deep_link: Some(link),
                ..Self::default()
            },
            StartupSource::PersistedRoute(snapshot) => Self {
                conversation: snapshot.selected_conversation,
                tab: Some(snapshot.tab),
                ..Self::default()
            },
        }
    }

    /// True when no source contributed.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn push() -> StartupSource {
        StartupSource::Push(PushLaunch {
            conversation: Some(ConversationId::new("push-conv")),
            follow_user: Some("alice".into()),
        })
    }

    fn route() -> StartupSource {
        StartupSource::PersistedRoute(RouteSnapshot {
            selected_conversation: Some(ConversationId::new("7")),
            tab: Tab::Chat,
        })
    }

    #[test]
    fn test_first_match_skips_absent() {
        let decision = StartupDecision::first_match([None, None, Some(route())]);
        assert_eq!(decision.tab, Some(Tab::Chat));
        assert_eq!(decision.conversation, Some(ConversationId::new("7")));
        assert!(!decision.from_push);
    }

    #[test]
    fn test_first_match_never_merges() {
        let decision = StartupDecision::first_match([
            None,
            Some(StartupSource::DeepLink("app://conv/42".into())),
            Some(route()),
        ]);
        assert_eq!(decision.deep_link.as_deref(), Some("app://conv/42"));
        assert_eq!(decision.conversation, None);
        assert_eq!(decision.tab, None);
    }

    #[test]
    fn test_push_decision() {
        let decision = StartupDecision::first_match([Some(push()), Some(route())]);
        assert!(decision.from_push);
        assert_eq!(decision.follow_user.as_deref(), Some("alice"));
        assert_eq!(decision.tab, None);
    }

    #[test]
    fn test_empty_follow_user_is_absent() {
        let decision = StartupDecision::from_source(StartupSource::Push(PushLaunch {
            conversation: None,
            follow_user: Some(String::new()),
        }));
        assert!(decision.from_push);
        assert_eq!(decision.follow_user, None);
    }

    #[test]
    fn test_no_candidates() {
        assert!(StartupDecision::first_match([None, None, None]).is_empty());
    }
}
