//! App focus derived from lifecycle transitions.

use dawn_core::{LifecycleState, ServiceAppState};

use crate::events::AppEvent;
use crate::state::PlatformCore;

/// Map a lifecycle state to `(app_focused, service_state)`.
pub fn focus_change(state: LifecycleState) -> (bool, ServiceAppState) {
    (state.is_focused(), state.service_state())
}

/// Record and broadcast the focus implied by `state`.
pub fn update_changed_focus(core: &PlatformCore, state: LifecycleState) {
    let (app_focused, service_state) = focus_change(state);
    tracing::info!(%state, app_focused, %service_state, "app focus changed");
    core.update(|s| s.app_focused = app_focused);
    core.events().emit(AppEvent::ChangedFocus {
        app_focused,
        service_state,
    });
}
