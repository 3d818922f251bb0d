//! Domain types shared across the orchestrator.

mod handshake;
mod ids;
mod lifecycle;
mod route;
mod startup;

pub use handshake::{HandshakeState, HandshakeWait};
pub use ids::ConversationId;
pub use lifecycle::{LifecycleState, ServiceAppState, TouchIdState};
pub use route::{NavigationContext, RouteSnapshot, Tab};
pub use startup::{PushLaunch, StartupDecision, StartupSource};
