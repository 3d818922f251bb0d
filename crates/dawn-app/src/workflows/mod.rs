//! Boot and lifecycle workflows.
//!
//! Each workflow talks to the platform only through effect traits and to the
//! rest of the app through [`crate::PlatformCore`]. The orchestrator decides
//! when each one runs.

pub mod auth_gate;
pub mod focus;
pub mod handshake;
pub mod reachability;
pub mod route;
pub mod startup;
pub mod touch_id;

pub use auth_gate::{AuthGate, AuthGateState, EvaluationGuard, GateOutcome, GateTrigger};
pub use handshake::{
    await_startup, prepare_startup_wait, HandshakeWaitGuard, PendingStartupWait,
    STARTUP_WAIT_NAME,
};
pub use route::{PendingRouteWrite, RoutePersistence};
pub use startup::{SourceOutcome, StartupResolver};
pub use touch_id::{
    capability_label, load_touch_id_settings, save_touch_id_enabled, TouchIdProbe,
    TouchIdSettings, TOUCH_ID_ENABLED_PATH, TOUCH_ID_WAIT_NAME,
};
