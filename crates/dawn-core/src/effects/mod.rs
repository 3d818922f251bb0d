//! Layer 1: Effect Trait Definitions
//!
//! Pure trait definitions for every external collaborator the orchestrator
//! talks to. This module defines **what** can be asked of the platform;
//! handlers in `dawn-effects` and `dawn-testkit` define **how**.
//!
//! All traits are object safe and used as `Arc<dyn …>` so hosts can plug in
//! platform bindings without generic plumbing.

pub mod biometric;
pub mod handshake;
pub mod launch;
pub mod preference;
pub mod reachability;
pub mod session;
pub mod storage;

pub use biometric::{BiometricEffects, BiometricSupport};
pub use handshake::HandshakeEffects;
pub use launch::LaunchEffects;
pub use preference::{ConfigValue, PreferenceEffects};
pub use reachability::ReachabilityEffects;
pub use session::SessionEffects;
pub use storage::StorageEffects;
