//! Dawn Core - Bootstrap Orchestrator Foundation
//!
//! This crate provides the domain types and effect interfaces shared by the
//! Dawn bootstrap orchestrator. It contains no orchestration logic and no
//! platform bindings.
//!
//! # Architecture Layers
//!
//! ## Domain Types
//! - `StartupDecision`: where the app resumes after a cold start
//! - `RouteSnapshot`: the persisted "last route" summary
//! - `HandshakeWait`: counting token exchanged with the boot sequencer
//! - `LifecycleState`, `TouchIdState`: lifecycle and re-authentication states
//!
//! ## Effect Interfaces (Pure Signatures)
//! - `StorageEffects`: string key-value persistence
//! - `LaunchEffects`: deep-link and push-launch producers
//! - `BiometricEffects`: capability probe and challenge
//! - `PreferenceEffects`: daemon-backed user preferences
//! - `HandshakeEffects`: boot sequencer wait tokens
//! - `SessionEffects`: daemon logout
//! - `ReachabilityEffects`: connection-change notifications
//!
//! Handlers live in `dawn-effects` (production) and `dawn-testkit` (mocks).

#![forbid(unsafe_code)]

/// Pure effect interfaces (no implementations)
pub mod effects;

/// Unified error handling
pub mod errors;

/// Domain types
pub mod types;

pub use errors::{DawnError, Result};
pub use types::{
    ConversationId, HandshakeState, HandshakeWait, LifecycleState, NavigationContext,
    PushLaunch, RouteSnapshot, ServiceAppState, StartupDecision, StartupSource, Tab,
    TouchIdState,
};
