//! # Dawn App - Portable Bootstrap Orchestrator
//!
//! Decides, at process start and on every foreground/background transition,
//! what state the app resumes into and whether biometric re-authentication
//! must be satisfied first.
//!
//! ## Components
//!
//! - **Startup resolver** ([`workflows::startup`]): fork/join over the
//!   persisted route, the launching deep link and the launching push, merged
//!   by priority and published once.
//! - **Handshake waiter** ([`workflows::handshake`]): holds a boot handshake
//!   wait open until the startup decision is published.
//! - **Route persistence** ([`workflows::route`]): last-route snapshot written
//!   on navigation and cleared on logout.
//! - **Auth gate** ([`workflows::auth_gate`]): lifecycle-driven biometric
//!   re-authentication with a re-entrancy guard.
//! - **Touch ID settings** ([`workflows::touch_id`]), **focus**
//!   ([`workflows::focus`]) and **reachability** ([`workflows::reachability`]).
//!
//! [`PlatformOrchestrator`] wires all of them to the [`EventBus`];
//! [`BootSequencer`] is a counting handshake sequencer for hosts that do not
//! bring their own.
//!
//! ## Architecture
//!
//! All platform access goes through the effect traits in `dawn_core::effects`.
//! Production handlers live in `dawn-effects`, mocks in `dawn-testkit`.

#![forbid(unsafe_code)]

pub mod config;
pub mod events;
pub mod logging;
pub mod orchestrator;
pub mod sequencer;
pub mod signal;
pub mod state;
pub mod task_registry;
pub mod workflows;

pub use config::{AppConfig, Platform};
pub use events::{AppEvent, EventBus};
pub use orchestrator::{PlatformHandlers, PlatformOrchestrator};
pub use sequencer::BootSequencer;
pub use signal::OneShot;
pub use state::{PlatformCore, PlatformState};
pub use task_registry::TaskRegistry;

pub use dawn_core::{DawnError, Result};
