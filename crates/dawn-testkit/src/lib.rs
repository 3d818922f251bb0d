//! Dawn Testing Infrastructure
//!
//! Stateful mock handlers for every effect trait in `dawn-core`. Each mock
//! records what it was asked to do and can be scripted to fail, so tests can
//! assert on call counts and ordering without platform bindings.
//!
//! # Usage
//!
//! ```toml
//! [dev-dependencies]
//! dawn-testkit = { path = "../dawn-testkit" }
//! ```

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(missing_docs)]

pub mod biometric;
pub mod handshake;
pub mod launch;
pub mod preference;
pub mod reachability;
pub mod session;
pub mod storage;

pub use biometric::MockBiometricHandler;
pub use handshake::RecordingSequencer;
pub use launch::MockLaunchHandler;
pub use preference::MockPreferenceHandler;
pub use reachability::ManualReachability;
pub use session::MockSessionHandler;
pub use storage::MemoryStorageHandler;
