//! # Dawn Effects - Layer 3: Production Handlers
//!
//! Stateless handlers implementing the effect traits from `dawn-core` for
//! hosts that do not bring their own platform bindings.
//!
//! **Layer Constraint**: NO mock handlers - those belong in `dawn-testkit`.
//!
//! - [`FilesystemStorageHandler`]: one JSON file per key
//! - [`FallbackBiometricHandler`]: reports no sensor, rejects every challenge
//! - [`ColdLaunchHandler`]: launch sources supplied by the host at startup
//! - [`LocalPreferenceHandler`]: preferences kept in local storage
//! - [`LocalSessionHandler`]: logout without a daemon

#![forbid(unsafe_code)]

pub mod biometric;
pub mod launch;
pub mod preference;
pub mod session;
pub mod storage;

pub use biometric::FallbackBiometricHandler;
pub use launch::ColdLaunchHandler;
pub use preference::LocalPreferenceHandler;
pub use session::LocalSessionHandler;
pub use storage::FilesystemStorageHandler;
