//! Biometric Authentication Effects
//!
//! Interface to the platform biometric sensor (Touch ID, Face ID, Android
//! BiometricPrompt). The orchestrator only needs a capability probe and a
//! single challenge; enrollment and template management stay with the OS.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::DawnError;

/// Result of probing the biometric sensor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BiometricSupport {
    /// A sensor is present and enrolled
    Supported {
        /// Platform label for the sensor, e.g. `"FaceID"`
        label: String,
    },
    /// No usable sensor
    Unsupported,
}

impl BiometricSupport {
    /// Whether a sensor is usable.
    pub fn is_supported(&self) -> bool {
        matches!(self, Self::Supported { .. })
    }
}

/// Biometric effects interface
///
/// # Implementation Notes
///
/// - Production: platform bindings (LocalAuthentication, BiometricPrompt)
/// - Fallback: `dawn_effects::FallbackBiometricHandler` reports no sensor
/// - Testing: `dawn_testkit::MockBiometricHandler` with scripted outcomes
#[async_trait]
pub trait BiometricEffects: Send + Sync {
    /// Check whether the device supports biometric authentication.
    async fn is_supported(&self) -> Result<BiometricSupport, DawnError>;

    /// Run a challenge showing `prompt`.
    ///
    /// Denial, cancellation and sensor errors are all reported as `Err`.
    async fn authenticate(&self, prompt: &str) -> Result<(), DawnError>;
}
