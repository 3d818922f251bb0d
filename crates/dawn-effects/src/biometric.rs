//! Layer 3: Biometric Authentication Effect Handlers
//!
//! Fallback implementation of `BiometricEffects` for platforms without
//! biometric hardware (desktop hosts, CI, headless simulators).
//!
//! **For testing**: Use `MockBiometricHandler` from `dawn-testkit`.
//! **For production with hardware**: Implement a platform-specific handler.

use async_trait::async_trait;
use dawn_core::effects::{BiometricEffects, BiometricSupport};
use dawn_core::DawnError;

/// Fallback biometric handler for platforms without biometric hardware.
///
/// Reports no sensor and rejects every challenge. With this handler the
/// re-authentication gate stays inert because the capability probe never
/// marks the feature as allowed.
#[derive(Debug, Default, Clone)]
pub struct FallbackBiometricHandler;

impl FallbackBiometricHandler {
    /// Create a new fallback biometric handler
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl BiometricEffects for FallbackBiometricHandler {
    async fn is_supported(&self) -> Result<BiometricSupport, DawnError> {
        Ok(BiometricSupport::Unsupported)
    }

    async fn authenticate(&self, _prompt: &str) -> Result<(), DawnError> {
        Err(DawnError::biometric(
            "Biometric authentication not available on this platform handler",
        ))
    }
}
