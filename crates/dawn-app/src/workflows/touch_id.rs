//! Biometric capability probe and unlock preference.

use std::sync::Arc;

use dawn_core::effects::{
    BiometricEffects, BiometricSupport, ConfigValue, HandshakeEffects, PreferenceEffects,
};

use super::handshake::HandshakeWaitGuard;
use crate::config::Platform;
use crate::events::AppEvent;
use crate::state::PlatformCore;

/// Wait name registered while the probe runs.
pub const TOUCH_ID_WAIT_NAME: &str = "platform.specific.touchid";

/// Daemon config path of the unlock preference.
pub const TOUCH_ID_ENABLED_PATH: &str = "ui.touchIDEnabled";

/// Label reported for any supported Android sensor.
pub const ANDROID_SENSOR_LABEL: &str = "biometric sensor";

/// Outcome of the capability probe.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TouchIdSettings {
    /// Sensor label; empty when unsupported
    pub allowed_by_system: String,
    /// User preference
    pub enabled: bool,
}

/// Human-readable label for the sensor, empty when there is none.
pub fn capability_label(platform: Platform, support: &BiometricSupport) -> String {
    match (platform, support) {
        (_, BiometricSupport::Unsupported) => String::new(),
        (Platform::Android, BiometricSupport::Supported { .. }) => ANDROID_SENSOR_LABEL.to_string(),
        (Platform::Ios, BiometricSupport::Supported { label }) => label.clone(),
    }
}

/// Probe the sensor and read the preference, then publish both.
///
/// A failed probe counts as unsupported and a failed preference read as
/// disabled. The preference is published with `write_to_config: false`.
pub async fn load_touch_id_settings(
    core: &PlatformCore,
    biometric: &dyn BiometricEffects,
    preferences: &dyn PreferenceEffects,
) -> TouchIdSettings {
    let (support, preference) = tokio::join!(
        biometric.is_supported(),
        preferences.get_value(TOUCH_ID_ENABLED_PATH)
    );

    let support = support.unwrap_or_else(|error| {
        tracing::warn!(%error, "biometric capability probe failed");
        BiometricSupport::Unsupported
    });
    let enabled = match preference {
        Ok(value) => value.as_bool(),
        Err(error) => {
            tracing::warn!(%error, path = TOUCH_ID_ENABLED_PATH, "failed to read unlock preference");
            false
        }
    };

    let settings = TouchIdSettings {
        allowed_by_system: capability_label(core.config().platform, &support),
        enabled,
    };
    tracing::info!(
        allowed_by_system = %settings.allowed_by_system,
        enabled,
        "touch id settings loaded"
    );

    core.update(|s| {
        s.touch_id_allowed_by_system = settings.allowed_by_system.clone();
        s.touch_id_enabled = settings.enabled;
    });
    core.events().emit(AppEvent::TouchIdAllowedBySystem {
        label: settings.allowed_by_system.clone(),
    });
    core.events().emit(AppEvent::TouchIdEnabled {
        enabled,
        write_to_config: false,
    });
    settings
}

/// Write the unlock preference back to the daemon. Failures are logged.
pub async fn save_touch_id_enabled(preferences: &dyn PreferenceEffects, enabled: bool) {
    if let Err(error) = preferences
        .set_value(TOUCH_ID_ENABLED_PATH, ConfigValue::bool(enabled))
        .await
    {
        tracing::warn!(%error, enabled, "failed to save unlock preference");
    }
}

/// Capability probe holding a handshake wait until it has published.
pub struct TouchIdProbe {
    core: PlatformCore,
    biometric: Arc<dyn BiometricEffects>,
    preferences: Arc<dyn PreferenceEffects>,
    guard: HandshakeWaitGuard,
}

impl TouchIdProbe {
    /// Register the probe's wait for handshake `version`.
    pub fn register(
        core: PlatformCore,
        biometric: Arc<dyn BiometricEffects>,
        preferences: Arc<dyn PreferenceEffects>,
        sequencer: Arc<dyn HandshakeEffects>,
        version: u32,
    ) -> Self {
        Self {
            core,
            biometric,
            preferences,
            guard: HandshakeWaitGuard::acquire(sequencer, TOUCH_ID_WAIT_NAME, version),
        }
    }

    /// Run the probe and release the wait.
    pub async fn run(self) -> TouchIdSettings {
        let settings =
            load_touch_id_settings(&self.core, self.biometric.as_ref(), self.preferences.as_ref())
                .await;
        drop(self.guard);
        settings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AppConfig;
    use dawn_core::{DawnError, HandshakeWait};
    use dawn_testkit::{MockBiometricHandler, MockPreferenceHandler, RecordingSequencer};

    fn core(platform: Platform) -> PlatformCore {
        PlatformCore::new(AppConfig {
            platform,
            ..AppConfig::default()
        })
    }

    #[test]
    fn test_capability_label() {
        let face = BiometricSupport::Supported {
            label: "FaceID".into(),
        };
        assert_eq!(capability_label(Platform::Ios, &face), "FaceID");
        assert_eq!(capability_label(Platform::Android, &face), ANDROID_SENSOR_LABEL);
        assert_eq!(capability_label(Platform::Ios, &BiometricSupport::Unsupported), "");
        assert_eq!(capability_label(Platform::Android, &BiometricSupport::Unsupported), "");
    }

    #[tokio::test]
    async fn test_load_publishes_settings() {
        let core = core(Platform::Ios);
        let mut rx = core.events().subscribe();
        let biometric = MockBiometricHandler::supported("TouchID");
        let preferences = MockPreferenceHandler::new().with_bool(TOUCH_ID_ENABLED_PATH, true);

        let settings = load_touch_id_settings(&core, &biometric, &preferences).await;
        assert_eq!(settings.allowed_by_system, "TouchID");
        assert!(settings.enabled);
        assert!(core.snapshot().touch_id_active());

        assert_eq!(
            rx.recv().await.unwrap(),
            AppEvent::TouchIdAllowedBySystem {
                label: "TouchID".into()
            }
        );
        assert_eq!(
            rx.recv().await.unwrap(),
            AppEvent::TouchIdEnabled {
                enabled: true,
                write_to_config: false,
            }
        );
    }

    #[tokio::test]
    async fn test_failures_disable() {
        let core = core(Platform::Android);
        let biometric =
            MockBiometricHandler::supported("x").with_probe_error(DawnError::biometric("sensor busy"));
        let preferences = MockPreferenceHandler::new().with_bool(TOUCH_ID_ENABLED_PATH, true);
        preferences.fail_reads(true);

        let settings = load_touch_id_settings(&core, &biometric, &preferences).await;
        assert_eq!(settings, TouchIdSettings::default());
        assert!(preferences.writes().is_empty());
    }

    #[tokio::test]
    async fn test_missing_preference_is_disabled() {
        let core = core(Platform::Android);
        let settings = load_touch_id_settings(
            &core,
            &MockBiometricHandler::supported("x"),
            &MockPreferenceHandler::new(),
        )
        .await;
        assert_eq!(settings.allowed_by_system, ANDROID_SENSOR_LABEL);
        assert!(!settings.enabled);
    }

    #[tokio::test]
    async fn test_probe_holds_handshake_wait() {
        let sequencer = RecordingSequencer::new();
        let probe = TouchIdProbe::register(
            core(Platform::Ios),
            Arc::new(MockBiometricHandler::unsupported()),
            Arc::new(MockPreferenceHandler::new()),
            Arc::new(sequencer.clone()),
            4,
        );
        assert_eq!(sequencer.outstanding(), 1);

        probe.run().await;
        assert_eq!(
            sequencer.waits(),
            vec![
                HandshakeWait::acquire(TOUCH_ID_WAIT_NAME, 4),
                HandshakeWait::release(TOUCH_ID_WAIT_NAME, 4),
            ]
        );
    }

    #[tokio::test]
    async fn test_save_writes_preference() {
        let preferences = MockPreferenceHandler::new();
        save_touch_id_enabled(&preferences, true).await;
        assert_eq!(
            preferences.writes(),
            vec![(TOUCH_ID_ENABLED_PATH.to_string(), ConfigValue::bool(true))]
        );
    }
}
