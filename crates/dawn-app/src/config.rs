//! Orchestrator configuration
//!
//! Defaults, then a TOML file, then `DAWN_*` environment variables, then
//! validation.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use dawn_core::DawnError;
use serde::{Deserialize, Serialize};

/// Persistence key of the route snapshot.
pub const DEFAULT_ROUTE_STATE_KEY: &str = "routeState";

/// Prompt shown by the biometric challenge.
pub const DEFAULT_BIOMETRIC_PROMPT: &str = "Authentication is required to gain access";

const ENV_PREFIX: &str = "DAWN_";

/// Mobile platform the host runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// iOS: the sensor reports its own label (Touch ID, Face ID)
    #[default]
    Ios,
    /// Android: the sensor is reported generically
    Android,
}

impl FromStr for Platform {
    type Err = DawnError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ios" => Ok(Platform::Ios),
            "android" => Ok(Platform::Android),
            other => Err(DawnError::invalid(format!("unknown platform: {other}"))),
        }
    }
}

/// Orchestrator configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Host platform
    pub platform: Platform,
    /// Directory used by file-backed handlers
    pub storage_dir: PathBuf,
    /// Persistence key of the route snapshot
    pub route_state_key: String,
    /// Prompt for the biometric challenge
    pub biometric_prompt: String,
    /// Capacity of the app event bus
    pub event_capacity: usize,
    /// Default tracing filter when `RUST_LOG` is unset
    pub log_filter: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            platform: Platform::default(),
            storage_dir: PathBuf::from("./dawn-data"),
            route_state_key: DEFAULT_ROUTE_STATE_KEY.to_string(),
            biometric_prompt: DEFAULT_BIOMETRIC_PROMPT.to_string(),
            event_capacity: 256,
            log_filter: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Parse a TOML document. Missing fields keep their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self, DawnError> {
        toml::from_str(content).map_err(|e| DawnError::invalid(format!("Invalid TOML: {e}")))
    }

    /// Load from a TOML file.
    pub fn load_from_file(path: &Path) -> Result<Self, DawnError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            DawnError::invalid(format!(
                "Failed to read config file {}: {e}",
                path.display()
            ))
        })?;
        Self::from_toml_str(&content)
    }

    /// Apply `DAWN_*` overrides from the process environment.
    pub fn merge_with_env(&mut self) -> Result<(), DawnError> {
        self.merge_with_vars(std::env::vars())
    }

    /// Apply `DAWN_*` overrides from an explicit variable list.
    pub fn merge_with_vars<I, K, V>(&mut self, vars: I) -> Result<(), DawnError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        for (key, value) in vars {
            let Some(name) = key.as_ref().strip_prefix(ENV_PREFIX) else {
                continue;
            };
            let value = value.into();
            match name {
                "PLATFORM" => self.platform = value.parse()?,
                "STORAGE_DIR" => self.storage_dir = PathBuf::from(value),
                "LOG" => self.log_filter = value,
                _ => {}
            }
        }
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), DawnError> {
        if self.route_state_key.trim().is_empty() {
            return Err(DawnError::invalid("route_state_key must not be empty"));
        }
        if self.event_capacity == 0 {
            return Err(DawnError::invalid("event_capacity must be at least 1"));
        }
        if self.biometric_prompt.trim().is_empty() {
            return Err(DawnError::invalid("biometric_prompt must not be empty"));
        }
        Ok(())
    }

    /// Defaults, optional file, environment, validation.
    pub fn load(path: Option<&Path>) -> Result<Self, DawnError> {
        let mut config = match path {
            Some(path) => Self::load_from_file(path)?,
            None => Self::default(),
        };
        config.merge_with_env()?;
        config.validate()?;
        Ok(config)
    }
}
