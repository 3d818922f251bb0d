//! Scripted biometric sensor

use async_trait::async_trait;
use dawn_core::effects::{BiometricEffects, BiometricSupport};
use dawn_core::DawnError;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

#[derive(Debug)]
struct Script {
    support: Result<BiometricSupport, DawnError>,
    challenge: Result<(), DawnError>,
}

/// Biometric handler with scripted capability and challenge outcomes.
///
/// Challenges can be paused so tests can fire overlapping triggers while a
/// challenge is in flight.
#[derive(Debug, Clone)]
pub struct MockBiometricHandler {
    script: Arc<Mutex<Script>>,
    prompts: Arc<Mutex<Vec<String>>>,
    paused: Arc<AtomicBool>,
    resume: Arc<Notify>,
    started: Arc<Notify>,
}

impl MockBiometricHandler {
    /// A supported sensor whose challenges succeed
    pub fn supported(label: &str) -> Self {
        Self {
            script: Arc::new(Mutex::new(Script {
                support: Ok(BiometricSupport::Supported {
                    label: label.to_string(),
                }),
                challenge: Ok(()),
            })),
            prompts: Arc::new(Mutex::new(Vec::new())),
            paused: Arc::new(AtomicBool::new(false)),
            resume: Arc::new(Notify::new()),
            started: Arc::new(Notify::new()),
        }
    }

    /// No sensor
    pub fn unsupported() -> Self {
        let handler = Self::supported("");
        handler.script.lock().support = Ok(BiometricSupport::Unsupported);
        handler
    }

    /// Make the capability probe fail
    pub fn with_probe_error(self, error: DawnError) -> Self {
        self.script.lock().support = Err(error);
        self
    }

    /// Script the outcome of every later challenge
    pub fn set_challenge_result(&self, result: Result<(), DawnError>) {
        self.script.lock().challenge = result;
    }

    /// Hold challenges until [`Self::resume_challenge`] is called
    pub fn pause_challenges(&self) {
        self.paused.store(true, Ordering::SeqCst);
    }

    /// Let one paused challenge finish
    pub fn resume_challenge(&self) {
        self.resume.notify_one();
    }

    /// Wait until a challenge has started
    pub async fn challenge_started(&self) {
        self.started.notified().await;
    }

    /// Prompts of every challenge so far
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().clone()
    }

    /// Number of challenges so far
    pub fn challenge_count(&self) -> usize {
        self.prompts.lock().len()
    }
}

#[async_trait]
impl BiometricEffects for MockBiometricHandler {
    async fn is_supported(&self) -> Result<BiometricSupport, DawnError> {
        self.script.lock().support.clone()
    }

    async fn authenticate(&self, prompt: &str) -> Result<(), DawnError> {
        self.prompts.lock().push(prompt.to_string());
        self.started.notify_one();
        if self.paused.load(Ordering::SeqCst) {
            self.resume.notified().await;
        }
        self.script.lock().challenge.clone()
    }
}
