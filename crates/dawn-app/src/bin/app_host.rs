//! Minimal host stub intended for downstream bindings (Swift/Android/etc.).
//! This binary is guarded by the `host` feature. It boots the orchestrator
//! against the local handlers from `dawn-effects`, runs one boot handshake
//! and prints the resolved startup decision as JSON.
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Parser;
use dawn_app::logging::init_tracing;
use dawn_app::{
    AppConfig, AppEvent, BootSequencer, Platform, PlatformCore, PlatformHandlers,
    PlatformOrchestrator,
};
use dawn_core::effects::StorageEffects;
use dawn_effects::{
    ColdLaunchHandler, FallbackBiometricHandler, FilesystemStorageHandler,
    LocalPreferenceHandler, LocalSessionHandler,
};
use tokio::sync::broadcast::error::RecvError;

#[derive(Debug, Parser)]
#[command(name = "app-host", about = "Run one boot handshake and print the startup decision")]
struct Args {
    /// TOML config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory for persisted state
    #[arg(long)]
    storage_dir: Option<PathBuf>,

    /// Deep link the app was launched with
    #[arg(long)]
    link: Option<String>,

    /// Host platform (ios, android)
    #[arg(long)]
    platform: Option<Platform>,

    /// Handshake version to run
    #[arg(long, default_value_t = 1)]
    handshake_version: u32,

    /// Seconds to wait for the handshake to finish
    #[arg(long, default_value_t = 5)]
    timeout_secs: u64,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = AppConfig::load(args.config.as_deref()).context("loading config")?;
    if let Some(dir) = args.storage_dir {
        config.storage_dir = dir;
    }
    if let Some(platform) = args.platform {
        config.platform = platform;
    }
    config.validate()?;
    init_tracing(&config.log_filter);

    let core = PlatformCore::new(config.clone());
    let storage: Arc<dyn StorageEffects> =
        Arc::new(FilesystemStorageHandler::new(&config.storage_dir));
    let mut launch = ColdLaunchHandler::new();
    if let Some(link) = args.link {
        launch = launch.with_link(link);
    }
    let sequencer = Arc::new(BootSequencer::new(core.events().clone()));

    let handlers = PlatformHandlers {
        storage: storage.clone(),
        launch: Arc::new(launch),
        biometric: Arc::new(FallbackBiometricHandler::new()),
        preferences: Arc::new(LocalPreferenceHandler::new(storage)),
        session: Arc::new(LocalSessionHandler::new()),
        sequencer: sequencer.clone(),
        reachability: None,
    };
    let orchestrator = PlatformOrchestrator::new(core.clone(), handlers);

    let mut events = core.events().subscribe();
    orchestrator.start()?;
    sequencer.begin(args.handshake_version);

    let finished = tokio::time::timeout(Duration::from_secs(args.timeout_secs), async {
        loop {
            match events.recv().await {
                Ok(AppEvent::DaemonHandshakeDone) => return true,
                Ok(_) | Err(RecvError::Lagged(_)) => {}
                Err(RecvError::Closed) => return false,
            }
        }
    })
    .await
    .unwrap_or(false);
    if !finished {
        orchestrator.shutdown();
        bail!("boot handshake did not finish");
    }

    let decision = core
        .startup()
        .get()
        .context("handshake finished without a startup decision")?;
    println!("{}", serde_json::to_string_pretty(&decision)?);

    orchestrator.shutdown();
    Ok(())
}
