use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};
use std::path::PathBuf;
use std::sync::Arc;

use rhythm_character_loader::core::LoaderConfig;
use rhythm_character_loader::engine::assets::ManifestResolver;
use rhythm_character_loader::engine::injector::{
    CapabilityFactories, DeferredInjector, HostRootSlot, SceneNode,
};
use rhythm_character_loader::game::characters::{
    register_character_loader, CustomizeOutcome, ModContext, PlayerRig, SelectableCharacter,
    CHARACTER_LOADER,
};

/// Load custom character packages and dry-run them against headless players
#[derive(Parser, Debug)]
#[command(name = "rhythm-character-loader", version)]
struct Args {
    /// Host data directory holding the Characters folder
    #[arg(default_value = ".")]
    data_root: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logger
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    info!("Starting Rhythm Character Loader...");

    let args = Args::parse();
    let config = LoaderConfig::new(&args.data_root);
    info!("Data root: {}", config.data_root().display());

    // Composition root: one context shared by every host event
    let resolver = Arc::new(ManifestResolver::new());
    let context = Arc::new(ModContext::new(config.clone(), resolver));

    let mut factories = CapabilityFactories::new();
    register_character_loader(&mut factories, &context);

    let injector = Arc::new(DeferredInjector::new(factories, &config));
    injector
        .queue_capability(CHARACTER_LOADER)
        .context("Failed to queue character loader")?;

    let slot = Arc::new(HostRootSlot::new());
    let injection = {
        let injector = Arc::clone(&injector);
        let slot = Arc::clone(&slot);
        tokio::spawn(async move { injector.run_injection(slot.as_ref()).await })
    };

    // Stand-in for the host finishing its scene setup
    let scene = SceneNode::new("GameScene");
    slot.publish(scene.clone());

    let injected = injection
        .await
        .context("Injection task panicked")?
        .context("Injection failed")?;
    info!("Capabilities live on '{}'", injected.name());

    let registry = context.loaded().await;
    info!("Custom characters: {:?}", registry.names());
    if let Some(summary) = context.load_summary() {
        if summary.error_count() > 0 {
            warn!("{} package files were skipped", summary.error_count());
        }
    }

    // Dry run of the host events against headless players
    let mut list = vec![SelectableCharacter::new("Beat")
        .with_prefab("BeatPrefab")
        .with_assist_prefab("BeatAssist")];
    let added = context.build_character_list(&mut list);
    info!("Selection list has {} entries ({} custom)", list.len(), added);

    for name in registry.names() {
        let mut player = PlayerRig::new();
        match context.player_instantiated(&mut player, name) {
            Ok(CustomizeOutcome::Applied) => info!("'{}' applies cleanly", name),
            Ok(CustomizeOutcome::Skipped) => warn!("'{}' was skipped", name),
            Err(e) => warn!("'{}' failed to apply: {}", name, e),
        }
    }

    Ok(())
}
