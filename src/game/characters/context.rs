// Mod context: owns the loaded characters and answers host events

use super::customize::{CustomizationEngine, CustomizeError, CustomizeOutcome};
use super::loader::PackageLoader;
use super::registry::{CharacterRegistry, LoadSummary};
use super::roster::{append_custom_characters, SelectableCharacter};
use super::target::CustomizationTarget;
use crate::core::LoaderConfig;
use crate::engine::assets::AssetResolver;
use crate::engine::injector::{Capability, CapabilityFactories, CapabilityTag, HostObject};
use log::{debug, info, warn};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::watch;

/// Tag of the capability that starts character loading
pub const CHARACTER_LOADER: CapabilityTag = CapabilityTag::new("character-loader");

/// Result of the load batch, published as a unit
#[derive(Debug, Clone)]
struct Published {
    registry: Arc<CharacterRegistry>,
    summary: Arc<LoadSummary>,
}

/// Context passed to every inbound host event
///
/// The registry is published once, after the load batch completes. Until then
/// events see no registry and leave the host untouched, so customization can
/// never observe a half-filled registry.
pub struct ModContext {
    config: LoaderConfig,
    loader: PackageLoader,
    load_started: AtomicBool,
    published: watch::Sender<Option<Published>>,
}

impl ModContext {
    pub fn new(config: LoaderConfig, resolver: Arc<dyn AssetResolver>) -> Self {
        let (published, _) = watch::channel(None);
        Self {
            config,
            loader: PackageLoader::new(resolver),
            load_started: AtomicBool::new(false),
            published,
        }
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// Run the load batch and publish the registry
    ///
    /// Only the first call loads; later calls return `None`. The summary stays
    /// readable through `load_summary` after the batch.
    pub async fn load_characters(&self) -> Option<Arc<LoadSummary>> {
        if self.load_started.swap(true, Ordering::SeqCst) {
            debug!("Characters are already loading");
            return None;
        }

        let mut registry = CharacterRegistry::new();
        let summary = registry
            .load_all(
                &self.loader,
                &self.config.characters_path(),
                self.config.extension(),
            )
            .await;

        let summary = Arc::new(summary);
        self.published.send_replace(Some(Published {
            registry: Arc::new(registry),
            summary: Arc::clone(&summary),
        }));
        Some(summary)
    }

    /// The registry, once the load batch has completed
    pub fn registry(&self) -> Option<Arc<CharacterRegistry>> {
        self.published
            .borrow()
            .as_ref()
            .map(|published| Arc::clone(&published.registry))
    }

    /// Diagnostics of the completed load batch
    pub fn load_summary(&self) -> Option<Arc<LoadSummary>> {
        self.published
            .borrow()
            .as_ref()
            .map(|published| Arc::clone(&published.summary))
    }

    /// Wait for the load batch to complete
    pub async fn loaded(&self) -> Arc<CharacterRegistry> {
        let mut receiver = self.published.subscribe();

        loop {
            let current = receiver.borrow_and_update().clone();
            if let Some(published) = current {
                return published.registry;
            }
            if receiver.changed().await.is_err() {
                std::future::pending::<()>().await;
            }
        }
    }

    /// Inbound event: the host spawned a player for the chosen character
    pub fn player_instantiated(
        &self,
        target: &mut dyn CustomizationTarget,
        character_name: &str,
    ) -> Result<CustomizeOutcome, CustomizeError> {
        let Some(registry) = self.registry() else {
            warn!(
                "Player '{}' spawned before characters finished loading, skipping",
                character_name
            );
            return Ok(CustomizeOutcome::Skipped);
        };

        CustomizationEngine::new(&registry).customize(target, character_name)
    }

    /// Inbound event: the host is building its selectable character list
    ///
    /// Returns how many custom characters were appended.
    pub fn build_character_list(&self, list: &mut Vec<SelectableCharacter>) -> usize {
        let Some(registry) = self.registry() else {
            warn!("Character list requested before characters finished loading");
            return 0;
        };

        let added = append_custom_characters(
            list,
            &registry.names(),
            self.config.baseline_character_hint(),
        );
        info!("Added {} custom characters to the selection list", added);
        added
    }
}

impl std::fmt::Debug for ModContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModContext")
            .field("config", &self.config)
            .field("loaded", &self.published.borrow().is_some())
            .finish()
    }
}

/// Capability that starts the load batch when attached to the host
pub struct CharacterLoaderCapability {
    context: Arc<ModContext>,
}

impl CharacterLoaderCapability {
    pub fn new(context: Arc<ModContext>) -> Self {
        Self { context }
    }
}

impl Capability for CharacterLoaderCapability {
    fn tag(&self) -> CapabilityTag {
        CHARACTER_LOADER
    }

    fn awake(&self, host: &Arc<dyn HostObject>) {
        info!("Character loader attached to '{}'", host.name());

        let context = Arc::clone(&self.context);
        tokio::spawn(async move {
            context.load_characters().await;
        });
    }
}

/// Register the character loader factory for `context`
pub fn register_character_loader(factories: &mut CapabilityFactories, context: &Arc<ModContext>) {
    let context = Arc::clone(context);
    factories.register(CHARACTER_LOADER, move || {
        Arc::new(CharacterLoaderCapability::new(Arc::clone(&context)))
    });
}
