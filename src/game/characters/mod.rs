// Custom character system
//
// This module contains everything between a package file and a customized player:
// - Character info and animation bindings carried by packages
// - Package loading and the name-keyed registry
// - Customization of live players and their custom content
// - The mod context that answers host events

pub mod animation;
pub mod content;
pub mod context;
pub mod customize;
pub mod info;
pub mod loader;
pub mod player;
pub mod registry;
pub mod roster;
pub mod target;

// Re-export commonly used types
pub use animation::{ActionStateAnim, ActionStateAnims, GameplayMode};
pub use content::CustomContentHolder;
pub use context::{register_character_loader, CharacterLoaderCapability, ModContext, CHARACTER_LOADER};
pub use customize::{CustomizationEngine, CustomizeError, CustomizeOutcome};
pub use info::{AnimationSlot, BindingSet, CharacterInfo, InfoParseError};
pub use loader::{CharacterPackage, LoadError, PackageLoader};
pub use player::PlayerRig;
pub use registry::{CharacterRegistry, LoadSummary, RegistryError};
pub use roster::{append_custom_characters, SelectableCharacter};
pub use target::{CustomizationTarget, Material, SpawnedContent, SpriteRenderer, TargetAnimationState};
