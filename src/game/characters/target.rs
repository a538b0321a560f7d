// Host-facing interface of a player that can receive a custom character

use super::animation::{ActionStateAnim, GameplayMode};
use super::content::CustomContentHolder;
use super::customize::CustomizeError;
use crate::engine::assets::{AnimationController, Prefab};
use glam::Vec3;
use std::sync::Arc;

/// Suffix hosts commonly append to the names of instantiated objects
pub const DEFAULT_INSTANTIATION_SUFFIX: &str = "(Clone)";

/// Shared rendering material
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Material {
    pub name: String,
}

impl Material {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// A sprite-rendering component
#[derive(Debug, Clone, PartialEq)]
pub struct SpriteRenderer {
    /// Path of the renderer inside its subtree
    pub path: String,
    pub material: Option<Material>,
    pub enabled: bool,
}

impl SpriteRenderer {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            material: None,
            enabled: true,
        }
    }
}

/// Content instantiated from a spawnable prefab
#[derive(Debug, Clone, PartialEq)]
pub struct SpawnedContent {
    pub name: String,
    pub local_scale: Vec3,
    /// Every sprite renderer in the content's subtree
    pub sprite_renderers: Vec<SpriteRenderer>,
}

impl SpawnedContent {
    /// Build content for a prefab, named the way the host names instances
    pub fn instantiate(prefab: &Prefab, suffix: &str) -> Self {
        Self {
            name: format!("{}{}", prefab.name, suffix),
            local_scale: Vec3::ONE,
            sprite_renderers: prefab
                .sprite_renderers
                .iter()
                .map(SpriteRenderer::new)
                .collect(),
        }
    }
}

/// Animation state of a player: per-mode action states and the flip flag
pub trait TargetAnimationState {
    fn set_action_state(&mut self, mode: GameplayMode, anim: ActionStateAnim);

    fn action_state(&self, mode: GameplayMode) -> &ActionStateAnim;

    /// Whether the player's sprite is currently flipped horizontally
    fn sprite_flip_x(&self) -> bool;
}

/// A live player that a custom character can be applied to
pub trait CustomizationTarget: TargetAnimationState {
    /// Suffix the host appends to instantiated object names
    fn instantiation_suffix(&self) -> &str {
        DEFAULT_INSTANTIATION_SUFFIX
    }

    /// Instantiate a prefab as a child of the player's visual root
    fn instantiate(&mut self, prefab: &Prefab) -> SpawnedContent;

    /// The player's custom content holder, created if absent
    fn content_holder(&mut self) -> &mut CustomContentHolder;

    /// Install a controller on the player's in-host animator
    fn install_controller(
        &mut self,
        controller: Arc<AnimationController>,
    ) -> Result<(), CustomizeError>;

    /// Material of the player's base sprite renderer, if it has one
    fn base_sprite_material(&self) -> Option<Material>;

    /// Re-run animator initialization so new bindings take effect
    fn reinitialize_animator(&mut self);

    fn set_base_sprite_enabled(&mut self, enabled: bool);

    /// Mirror the sprite flip flag onto custom content, once per frame
    ///
    /// Returns whether the content was updated.
    fn sync_content(&mut self) -> bool {
        let flip_x = self.sprite_flip_x();
        self.content_holder().tick(flip_x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instantiate_content() {
        let prefab = Prefab {
            name: "RoboPrefab".into(),
            sprite_renderers: vec!["Body".into(), "Body/Head".into()],
        };

        let content = SpawnedContent::instantiate(&prefab, DEFAULT_INSTANTIATION_SUFFIX);
        assert_eq!(content.name, "RoboPrefab(Clone)");
        assert_eq!(content.local_scale, Vec3::ONE);
        assert_eq!(content.sprite_renderers.len(), 2);
        assert!(content.sprite_renderers.iter().all(|r| r.enabled && r.material.is_none()));
    }
}
