// Headless player rig that custom characters can be applied to

use super::animation::{ActionStateAnim, ActionStateAnims, GameplayMode};
use super::content::CustomContentHolder;
use super::customize::CustomizeError;
use super::target::{
    CustomizationTarget, Material, SpawnedContent, SpriteRenderer, TargetAnimationState,
};
use crate::engine::assets::{AnimationController, Prefab};
use std::sync::Arc;

/// Name of the material a fresh rig's base sprite uses
pub const DEFAULT_SPRITE_MATERIAL: &str = "Sprites-Default";

/// The player's in-host animator
#[derive(Debug, Clone, PartialEq, Default)]
pub struct HostAnimator {
    pub controller: Option<Arc<AnimationController>>,
    /// How many times the animator has been (re)initialized
    pub initializations: u32,
}

/// In-memory player
///
/// Mirrors the parts of a host player that customization touches: the
/// animator, the four action states, the flip flag, the base sprite renderer
/// and the custom content holder.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerRig {
    animator: Option<HostAnimator>,
    action_states: ActionStateAnims,
    sprite_flip_x: bool,
    base_sprite: Option<SpriteRenderer>,
    content_holder: Option<CustomContentHolder>,
    suffix: String,
}

impl Default for PlayerRig {
    fn default() -> Self {
        Self::new()
    }
}

impl PlayerRig {
    /// A rig with an animator and a base sprite using the default material
    pub fn new() -> Self {
        let mut base_sprite = SpriteRenderer::new("Sprite");
        base_sprite.material = Some(Material::new(DEFAULT_SPRITE_MATERIAL));

        Self {
            animator: Some(HostAnimator::default()),
            action_states: ActionStateAnims::default(),
            sprite_flip_x: false,
            base_sprite: Some(base_sprite),
            content_holder: None,
            suffix: super::target::DEFAULT_INSTANTIATION_SUFFIX.to_string(),
        }
    }

    pub fn without_animator(mut self) -> Self {
        self.animator = None;
        self
    }

    pub fn without_base_sprite(mut self) -> Self {
        self.base_sprite = None;
        self
    }

    pub fn with_base_material(mut self, material: Material) -> Self {
        if let Some(sprite) = self.base_sprite.as_mut() {
            sprite.material = Some(material);
        }
        self
    }

    pub fn with_instantiation_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    pub fn controller(&self) -> Option<&Arc<AnimationController>> {
        self.animator.as_ref().and_then(|a| a.controller.as_ref())
    }

    pub fn animator_initializations(&self) -> u32 {
        self.animator.as_ref().map_or(0, |a| a.initializations)
    }

    pub fn base_sprite(&self) -> Option<&SpriteRenderer> {
        self.base_sprite.as_ref()
    }

    pub fn set_sprite_flip_x(&mut self, flip_x: bool) {
        self.sprite_flip_x = flip_x;
    }

    /// Custom content bound to the rig, if any
    pub fn content(&self) -> Option<&SpawnedContent> {
        self.content_holder.as_ref().and_then(|h| h.content())
    }

    /// Advance one frame, mirroring the flip flag onto custom content
    pub fn tick(&mut self) -> bool {
        if self.content_holder.is_none() {
            return false;
        }
        self.sync_content()
    }
}

impl TargetAnimationState for PlayerRig {
    fn set_action_state(&mut self, mode: GameplayMode, anim: ActionStateAnim) {
        self.action_states.set(mode, anim);
    }

    fn action_state(&self, mode: GameplayMode) -> &ActionStateAnim {
        self.action_states.get(mode)
    }

    fn sprite_flip_x(&self) -> bool {
        self.sprite_flip_x
    }
}

impl CustomizationTarget for PlayerRig {
    fn instantiation_suffix(&self) -> &str {
        &self.suffix
    }

    fn instantiate(&mut self, prefab: &Prefab) -> SpawnedContent {
        SpawnedContent::instantiate(prefab, &self.suffix)
    }

    fn content_holder(&mut self) -> &mut CustomContentHolder {
        self.content_holder.get_or_insert_with(CustomContentHolder::new)
    }

    fn install_controller(
        &mut self,
        controller: Arc<AnimationController>,
    ) -> Result<(), CustomizeError> {
        let animator = self
            .animator
            .as_mut()
            .ok_or(CustomizeError::MissingTargetCapability("animator"))?;
        animator.controller = Some(controller);
        Ok(())
    }

    fn base_sprite_material(&self) -> Option<Material> {
        self.base_sprite.as_ref().and_then(|s| s.material.clone())
    }

    fn reinitialize_animator(&mut self) {
        if let Some(animator) = self.animator.as_mut() {
            animator.initializations += 1;
        }
    }

    fn set_base_sprite_enabled(&mut self, enabled: bool) {
        if let Some(sprite) = self.base_sprite.as_mut() {
            sprite.enabled = enabled;
        }
    }
}
