// Applying a loaded custom character to a live player

use super::animation::{ActionStateAnim, ActionStateAnims, GameplayMode};
use super::info::{BindingSet, CharacterInfo};
use super::registry::CharacterRegistry;
use super::target::{CustomizationTarget, TargetAnimationState};
use crate::engine::assets::{AnimationController, AssetTable, Prefab, ResourceHandle, ResourceKind};
use log::{info, warn};
use std::sync::Arc;

/// Customization errors
///
/// Resource errors are raised before the target is touched. A missing target
/// capability can surface after instantiation and is not rolled back.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CustomizeError {
    #[error("Resource '{name}' not found in package assets")]
    MissingResource { name: String },

    #[error("Resource '{name}' has kind {actual}, expected {expected}")]
    WrongResourceType {
        name: String,
        expected: ResourceKind,
        actual: ResourceKind,
    },

    #[error("Target has no {0}")]
    MissingTargetCapability(&'static str),
}

/// What `customize` did with the target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CustomizeOutcome {
    /// The name is not a registered custom character; nothing changed
    Skipped,
    Applied,
}

/// Binding set of a character for one gameplay mode
pub fn bindings_for(info: &CharacterInfo, mode: GameplayMode) -> &BindingSet {
    match mode {
        GameplayMode::Default => &info.default_bindings,
        GameplayMode::Brawl => &info.brawl_bindings,
        GameplayMode::Running => &info.running_bindings,
        GameplayMode::Falling => &info.falling_bindings,
    }
}

fn lookup<'a>(
    assets: &'a AssetTable,
    name: &str,
    expected: ResourceKind,
) -> Result<&'a ResourceHandle, CustomizeError> {
    let handle = assets
        .get(name)
        .ok_or_else(|| CustomizeError::MissingResource {
            name: name.to_string(),
        })?;

    let actual = handle.kind();
    if actual != expected {
        return Err(CustomizeError::WrongResourceType {
            name: name.to_string(),
            expected,
            actual,
        });
    }
    Ok(handle)
}

fn resolve_prefab(assets: &AssetTable, name: &str) -> Result<Arc<Prefab>, CustomizeError> {
    let handle = lookup(assets, name, ResourceKind::SpawnablePrefab)?;
    handle
        .as_prefab()
        .cloned()
        .ok_or_else(|| CustomizeError::MissingResource {
            name: name.to_string(),
        })
}

fn resolve_controller(
    assets: &AssetTable,
    name: &str,
) -> Result<Arc<AnimationController>, CustomizeError> {
    let handle = lookup(assets, name, ResourceKind::AnimationController)?;
    handle
        .as_animation_controller()
        .cloned()
        .ok_or_else(|| CustomizeError::MissingResource {
            name: name.to_string(),
        })
}

/// Applies registered characters to players
///
/// Borrows the registry, so it can only exist once the load batch is done.
#[derive(Debug, Clone, Copy)]
pub struct CustomizationEngine<'a> {
    registry: &'a CharacterRegistry,
}

impl<'a> CustomizationEngine<'a> {
    pub fn new(registry: &'a CharacterRegistry) -> Self {
        Self { registry }
    }

    /// Replace the target's visuals and animation bindings with a custom character
    ///
    /// Unknown names are skipped without touching the target.
    pub fn customize(
        &self,
        target: &mut dyn CustomizationTarget,
        character_name: &str,
    ) -> Result<CustomizeOutcome, CustomizeError> {
        let Some(package) = self.registry.get(character_name) else {
            info!("'{}' is not a custom character, skipping", character_name);
            return Ok(CustomizeOutcome::Skipped);
        };

        // Everything fallible about the package is checked before mutation
        let prefab = resolve_prefab(&package.assets, &package.prefab_resource_name)?;
        let controller = resolve_controller(&package.assets, &package.animator_resource_name)?;

        info!("Applying custom character '{}'...", character_name);

        let suffix = target.instantiation_suffix().to_string();
        let mut content = target.instantiate(&prefab);
        if !suffix.is_empty() {
            if let Some(stripped) = content.name.strip_suffix(suffix.as_str()) {
                content.name = stripped.to_string();
            }
        }
        target.content_holder().bind(content);

        target.install_controller(Arc::clone(&controller))?;

        let mut anims = ActionStateAnims::default();
        for mode in GameplayMode::ALL {
            let anim = ActionStateAnim::from(bindings_for(&package.info, mode));
            anims.set(mode, anim.clone());
            target.set_action_state(mode, anim);
        }

        if package.info.overwrite_all_sprite_renderer_materials {
            match target.base_sprite_material() {
                Some(material) => {
                    if let Some(content) = target.content_holder().content_mut() {
                        for renderer in &mut content.sprite_renderers {
                            renderer.material = Some(material.clone());
                        }
                    }
                }
                None => warn!(
                    "'{}' asks to overwrite materials but the player has no base sprite renderer",
                    character_name
                ),
            }
        }

        target.reinitialize_animator();

        for clip in &controller.clips {
            info!("Clip: {}", clip);
        }
        let unbound = unbound_clips(&anims, &controller);
        if !unbound.is_empty() {
            warn!(
                "Controller '{}' has no clips named: {}",
                controller.name,
                unbound.join(", ")
            );
        }

        target.set_base_sprite_enabled(false);

        info!("Applied custom character '{}'", character_name);
        Ok(CustomizeOutcome::Applied)
    }
}

/// Clips the bindings reference that the controller does not provide
fn unbound_clips<'a>(anims: &'a ActionStateAnims, controller: &AnimationController) -> Vec<&'a str> {
    anims
        .referenced_clips()
        .into_iter()
        .filter(|clip| !controller.clips.iter().any(|c| c == clip))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::characters::loader::CharacterPackage;
    use crate::game::characters::player::PlayerRig;
    use crate::game::characters::target::Material;
    use approx::assert_relative_eq;
    use std::path::Path;

    fn robo_info() -> CharacterInfo {
        let mut info = CharacterInfo {
            name: "Robo".into(),
            author: "Tester".into(),
            ..CharacterInfo::default()
        };
        info.default_bindings.idle = "RoboIdle".into();
        info.brawl_bindings = BindingSet {
            intro: "BrawlIntro".into(),
            intro_duration: 1.25,
            air_block: "BrawlAirBlock".into(),
            ground_block: "BrawlGroundBlock".into(),
            idle: "BrawlIdle".into(),
            side_switch: "BrawlSwitch".into(),
            high_attacks: vec!["BrawlHigh1".into(), "BrawlHigh2".into()],
            low_attacks: vec!["BrawlLow1".into()],
            jumps: vec![],
            lands: vec!["BrawlLand".into()],
            hurts: vec!["BrawlHurt".into()],
            has_slams: true,
            ignore_slams: true,
            slam_attacks: vec!["BrawlSlam".into()],
        };
        info.running_bindings.jumps = vec!["RunJump1".into(), "RunJump2".into()];
        info.falling_bindings.intro_duration = 0.0;
        info.falling_bindings.hurts = vec![];
        info
    }

    fn robo_assets() -> AssetTable {
        let mut assets = AssetTable::new();
        assets.insert(
            "RoboPrefab",
            ResourceHandle::SpawnablePrefab(Arc::new(Prefab {
                name: "RoboPrefab".into(),
                sprite_renderers: vec!["Body".into(), "Body/Head".into()],
            })),
        );
        assets.insert(
            "RoboAnim",
            ResourceHandle::AnimationController(Arc::new(AnimationController {
                name: "RoboAnim".into(),
                clips: vec!["RoboIdle".into(), "Intro".into()],
            })),
        );
        assets
    }

    fn registry_with(info: CharacterInfo, assets: AssetTable) -> CharacterRegistry {
        let mut registry = CharacterRegistry::new();
        registry
            .insert(
                CharacterPackage {
                    info,
                    prefab_resource_name: "RoboPrefab".into(),
                    animator_resource_name: "RoboAnim".into(),
                    assets,
                },
                Path::new("robo.ubcharacter"),
            )
            .unwrap();
        registry
    }

    #[test]
    fn test_customize_robo() {
        let info = robo_info();
        let registry = registry_with(info.clone(), robo_assets());
        let engine = CustomizationEngine::new(&registry);
        let mut player = PlayerRig::new();

        let outcome = engine.customize(&mut player, "Robo").unwrap();
        assert_eq!(outcome, CustomizeOutcome::Applied);

        assert_eq!(player.controller().unwrap().name, "RoboAnim");
        assert_eq!(player.animator_initializations(), 1);
        assert!(!player.base_sprite().unwrap().enabled);

        let content = player.content().unwrap();
        assert_eq!(content.name, "RoboPrefab");
        assert_eq!(content.sprite_renderers.len(), 2);

        for mode in GameplayMode::ALL {
            assert_eq!(
                player.action_state(mode),
                &ActionStateAnim::from(bindings_for(&info, mode))
            );
        }
    }

    #[test]
    fn test_binding_sets_copied_field_for_field() {
        let info = robo_info();
        let registry = registry_with(info.clone(), robo_assets());
        let mut player = PlayerRig::new();
        CustomizationEngine::new(&registry)
            .customize(&mut player, "Robo")
            .unwrap();

        for mode in GameplayMode::ALL {
            let source = bindings_for(&info, mode);
            let anim = player.action_state(mode);
            assert_eq!(anim.intro, source.intro);
            assert_eq!(anim.intro_duration, source.intro_duration);
            assert_eq!(anim.air_block, source.air_block);
            assert_eq!(anim.ground_block, source.ground_block);
            assert_eq!(anim.idle, source.idle);
            assert_eq!(anim.side_switch, source.side_switch);
            assert_eq!(anim.high_attacks, source.high_attacks);
            assert_eq!(anim.low_attacks, source.low_attacks);
            assert_eq!(anim.jumps, source.jumps);
            assert_eq!(anim.lands, source.lands);
            assert_eq!(anim.hurts, source.hurts);
            assert_eq!(anim.has_slams, source.has_slams);
            assert_eq!(anim.ignore_slams, source.ignore_slams);
            assert_eq!(anim.slam_attacks, source.slam_attacks);
        }
    }

    #[test]
    fn test_unknown_character_leaves_target_unchanged() {
        let registry = registry_with(robo_info(), robo_assets());
        let mut player = PlayerRig::new();
        let before = player.clone();

        let outcome = CustomizationEngine::new(&registry)
            .customize(&mut player, "Beat")
            .unwrap();

        assert_eq!(outcome, CustomizeOutcome::Skipped);
        assert_eq!(player, before);
    }

    #[test]
    fn test_missing_prefab_leaves_target_unchanged() {
        let mut assets = AssetTable::new();
        assets.insert(
            "RoboAnim",
            ResourceHandle::AnimationController(Arc::new(AnimationController {
                name: "RoboAnim".into(),
                clips: vec![],
            })),
        );
        let registry = registry_with(robo_info(), assets);
        let mut player = PlayerRig::new();
        let before = player.clone();

        let err = CustomizationEngine::new(&registry)
            .customize(&mut player, "Robo")
            .unwrap_err();

        assert_eq!(
            err,
            CustomizeError::MissingResource {
                name: "RoboPrefab".into()
            }
        );
        assert_eq!(player, before);
    }

    #[test]
    fn test_mistyped_animator_leaves_target_unchanged() {
        let mut assets = robo_assets();
        assets.insert(
            "RoboAnim",
            ResourceHandle::SpawnablePrefab(Arc::new(Prefab {
                name: "RoboAnim".into(),
                sprite_renderers: vec![],
            })),
        );
        let registry = registry_with(robo_info(), assets);
        let mut player = PlayerRig::new();
        let before = player.clone();

        let err = CustomizationEngine::new(&registry)
            .customize(&mut player, "Robo")
            .unwrap_err();

        assert_eq!(
            err,
            CustomizeError::WrongResourceType {
                name: "RoboAnim".into(),
                expected: ResourceKind::AnimationController,
                actual: ResourceKind::SpawnablePrefab,
            }
        );
        assert_eq!(player, before);
    }

    #[test]
    fn test_missing_animator_is_not_rolled_back() {
        let registry = registry_with(robo_info(), robo_assets());
        let mut player = PlayerRig::new().without_animator();

        let err = CustomizationEngine::new(&registry)
            .customize(&mut player, "Robo")
            .unwrap_err();

        assert_eq!(err, CustomizeError::MissingTargetCapability("animator"));
        // Content was instantiated before the failure and stays in place
        assert!(player.content().is_some());
        assert!(player.base_sprite().unwrap().enabled);
    }

    #[test]
    fn test_overwrite_materials() {
        let mut info = robo_info();
        info.overwrite_all_sprite_renderer_materials = true;
        let registry = registry_with(info, robo_assets());
        let mut player = PlayerRig::new().with_base_material(Material::new("Outline"));

        CustomizationEngine::new(&registry)
            .customize(&mut player, "Robo")
            .unwrap();

        let content = player.content().unwrap();
        assert!(content
            .sprite_renderers
            .iter()
            .all(|r| r.material == Some(Material::new("Outline"))));
    }

    #[test]
    fn test_materials_untouched_without_flag() {
        let registry = registry_with(robo_info(), robo_assets());
        let mut player = PlayerRig::new();

        CustomizationEngine::new(&registry)
            .customize(&mut player, "Robo")
            .unwrap();

        let content = player.content().unwrap();
        assert!(content.sprite_renderers.iter().all(|r| r.material.is_none()));
    }

    #[test]
    fn test_overwrite_materials_without_base_sprite() {
        let mut info = robo_info();
        info.overwrite_all_sprite_renderer_materials = true;
        let registry = registry_with(info, robo_assets());
        let mut player = PlayerRig::new().without_base_sprite();

        let outcome = CustomizationEngine::new(&registry)
            .customize(&mut player, "Robo")
            .unwrap();

        assert_eq!(outcome, CustomizeOutcome::Applied);
        let content = player.content().unwrap();
        assert!(content.sprite_renderers.iter().all(|r| r.material.is_none()));
    }

    #[test]
    fn test_content_follows_flip_after_customize() {
        let registry = registry_with(robo_info(), robo_assets());
        let mut player = PlayerRig::new();
        CustomizationEngine::new(&registry)
            .customize(&mut player, "Robo")
            .unwrap();

        player.set_sprite_flip_x(true);
        assert!(player.tick());
        assert_relative_eq!(player.content().unwrap().local_scale.x, -1.0);
        assert!(!player.tick());
    }

    #[test]
    fn test_unbound_clips() {
        let mut anims = ActionStateAnims::default();
        anims.set(
            GameplayMode::Default,
            ActionStateAnim {
                intro: "Intro".into(),
                idle: "RoboIdle".into(),
                high_attacks: vec!["RoboHigh".into()],
                ..ActionStateAnim::default()
            },
        );
        anims.set(
            GameplayMode::Brawl,
            ActionStateAnim {
                idle: "RoboIdle".into(),
                ..ActionStateAnim::default()
            },
        );
        let controller = AnimationController {
            name: "RoboAnim".into(),
            clips: vec!["RoboIdle".into(), "Intro".into()],
        };

        assert_eq!(unbound_clips(&anims, &controller), vec!["RoboHigh"]);
    }

    #[test]
    fn test_error_display() {
        let err = CustomizeError::WrongResourceType {
            name: "RoboAnim".into(),
            expected: ResourceKind::AnimationController,
            actual: ResourceKind::SpawnablePrefab,
        };
        assert_eq!(
            err.to_string(),
            "Resource 'RoboAnim' has kind spawnable-prefab, expected animation-controller"
        );
    }
}
