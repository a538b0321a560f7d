// Typed handles to resolved package resources

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Unique identifier for a resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AssetId(pub(crate) u64);

impl AssetId {
    /// Create a new asset ID from a resource name
    pub fn from_name(name: &str) -> Self {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();
        name.hash(&mut hasher);
        Self(hasher.finish())
    }
}

/// Capability tag carried by every resolved resource
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResourceKind {
    AnimationController,
    SpawnablePrefab,
    #[serde(untagged)]
    Other(String),
}

impl ResourceKind {
    pub fn as_str(&self) -> &str {
        match self {
            ResourceKind::AnimationController => "animation-controller",
            ResourceKind::SpawnablePrefab => "spawnable-prefab",
            ResourceKind::Other(kind) => kind,
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Animation controller: the set of clips the host animator can play
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnimationController {
    pub name: String,
    pub clips: Vec<String>,
}

/// Spawnable prefab: a content subtree the host can instantiate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prefab {
    pub name: String,
    /// Paths of the sprite renderers inside the prefab's subtree
    pub sprite_renderers: Vec<String>,
}

/// Handle to a resolved resource
///
/// Handles are cheap to clone; the underlying resource is shared.
#[derive(Debug, Clone)]
pub enum ResourceHandle {
    AnimationController(Arc<AnimationController>),
    SpawnablePrefab(Arc<Prefab>),
    Other { kind: String, id: AssetId },
}

impl ResourceHandle {
    pub fn kind(&self) -> ResourceKind {
        match self {
            ResourceHandle::AnimationController(_) => ResourceKind::AnimationController,
            ResourceHandle::SpawnablePrefab(_) => ResourceKind::SpawnablePrefab,
            ResourceHandle::Other { kind, .. } => ResourceKind::Other(kind.clone()),
        }
    }

    pub fn as_animation_controller(&self) -> Option<&Arc<AnimationController>> {
        match self {
            ResourceHandle::AnimationController(controller) => Some(controller),
            _ => None,
        }
    }

    pub fn as_prefab(&self) -> Option<&Arc<Prefab>> {
        match self {
            ResourceHandle::SpawnablePrefab(prefab) => Some(prefab),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asset_id_from_name() {
        let id1 = AssetId::from_name("RoboPrefab");
        let id2 = AssetId::from_name("RoboPrefab");
        let id3 = AssetId::from_name("RoboAnim");

        assert_eq!(id1, id2, "Same names should produce same IDs");
        assert_ne!(id1, id3, "Different names should produce different IDs");
    }

    #[test]
    fn test_resource_kind_tags() {
        assert_eq!(ResourceKind::AnimationController.to_string(), "animation-controller");
        assert_eq!(ResourceKind::SpawnablePrefab.to_string(), "spawnable-prefab");
        assert_eq!(ResourceKind::Other("texture".into()).to_string(), "texture");
    }

    #[test]
    fn test_resource_kind_serde() {
        let kind: ResourceKind = serde_json::from_str(r#""spawnable-prefab""#).unwrap();
        assert_eq!(kind, ResourceKind::SpawnablePrefab);

        let kind: ResourceKind = serde_json::from_str(r#""audio-clip""#).unwrap();
        assert_eq!(kind, ResourceKind::Other("audio-clip".into()));
    }

    #[test]
    fn test_handle_accessors() {
        let handle = ResourceHandle::AnimationController(Arc::new(AnimationController {
            name: "RoboAnim".into(),
            clips: vec!["Idle".into()],
        }));

        assert_eq!(handle.kind(), ResourceKind::AnimationController);
        assert!(handle.as_animation_controller().is_some());
        assert!(handle.as_prefab().is_none());
    }
}
