// Asset resolution: turning a package's embedded blob into named resources

use super::handle::{AnimationController, AssetId, Prefab, ResourceHandle, ResourceKind};
use super::table::AssetTable;
use super::ResolveError;
use async_trait::async_trait;
use log::debug;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Service that decodes an embedded resource blob
///
/// Resolution may suspend any number of times while the blob is streamed.
#[async_trait]
pub trait AssetResolver: Send + Sync {
    /// Decode a blob into a table of named resources
    async fn resolve(&self, blob: &[u8]) -> Result<AssetTable, ResolveError>;

    /// Release a resource previously produced by `resolve`
    fn release(&self, _name: &str, _handle: &ResourceHandle) {}
}

/// One entry of a resource manifest
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub name: String,
    pub kind: ResourceKind,
    /// Clip names (animation controllers)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub clips: Vec<String>,
    /// Sprite renderer paths (prefabs)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sprite_renderers: Vec<String>,
}

/// Blob layout understood by `ManifestResolver`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResourceManifest {
    pub resources: Vec<ManifestEntry>,
}

impl ResourceManifest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an animation controller with the given clips
    pub fn with_controller(mut self, name: &str, clips: &[&str]) -> Self {
        self.resources.push(ManifestEntry {
            name: name.to_string(),
            kind: ResourceKind::AnimationController,
            clips: clips.iter().map(|c| c.to_string()).collect(),
            sprite_renderers: Vec::new(),
        });
        self
    }

    /// Add a spawnable prefab with the given sprite renderers
    pub fn with_prefab(mut self, name: &str, sprite_renderers: &[&str]) -> Self {
        self.resources.push(ManifestEntry {
            name: name.to_string(),
            kind: ResourceKind::SpawnablePrefab,
            clips: Vec::new(),
            sprite_renderers: sprite_renderers.iter().map(|r| r.to_string()).collect(),
        });
        self
    }

    /// Add a resource of any other kind
    pub fn with_other(mut self, name: &str, kind: &str) -> Self {
        self.resources.push(ManifestEntry {
            name: name.to_string(),
            kind: ResourceKind::Other(kind.to_string()),
            clips: Vec::new(),
            sprite_renderers: Vec::new(),
        });
        self
    }

    /// Serialize into a blob suitable for embedding in a package
    pub fn to_blob(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }
}

/// Headless resolver for blobs holding a JSON `ResourceManifest`
///
/// Used by tools and tests; a running host plugs in its own bundle service.
#[derive(Debug, Default)]
pub struct ManifestResolver {
    released: AtomicUsize,
}

impl ManifestResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of resources released so far
    pub fn released_count(&self) -> usize {
        self.released.load(Ordering::Relaxed)
    }

    fn handle_for(entry: ManifestEntry) -> ResourceHandle {
        match entry.kind {
            ResourceKind::AnimationController => {
                ResourceHandle::AnimationController(Arc::new(AnimationController {
                    name: entry.name,
                    clips: entry.clips,
                }))
            }
            ResourceKind::SpawnablePrefab => ResourceHandle::SpawnablePrefab(Arc::new(Prefab {
                name: entry.name,
                sprite_renderers: entry.sprite_renderers,
            })),
            ResourceKind::Other(kind) => ResourceHandle::Other {
                id: AssetId::from_name(&entry.name),
                kind,
            },
        }
    }
}

#[async_trait]
impl AssetResolver for ManifestResolver {
    async fn resolve(&self, blob: &[u8]) -> Result<AssetTable, ResolveError> {
        let manifest: ResourceManifest = serde_json::from_slice(blob)
            .map_err(|e| ResolveError::AssetDecodeFailed(format!("invalid manifest: {}", e)))?;

        let mut table = AssetTable::new();
        for entry in manifest.resources {
            // One suspension per streamed resource
            tokio::task::yield_now().await;

            debug!("Resolved resource '{}' ({})", entry.name, entry.kind);
            let name = entry.name.clone();
            table.insert(name, Self::handle_for(entry));
        }

        Ok(table)
    }

    fn release(&self, name: &str, _handle: &ResourceHandle) {
        debug!("Released resource '{}'", name);
        self.released.fetch_add(1, Ordering::Relaxed);
    }
}
