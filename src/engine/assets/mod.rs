// Package resource resolution
//
// A package embeds its visuals as an opaque blob. An `AssetResolver` turns that
// blob into an `AssetTable`: resource names mapped to capability-tagged handles.

mod handle;
mod resolver;
mod table;

pub use handle::{AnimationController, AssetId, Prefab, ResourceHandle, ResourceKind};
pub use resolver::{AssetResolver, ManifestEntry, ManifestResolver, ResourceManifest};
pub use table::AssetTable;

/// Asset resolution errors
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("Failed to decode embedded assets: {0}")]
    AssetDecodeFailed(String),
}
