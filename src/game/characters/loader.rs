// Loading one package file into a resolved character package

use super::info::{CharacterInfo, InfoParseError};
use crate::engine::assets::{AssetResolver, AssetTable, ResolveError};
use crate::engine::package::{self, FormatError};
use log::debug;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Failure to load a single package file
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid package {path}: {source}")]
    Format {
        path: PathBuf,
        #[source]
        source: FormatError,
    },

    #[error("Invalid character info in {path}: {source}")]
    Info {
        path: PathBuf,
        #[source]
        source: InfoParseError,
    },

    #[error("Failed to resolve assets of {path}: {source}")]
    Resolve {
        path: PathBuf,
        #[source]
        source: ResolveError,
    },
}

impl LoadError {
    /// File the failure belongs to
    pub fn path(&self) -> &Path {
        match self {
            LoadError::Io { path, .. }
            | LoadError::Format { path, .. }
            | LoadError::Info { path, .. }
            | LoadError::Resolve { path, .. } => path,
        }
    }
}

/// A fully loaded custom character
#[derive(Debug, Clone)]
pub struct CharacterPackage {
    pub info: CharacterInfo,
    pub prefab_resource_name: String,
    pub animator_resource_name: String,
    pub assets: AssetTable,
}

impl CharacterPackage {
    pub fn name(&self) -> &str {
        &self.info.name
    }

    /// Release every resolved resource through the resolver that produced it
    pub fn unload(self, resolver: &dyn AssetResolver) {
        debug!(
            "Unloading {} resources of '{}'",
            self.assets.len(),
            self.info.name
        );
        for (name, handle) in self.assets {
            resolver.release(&name, &handle);
        }
    }
}

/// Turns package files into resolved character packages
#[derive(Clone)]
pub struct PackageLoader {
    resolver: Arc<dyn AssetResolver>,
}

impl PackageLoader {
    pub fn new(resolver: Arc<dyn AssetResolver>) -> Self {
        Self { resolver }
    }

    pub fn resolver(&self) -> &Arc<dyn AssetResolver> {
        &self.resolver
    }

    /// Load one package file
    ///
    /// Suspends while the file is read and while its assets are resolved.
    /// No retries; every failure carries the file path and its cause.
    pub async fn load<P: AsRef<Path>>(&self, path: P) -> Result<CharacterPackage, LoadError> {
        let path = path.as_ref();

        let bytes = tokio::fs::read(path).await.map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let decoded = package::decode(&bytes).map_err(|source| LoadError::Format {
            path: path.to_path_buf(),
            source,
        })?;

        let info = CharacterInfo::from_json(&decoded.info_json).map_err(|source| LoadError::Info {
            path: path.to_path_buf(),
            source,
        })?;

        debug!(
            "Decoded '{}' by {}, resolving {} byte asset blob",
            info.name,
            info.author,
            decoded.blob.len()
        );

        let assets = self
            .resolver
            .resolve(&decoded.blob)
            .await
            .map_err(|source| LoadError::Resolve {
                path: path.to_path_buf(),
                source,
            })?;

        debug!("Resolved {} resources for '{}'", assets.len(), info.name);

        Ok(CharacterPackage {
            info,
            prefab_resource_name: decoded.prefab_resource_name,
            animator_resource_name: decoded.animator_resource_name,
            assets,
        })
    }
}

impl std::fmt::Debug for PackageLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PackageLoader")
            .field("resolver", &"<AssetResolver>")
            .finish()
    }
}
