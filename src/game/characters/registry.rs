// Registry of loaded custom characters

use super::loader::{CharacterPackage, LoadError, PackageLoader};
use crate::engine::assets::AssetResolver;
use log::{error, info, warn};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Registry errors, recorded per file during a load batch
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error("Duplicate character name '{name}': first at {first}, second at {second}")]
    DuplicateName {
        name: String,
        first: PathBuf,
        second: PathBuf,
    },

    #[error("Failed to access character directory {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Outcome of a load batch
#[derive(Debug, Default)]
pub struct LoadSummary {
    /// Directory that was searched
    pub directory: PathBuf,
    /// Whether the directory had to be created
    pub created_directory: bool,
    /// Names registered by this batch, in load order
    pub loaded: Vec<String>,
    /// Per-file failures; none of them stop the batch
    pub errors: Vec<RegistryError>,
}

impl LoadSummary {
    pub fn loaded_count(&self) -> usize {
        self.loaded.len()
    }

    pub fn error_count(&self) -> usize {
        self.errors.len()
    }
}

/// Name-keyed store of loaded character packages
///
/// Filled by `load_all` during startup and read-only afterwards.
/// Name collisions keep the first package and report `DuplicateName`.
#[derive(Debug, Default)]
pub struct CharacterRegistry {
    characters: HashMap<String, CharacterPackage>,
    sources: HashMap<String, PathBuf>,
}

impl CharacterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load every package file in `directory`, one file at a time
    ///
    /// A missing directory is created and yields an empty batch.
    pub async fn load_all(
        &mut self,
        loader: &PackageLoader,
        directory: &Path,
        extension: &str,
    ) -> LoadSummary {
        let mut summary = LoadSummary {
            directory: directory.to_path_buf(),
            ..LoadSummary::default()
        };

        info!("Searching for characters in {}...", directory.display());

        if !tokio::fs::try_exists(directory).await.unwrap_or(false) {
            match tokio::fs::create_dir_all(directory).await {
                Ok(()) => {
                    summary.created_directory = true;
                    warn!("No characters found! Created {}", directory.display());
                }
                Err(source) => {
                    error!("Failed to create {}: {}", directory.display(), source);
                    summary.errors.push(RegistryError::Io {
                        path: directory.to_path_buf(),
                        source,
                    });
                }
            }
            return summary;
        }

        let files = match Self::package_files(directory, extension).await {
            Ok(files) => files,
            Err(source) => {
                error!("Failed to list {}: {}", directory.display(), source);
                summary.errors.push(RegistryError::Io {
                    path: directory.to_path_buf(),
                    source,
                });
                return summary;
            }
        };

        if files.is_empty() {
            warn!("No characters found!");
            return summary;
        }

        for path in files {
            info!("Loading character in file {}", path.display());

            let result = match loader.load(&path).await {
                Ok(package) => match self.duplicate_of(package.name(), &path) {
                    Some(err) => {
                        // The rejected package never enters the registry, so release it now
                        package.unload(loader.resolver().as_ref());
                        Err(err)
                    }
                    None => self.insert(package, &path),
                },
                Err(e) => Err(e.into()),
            };

            match result {
                Ok(name) => summary.loaded.push(name),
                Err(e) => {
                    error!("Failed to load character file, error: {}", e);
                    summary.errors.push(e);
                }
            }
        }

        info!(
            "Loaded {} characters ({} failed) from {}",
            summary.loaded_count(),
            summary.error_count(),
            directory.display()
        );
        summary
    }

    /// Package files in a directory, sorted by path
    async fn package_files(directory: &Path, extension: &str) -> std::io::Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        let mut entries = tokio::fs::read_dir(directory).await?;

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            let matches_extension = path
                .extension()
                .map(|ext| ext.to_string_lossy().eq_ignore_ascii_case(extension))
                .unwrap_or(false);

            if matches_extension && entry.file_type().await?.is_file() {
                files.push(path);
            }
        }

        files.sort();
        Ok(files)
    }

    fn duplicate_of(&self, name: &str, source: &Path) -> Option<RegistryError> {
        self.sources
            .get(name)
            .map(|first| RegistryError::DuplicateName {
                name: name.to_string(),
                first: first.clone(),
                second: source.to_path_buf(),
            })
    }

    /// Register a package; the first package with a given name wins
    ///
    /// A rejected package is dropped without releasing its resources.
    /// `load_all` releases them through its loader.
    pub fn insert(
        &mut self,
        package: CharacterPackage,
        source: &Path,
    ) -> Result<String, RegistryError> {
        let name = package.name().to_string();

        if let Some(err) = self.duplicate_of(&name, source) {
            return Err(err);
        }

        self.sources.insert(name.clone(), source.to_path_buf());
        self.characters.insert(name.clone(), package);
        Ok(name)
    }

    /// Get a character by name
    pub fn get(&self, name: &str) -> Option<&CharacterPackage> {
        self.characters.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.characters.contains_key(name)
    }

    /// File a character was loaded from
    pub fn source(&self, name: &str) -> Option<&Path> {
        self.sources.get(name).map(PathBuf::as_path)
    }

    /// Registered names in sorted order
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.characters.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.characters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.characters.is_empty()
    }

    /// Remove every package and release its resources
    pub fn unload_all(&mut self, resolver: &dyn AssetResolver) {
        self.sources.clear();
        for (_, package) in self.characters.drain() {
            package.unload(resolver);
        }
    }
}
