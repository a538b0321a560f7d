// Name-keyed table of resolved resources

use super::handle::ResourceHandle;
use std::collections::HashMap;

/// Mapping from resource name to resolved resource handle
///
/// Filled once by an `AssetResolver`; read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct AssetTable {
    resources: HashMap<String, ResourceHandle>,
}

impl AssetTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a resource, replacing any earlier one with the same name
    pub fn insert(&mut self, name: impl Into<String>, handle: ResourceHandle) {
        self.resources.insert(name.into(), handle);
    }

    /// Get a resource by name
    pub fn get(&self, name: &str) -> Option<&ResourceHandle> {
        self.resources.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.resources.contains_key(name)
    }

    /// Resource names in sorted order
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.resources.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ResourceHandle)> {
        self.resources.iter().map(|(name, handle)| (name.as_str(), handle))
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}

impl IntoIterator for AssetTable {
    type Item = (String, ResourceHandle);
    type IntoIter = std::collections::hash_map::IntoIter<String, ResourceHandle>;

    fn into_iter(self) -> Self::IntoIter {
        self.resources.into_iter()
    }
}

impl FromIterator<(String, ResourceHandle)> for AssetTable {
    fn from_iter<I: IntoIterator<Item = (String, ResourceHandle)>>(iter: I) -> Self {
        Self {
            resources: iter.into_iter().collect(),
        }
    }
}
