// Capability tags and the factories that build them

use super::host::HostObject;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Name of a capability type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CapabilityTag(&'static str);

impl CapabilityTag {
    pub const fn new(name: &'static str) -> Self {
        Self(name)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for CapabilityTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// A behavior attached to a host object at runtime
pub trait Capability: Send + Sync {
    fn tag(&self) -> CapabilityTag;

    /// Called once, right after the capability is attached to `host`
    fn awake(&self, _host: &Arc<dyn HostObject>) {}
}

/// Builds a fresh capability instance
pub type CapabilityFactory = Box<dyn Fn() -> Arc<dyn Capability> + Send + Sync>;

/// Registry of capability factories keyed by tag
#[derive(Default)]
pub struct CapabilityFactories {
    factories: HashMap<CapabilityTag, CapabilityFactory>,
}

impl CapabilityFactories {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a factory, replacing any previous one for the same tag
    pub fn register<F>(&mut self, tag: CapabilityTag, factory: F)
    where
        F: Fn() -> Arc<dyn Capability> + Send + Sync + 'static,
    {
        self.factories.insert(tag, Box::new(factory));
    }

    /// Builder-style variant of `register`
    pub fn with<F>(mut self, tag: CapabilityTag, factory: F) -> Self
    where
        F: Fn() -> Arc<dyn Capability> + Send + Sync + 'static,
    {
        self.register(tag, factory);
        self
    }

    pub fn contains(&self, tag: CapabilityTag) -> bool {
        self.factories.contains_key(&tag)
    }

    /// Build a new instance of the capability registered under `tag`
    pub fn create(&self, tag: CapabilityTag) -> Option<Arc<dyn Capability>> {
        self.factories.get(&tag).map(|factory| factory())
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

impl fmt::Debug for CapabilityFactories {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut tags: Vec<_> = self.factories.keys().collect();
        tags.sort();
        f.debug_struct("CapabilityFactories")
            .field("tags", &tags)
            .finish()
    }
}
