// Host objects and the providers that announce them

use super::capability::{Capability, CapabilityTag};
use crate::core::config::MIN_INJECTION_POLL_INTERVAL;
use async_trait::async_trait;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;

/// An object owned by the host that capabilities can be attached to
pub trait HostObject: Send + Sync {
    fn name(&self) -> String;

    /// Create a new child object under this one
    fn create_child(&self, name: &str) -> Arc<dyn HostObject>;

    /// Attach a capability instance to this object
    fn attach(&self, capability: Arc<dyn Capability>);
}

/// Source of the host root object, which only exists some time after startup
#[async_trait]
pub trait HostRootProvider: Send + Sync {
    /// The root object, if the host has constructed it yet
    fn host_root(&self) -> Option<Arc<dyn HostObject>>;

    /// Wait until the root object exists
    ///
    /// The default checks `host_root` on a fixed interval, never shorter than
    /// `MIN_INJECTION_POLL_INTERVAL`. Providers that can signal availability
    /// should override this.
    async fn wait_for_root(&self, poll_interval: Duration) -> Arc<dyn HostObject> {
        let mut ticker = tokio::time::interval(poll_interval.max(MIN_INJECTION_POLL_INTERVAL));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            if let Some(root) = self.host_root() {
                return root;
            }
        }
    }
}

/// Host root provider that wakes waiters as soon as the root is published
pub struct HostRootSlot {
    sender: watch::Sender<Option<Arc<dyn HostObject>>>,
}

impl Default for HostRootSlot {
    fn default() -> Self {
        Self::new()
    }
}

impl HostRootSlot {
    pub fn new() -> Self {
        let (sender, _) = watch::channel(None);
        Self { sender }
    }

    /// Publish the root object and wake every waiter
    pub fn publish(&self, root: Arc<dyn HostObject>) {
        self.sender.send_replace(Some(root));
    }
}

#[async_trait]
impl HostRootProvider for HostRootSlot {
    fn host_root(&self) -> Option<Arc<dyn HostObject>> {
        self.sender.borrow().clone()
    }

    async fn wait_for_root(&self, _poll_interval: Duration) -> Arc<dyn HostObject> {
        let mut receiver = self.sender.subscribe();

        loop {
            let current = receiver.borrow_and_update().clone();
            if let Some(root) = current {
                return root;
            }
            if receiver.changed().await.is_err() {
                // The sender lives in `self`, so this cannot happen while we are borrowed
                std::future::pending::<()>().await;
            }
        }
    }
}

/// Minimal in-memory scene object
///
/// Serves as the host object in tools and tests.
pub struct SceneNode {
    name: String,
    children: Mutex<Vec<Arc<SceneNode>>>,
    capabilities: Mutex<Vec<Arc<dyn Capability>>>,
}

impl SceneNode {
    pub fn new(name: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            name: name.into(),
            children: Mutex::new(Vec::new()),
            capabilities: Mutex::new(Vec::new()),
        })
    }

    pub fn children(&self) -> Vec<Arc<SceneNode>> {
        self.children
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Find a direct child by name
    pub fn find_child(&self, name: &str) -> Option<Arc<SceneNode>> {
        self.children().into_iter().find(|child| child.name == name)
    }

    /// Tags of the capabilities attached to this node, in attach order
    pub fn capability_tags(&self) -> Vec<CapabilityTag> {
        self.capabilities
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|capability| capability.tag())
            .collect()
    }
}

impl HostObject for SceneNode {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn create_child(&self, name: &str) -> Arc<dyn HostObject> {
        let child = SceneNode::new(name);
        self.children
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Arc::clone(&child));
        child
    }

    fn attach(&self, capability: Arc<dyn Capability>) {
        self.capabilities
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(capability);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scene_node_children() {
        let root = SceneNode::new("root");
        let child = root.create_child("child");

        assert_eq!(child.name(), "child");
        assert_eq!(root.children().len(), 1);
        assert!(root.find_child("child").is_some());
        assert!(root.find_child("other").is_none());
    }

    #[tokio::test]
    async fn test_slot_publish_wakes_waiter() {
        let slot = Arc::new(HostRootSlot::new());
        assert!(slot.host_root().is_none());

        let waiter = {
            let slot = Arc::clone(&slot);
            tokio::spawn(async move { slot.wait_for_root(Duration::from_secs(3600)).await })
        };

        tokio::task::yield_now().await;
        slot.publish(SceneNode::new("host"));

        let root = waiter.await.unwrap();
        assert_eq!(root.name(), "host");
        assert!(slot.host_root().is_some());
    }

    #[tokio::test]
    async fn test_slot_already_published() {
        let slot = HostRootSlot::new();
        slot.publish(SceneNode::new("host"));

        let root = slot.wait_for_root(Duration::from_secs(3600)).await;
        assert_eq!(root.name(), "host");
    }
}
