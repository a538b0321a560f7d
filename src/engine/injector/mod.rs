// Deferred capability injection
//
// Capabilities are queued by tag during startup, before the host object they
// belong on exists. `run_injection` waits for the host root, creates one child
// under it, attaches every queued capability, and then refuses further queuing.

mod capability;
mod host;

pub use capability::{Capability, CapabilityFactories, CapabilityFactory, CapabilityTag};
pub use host::{HostObject, HostRootProvider, HostRootSlot, SceneNode};

use crate::core::LoaderConfig;
use log::{debug, info};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// Injection errors
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum InjectionError {
    #[error("Injection already finished")]
    AlreadyInjected,

    #[error("Injection is already waiting for the host")]
    InjectionInProgress,

    #[error("No factory registered for capability '{0}'")]
    UnregisteredCapability(CapabilityTag),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InjectionPhase {
    Pending,
    Waiting,
    Injected,
}

#[derive(Debug)]
struct InjectionState {
    /// Queued tags in queue order, without duplicates
    queued: Vec<CapabilityTag>,
    phase: InjectionPhase,
}

/// Attaches queued capabilities to a host object that appears after startup
#[derive(Debug)]
pub struct DeferredInjector {
    state: Mutex<InjectionState>,
    factories: CapabilityFactories,
    object_name: String,
    poll_interval: Duration,
}

impl DeferredInjector {
    pub fn new(factories: CapabilityFactories, config: &LoaderConfig) -> Self {
        Self {
            state: Mutex::new(InjectionState {
                queued: Vec::new(),
                phase: InjectionPhase::Pending,
            }),
            factories,
            object_name: config.injected_object_name().to_string(),
            poll_interval: config.injection_poll_interval(),
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, InjectionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Queue a capability for attachment
    ///
    /// Accepted until injection completes, including while waiting for the host.
    pub fn queue_capability(&self, tag: CapabilityTag) -> Result<(), InjectionError> {
        if !self.factories.contains(tag) {
            return Err(InjectionError::UnregisteredCapability(tag));
        }

        let mut state = self.lock_state();
        if state.phase == InjectionPhase::Injected {
            return Err(InjectionError::AlreadyInjected);
        }

        if !state.queued.contains(&tag) {
            debug!("Queued capability '{}'", tag);
            state.queued.push(tag);
        }
        Ok(())
    }

    /// Whether injection has completed
    pub fn is_injected(&self) -> bool {
        self.lock_state().phase == InjectionPhase::Injected
    }

    /// Currently queued tags, in queue order
    pub fn queued(&self) -> Vec<CapabilityTag> {
        self.lock_state().queued.clone()
    }

    /// Wait for the host root, then attach every queued capability exactly once
    ///
    /// Must be called once. A second call fails with `InjectionInProgress`
    /// while the first is waiting, and with `AlreadyInjected` afterwards.
    /// Returns the object the capabilities were attached to.
    pub async fn run_injection(
        &self,
        provider: &dyn HostRootProvider,
    ) -> Result<Arc<dyn HostObject>, InjectionError> {
        {
            let mut state = self.lock_state();
            match state.phase {
                InjectionPhase::Injected => return Err(InjectionError::AlreadyInjected),
                InjectionPhase::Waiting => return Err(InjectionError::InjectionInProgress),
                InjectionPhase::Pending => state.phase = InjectionPhase::Waiting,
            }
        }

        info!("Waiting for host root to inject capabilities...");
        let root = provider.wait_for_root(self.poll_interval).await;

        // Closing the queue and snapshotting it happen under one lock, so no
        // capability can be accepted without also being attached.
        let tags = {
            let mut state = self.lock_state();
            state.phase = InjectionPhase::Injected;
            state.queued.clone()
        };

        let target = root.create_child(&self.object_name);
        for tag in &tags {
            if let Some(capability) = self.factories.create(*tag) {
                target.attach(Arc::clone(&capability));
                capability.awake(&target);
                debug!("Attached capability '{}'", tag);
            }
        }

        info!(
            "Injected {} capabilities into '{}' under '{}'",
            tags.len(),
            target.name(),
            root.name()
        );
        Ok(target)
    }
}
