//! The immutable set of handler descriptors, built once at startup.
//!
//! Resources are keyed by their concrete type: registering a second instance of
//! the same type replaces the first one, so at most one instance per type ever
//! serves requests. Once built, a [`Registry`] is never mutated and can be shared
//! between threads without locking.

mod descriptor;

pub use descriptor::HandlerDescriptor;
pub use descriptor::Owner;
pub use descriptor::ParamBinding;
pub use descriptor::describe;

use crate::resource::Resource;
use std::any::Any;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

type AnyResource = Arc<dyn Any + Send + Sync>;
type Describe = Box<dyn FnOnce() -> Vec<HandlerDescriptor> + Send>;

/// Resource instances by type, and the descriptors of all their exposed methods.
pub struct Registry {
    resources: Vec<(Owner, AnyResource)>,
    descriptors: Vec<HandlerDescriptor>,
}

impl Registry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// All descriptors, grouped by resource in registration order.
    pub fn descriptors(&self) -> &[HandlerDescriptor] {
        &self.descriptors
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    pub fn owners(&self) -> impl Iterator<Item = Owner> {
        self.resources.iter().map(|(owner, _)| *owner)
    }

    /// Returns the retained instance of resource type `R`.
    pub fn resource<R: Resource>(&self) -> Option<Arc<R>> {
        let owner = Owner::of::<R>();
        self.resources
            .iter()
            .find(|(o, _)| *o == owner)
            .and_then(|(_, instance)| Arc::clone(instance).downcast::<R>().ok())
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("resources", &self.owners().collect::<Vec<_>>())
            .field("descriptors", &self.descriptors)
            .finish()
    }
}

struct RegistryEntry {
    owner: Owner,
    instance: AnyResource,
    describe: Describe,
}

pub struct RegistryBuilder {
    entries: Vec<RegistryEntry>,
}

impl RegistryBuilder {
    fn new() -> Self {
        Self { entries: vec![] }
    }

    /// Registers a resource instance.
    pub fn resource<R: Resource>(self, resource: R) -> Self {
        self.shared_resource(Arc::new(resource))
    }

    /// Registers a resource instance the caller keeps a handle to.
    ///
    /// A later registration of the same type replaces this one.
    pub fn shared_resource<R: Resource>(mut self, resource: Arc<R>) -> Self {
        let owner = Owner::of::<R>();
        let instance: AnyResource = Arc::clone(&resource) as AnyResource;
        let entry = RegistryEntry { owner, instance, describe: Box::new(move || describe(&resource)) };

        match self.entries.iter_mut().find(|entry| entry.owner == owner) {
            Some(existing) => {
                warn!(resource = owner.name(), "resource type registered twice, the last instance wins");
                *existing = entry;
            }
            None => self.entries.push(entry),
        }
        self
    }

    pub fn build(self) -> Registry {
        let mut resources = Vec::with_capacity(self.entries.len());
        let mut descriptors = vec![];

        for RegistryEntry { owner, instance, describe } in self.entries {
            let described = describe();
            for descriptor in &described {
                debug!(resource = owner.name(), handler = %descriptor, "expose rest handler");
            }

            descriptors.extend(described);
            resources.push((owner, instance));
        }

        info!(resources = resources.len(), handlers = descriptors.len(), "rest registry built");
        Registry { resources, descriptors }
    }
}

impl fmt::Debug for RegistryBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistryBuilder")
            .field("resources", &self.entries.iter().map(|entry| entry.owner).collect::<Vec<_>>())
            .finish()
    }
}
