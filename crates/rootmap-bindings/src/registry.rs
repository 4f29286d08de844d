//! Foreign-entity registries
//!
//! A registry answers "which native entity answers to this fully qualified
//! name?". The reflection layer that loaded the library owns the real one;
//! [`StaticRegistry`] is an in-memory registry for hosts that already know
//! their entities and for dry runs over a manifest.

use crate::entity::{EntityKind, EntityRef, StaticEntity};
use ahash::AHashMap;
use rootmap_manifest::Manifest;
use std::sync::Arc;
use tracing::debug;

pub trait EntityRegistry {
    /// Module name stamped on every entity this registry creates
    fn umbrella_module(&self) -> &str;

    fn lookup(&self, qualified_name: &str) -> Option<EntityRef>;
}

#[derive(Debug, Clone)]
pub struct StaticRegistry {
    umbrella: Arc<str>,
    entities: AHashMap<Arc<str>, EntityRef>,
}

impl StaticRegistry {
    pub fn new(umbrella_module: &str) -> Self {
        StaticRegistry {
            umbrella: Arc::from(umbrella_module),
            entities: AHashMap::new(),
        }
    }

    /// Insert under the entity's qualified name, returning any entity it replaced
    pub fn insert(&mut self, entity: EntityRef) -> Option<EntityRef> {
        self.entities
            .insert(Arc::from(entity.qualified_name()), entity)
    }

    /// Create a [`StaticEntity`] homed in the umbrella module and insert it
    pub fn register(&mut self, qualified_name: &str, kind: EntityKind) -> EntityRef {
        let entity = StaticEntity::new(qualified_name, kind, &self.umbrella).into_ref();
        self.insert(Arc::clone(&entity));
        entity
    }

    pub fn contains(&self, qualified_name: &str) -> bool {
        self.entities.contains_key(qualified_name)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// A registry that resolves every name the manifest records.
    ///
    /// Used to preview the tree a package would produce without loading its
    /// library. The first record of a name decides its kind.
    pub fn from_manifest(manifest: &Manifest, umbrella_module: &str) -> Self {
        let mut registry = StaticRegistry::new(umbrella_module);
        for record in manifest.unique_records() {
            registry.register(&record.path.qualified_name(), record.kind.into());
        }
        debug!(
            "Built registry of {} entities from manifest for {}",
            registry.len(),
            umbrella_module
        );
        registry
    }
}

impl EntityRegistry for StaticRegistry {
    fn umbrella_module(&self) -> &str {
        &self.umbrella
    }

    fn lookup(&self, qualified_name: &str) -> Option<EntityRef> {
        self.entities.get(qualified_name).cloned()
    }
}
