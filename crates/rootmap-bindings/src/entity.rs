//! Handles to foreign (natively compiled) entities
//!
//! The loader never inspects what an entity *is* beyond this trait. Whatever
//! binding layer populated the registry provides the implementation; the
//! crate ships [`StaticEntity`] for registries built in memory and
//! [`Relabeled`] for re-homing entities under a destination package.

use ahash::AHashMap;
use rootmap_manifest::RecordKind;
use std::fmt;
use std::sync::Arc;

pub type EntityRef = Arc<dyn ForeignEntity>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Namespace,
    Class,
    Variable,
    TypeAlias,
    Enum,
    Function,
}

impl EntityKind {
    pub fn is_namespace(self) -> bool {
        matches!(self, EntityKind::Namespace)
    }
}

impl From<RecordKind> for EntityKind {
    fn from(kind: RecordKind) -> Self {
        match kind {
            RecordKind::Namespace => EntityKind::Namespace,
            RecordKind::Class => EntityKind::Class,
            RecordKind::Variable => EntityKind::Variable,
            RecordKind::TypeAlias => EntityKind::TypeAlias,
            RecordKind::Enum => EntityKind::Enum,
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            EntityKind::Namespace => "namespace",
            EntityKind::Class => "class",
            EntityKind::Variable => "variable",
            EntityKind::TypeAlias => "typedef",
            EntityKind::Enum => "enum",
            EntityKind::Function => "function",
        };
        f.write_str(label)
    }
}

/// Address-based identity of the underlying native object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntityId(usize);

impl EntityId {
    pub fn of<T: ?Sized>(value: &T) -> Self {
        EntityId(std::ptr::from_ref(value).cast::<()>() as usize)
    }
}

/// A live handle resolved from a foreign-entity registry
pub trait ForeignEntity: fmt::Debug + Send + Sync {
    /// Simple name, without enclosing scopes
    fn name(&self) -> &str;

    fn qualified_name(&self) -> &str;

    fn kind(&self) -> EntityKind;

    /// Module the entity reports as its home
    fn owning_module(&self) -> &str;

    /// Attribute or method access
    fn member(&self, _name: &str) -> Option<EntityRef> {
        None
    }

    fn member_names(&self) -> Vec<Arc<str>> {
        Vec::new()
    }

    /// Wrappers must forward this so a wrapped entity compares equal to itself
    fn identity(&self) -> EntityId {
        EntityId::of(self)
    }
}

// =============================================================================
// STATIC ENTITY - in-memory handle
// =============================================================================

#[derive(Debug, Clone)]
pub struct StaticEntity {
    name: Arc<str>,
    qualified_name: Arc<str>,
    kind: EntityKind,
    module: Arc<str>,
    members: AHashMap<Arc<str>, EntityRef>,
}

impl StaticEntity {
    pub fn new(qualified_name: &str, kind: EntityKind, module: &str) -> Self {
        let name = qualified_name
            .rsplit(rootmap_manifest::types::SCOPE_SEPARATOR)
            .next()
            .unwrap_or(qualified_name);
        StaticEntity {
            name: Arc::from(name),
            qualified_name: Arc::from(qualified_name),
            kind,
            module: Arc::from(module),
            members: AHashMap::new(),
        }
    }

    pub fn with_member(mut self, member: EntityRef) -> Self {
        self.members.insert(Arc::from(member.name()), member);
        self
    }

    pub fn into_ref(self) -> EntityRef {
        Arc::new(self)
    }
}

impl ForeignEntity for StaticEntity {
    fn name(&self) -> &str {
        &self.name
    }

    fn qualified_name(&self) -> &str {
        &self.qualified_name
    }

    fn kind(&self) -> EntityKind {
        self.kind
    }

    fn owning_module(&self) -> &str {
        &self.module
    }

    fn member(&self, name: &str) -> Option<EntityRef> {
        self.members.get(name).cloned()
    }

    fn member_names(&self) -> Vec<Arc<str>> {
        let mut names: Vec<Arc<str>> = self.members.keys().cloned().collect();
        names.sort();
        names
    }
}

// =============================================================================
// RELABELED - interface-forwarding wrapper
// =============================================================================

/// Forwards every capability to the wrapped entity except `owning_module`.
///
/// The registry stamps its own umbrella module on every entity and that field
/// is read-only on the entity itself, so the loader binds this wrapper instead.
#[derive(Debug, Clone)]
pub struct Relabeled {
    inner: EntityRef,
    module: Arc<str>,
}

impl Relabeled {
    pub fn new(inner: EntityRef, module: impl Into<Arc<str>>) -> Self {
        Relabeled {
            inner,
            module: module.into(),
        }
    }
}

impl ForeignEntity for Relabeled {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn qualified_name(&self) -> &str {
        self.inner.qualified_name()
    }

    fn kind(&self) -> EntityKind {
        self.inner.kind()
    }

    fn owning_module(&self) -> &str {
        &self.module
    }

    fn member(&self, name: &str) -> Option<EntityRef> {
        self.inner.member(name)
    }

    fn member_names(&self) -> Vec<Arc<str>> {
        self.inner.member_names()
    }

    fn identity(&self) -> EntityId {
        self.inner.identity()
    }
}
