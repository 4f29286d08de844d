//! Materializing a rootmap against a registry implemented by the host

use rootmap_bindings::{
    load_manifest_into, EntityKind, EntityRef, EntityRegistry, ForeignEntity, ModuleTree, Node,
    SkipReason,
};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

const UMBRELLA: &str = "host.gbl";

/// Minimal host-side entity, standing in for a reflection-layer proxy
#[derive(Debug)]
struct HostEntity {
    qualified: String,
    kind: EntityKind,
}

impl ForeignEntity for HostEntity {
    fn name(&self) -> &str {
        self.qualified.rsplit("::").next().unwrap_or(&self.qualified)
    }

    fn qualified_name(&self) -> &str {
        &self.qualified
    }

    fn kind(&self) -> EntityKind {
        self.kind
    }

    fn owning_module(&self) -> &str {
        UMBRELLA
    }
}

struct HostRegistry {
    entities: HashMap<String, EntityRef>,
}

impl HostRegistry {
    fn with(names: &[(&str, EntityKind)]) -> Self {
        let entities = names
            .iter()
            .map(|(name, kind)| {
                let entity: EntityRef = Arc::new(HostEntity {
                    qualified: (*name).to_string(),
                    kind: *kind,
                });
                ((*name).to_string(), entity)
            })
            .collect();
        HostRegistry { entities }
    }
}

impl EntityRegistry for HostRegistry {
    fn umbrella_module(&self) -> &str {
        UMBRELLA
    }

    fn lookup(&self, qualified_name: &str) -> Option<EntityRef> {
        self.entities.get(qualified_name).cloned()
    }
}

fn fixture() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("pkg.rootmap")
}

fn full_registry() -> HostRegistry {
    HostRegistry::with(&[
        ("Foo", EntityKind::Class),
        ("Foo::Bar", EntityKind::Class),
        ("Holder", EntityKind::Class),
        ("Bar", EntityKind::Class),
        ("NS", EntityKind::Namespace),
        ("NS::count", EntityKind::Variable),
        ("NS::Index", EntityKind::TypeAlias),
        ("A::B::C", EntityKind::Class),
    ])
}

#[test]
fn test_fixture_tree_shape() {
    let registry = full_registry();
    let mut tree = ModuleTree::new("pkg");
    let result = load_manifest_into(&fixture(), &registry, &mut tree);
    assert!(result.as_ref().is_ok_and(|r| r.skipped.is_empty()));

    assert!(tree.get("Foo").is_some_and(|n| n.owning_module() == "pkg"));
    assert!(tree.get("Foo.Bar").is_some_and(|n| n.owning_module() == "pkg.Foo"));
    assert!(tree.get("NS").is_some_and(Node::is_placeholder));
    assert!(tree.get("NS.count").is_some_and(|n| n.owning_module() == "pkg.NS"));
    assert!(tree
        .get("NS.Index")
        .and_then(Node::entity)
        .is_some_and(|e| e.kind() == EntityKind::TypeAlias));
    assert!(tree.get("A.B").is_some_and(|n| n.is_placeholder() && n.owning_module() == "pkg.A"));
    assert!(tree.get("A.B.C").is_some_and(|n| !n.is_placeholder()));
    assert!(tree.get("Holder").is_some());
    assert!(tree.get("int").is_none());
}

#[test]
fn test_relabeled_entities_keep_identity() {
    let registry = full_registry();
    let mut tree = ModuleTree::new("pkg");
    let _ = load_manifest_into(&fixture(), &registry, &mut tree);

    let bound = tree.get("Foo").and_then(Node::entity).map(|e| e.identity());
    let original = registry.lookup("Foo").map(|e| e.identity());
    assert!(bound.is_some());
    assert_eq!(bound, original);
}

#[test]
fn test_reload_is_noop() {
    let registry = full_registry();
    let mut tree = ModuleTree::new("pkg");
    let _ = load_manifest_into(&fixture(), &registry, &mut tree);
    let nodes = tree.len();

    let second = load_manifest_into(&fixture(), &registry, &mut tree);
    assert!(second.is_ok_and(|r| r.is_noop() && r.skipped.is_empty()));
    assert_eq!(tree.len(), nodes);
}

#[test]
fn test_partial_registry_skips_unknown_names() {
    let registry = HostRegistry::with(&[("Foo", EntityKind::Class), ("NS", EntityKind::Namespace)]);
    let mut tree = ModuleTree::new("pkg");
    let report = load_manifest_into(&fixture(), &registry, &mut tree).unwrap_or_default();

    assert!(tree.get("A").is_none());
    assert!(tree.get("Foo.Bar").is_none());
    assert!(report
        .skipped
        .iter()
        .any(|s| s.qualified_name == "A::B::C" && matches!(s.reason, SkipReason::Unresolved { .. })));
    assert_eq!(tree.walk().len(), 2);
}
