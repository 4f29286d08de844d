//! Namespace materializer
//!
//! Attaches every manifest record to a [`ModuleTree`]:
//!
//! 1. Records are applied shallowest first, so an entity bound at `X` is in
//!    place before `X::Y` walks through it.
//! 2. Each record is resolved in the registry before the tree is touched; a
//!    name the registry does not know is skipped and leaves nothing behind.
//! 3. Missing enclosing scopes become placeholders homed in their parent's
//!    dotted path. Existing nodes, bound or not, are walked through as-is.
//! 4. The last segment is a placeholder for namespaces and the resolved
//!    entity otherwise. Entities still homed in the registry's umbrella module
//!    are wrapped in [`Relabeled`] so they report the destination path.
//!
//! Applying the same records to the same tree twice changes nothing.

use crate::entity::{EntityRef, Relabeled};
use crate::registry::EntityRegistry;
use crate::tree::{ModuleTree, Node};
use ahash::AHashMap;
use rootmap_manifest::ManifestRecord;
use serde::Serialize;
use std::collections::hash_map::Entry;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, trace};

/// What a record did to the tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Applied {
    /// A new node bound to the entity
    Bound,
    /// A placeholder turned into a binding, keeping its children
    Upgraded,
    Placeholder,
    /// The tree already held this outcome
    Unchanged,
}

#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum SkipReason {
    #[error("'{name}' is not known to the registry")]
    Unresolved { name: String },
    #[error("'{path}' is already bound to '{existing}'")]
    Conflict { path: String, existing: String },
}

pub type RecordResult = Result<Applied, SkipReason>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedRecord {
    pub line: usize,
    pub qualified_name: String,
    #[serde(flatten)]
    pub reason: SkipReason,
}

/// Outcome of one materialization pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MaterializeReport {
    /// Records bound to a new node or upgraded from a placeholder
    pub bound: usize,
    /// Placeholders created, including intermediate scopes
    pub placeholders: usize,
    pub unchanged: usize,
    pub skipped: Vec<SkippedRecord>,
}

impl MaterializeReport {
    /// True when the pass changed nothing in the tree
    pub fn is_noop(&self) -> bool {
        self.bound == 0 && self.placeholders == 0
    }

    fn record(&mut self, record: &ManifestRecord, result: RecordResult, created: usize) {
        self.placeholders += created;
        match result {
            Ok(Applied::Bound | Applied::Upgraded) => self.bound += 1,
            Ok(Applied::Placeholder) => self.placeholders += 1,
            Ok(Applied::Unchanged) => self.unchanged += 1,
            Err(reason) => self.skipped.push(SkippedRecord {
                line: record.line,
                qualified_name: record.path.qualified_name(),
                reason,
            }),
        }
    }
}

pub struct Materializer<'r, R: EntityRegistry + ?Sized> {
    registry: &'r R,
}

impl<'r, R: EntityRegistry + ?Sized> Materializer<'r, R> {
    pub fn new(registry: &'r R) -> Self {
        Materializer { registry }
    }

    /// Apply `records` to `tree`, shallowest first, file order within a depth
    pub fn materialize<'a, I>(&self, records: I, tree: &mut ModuleTree) -> MaterializeReport
    where
        I: IntoIterator<Item = &'a ManifestRecord>,
    {
        let mut ordered: Vec<&ManifestRecord> = records.into_iter().collect();
        ordered.sort_by_key(|record| record.depth());

        let mut report = MaterializeReport::default();
        for record in ordered {
            let (result, created) = self.apply_counted(record, tree);
            report.record(record, result, created);
        }

        info!(
            "Materialized '{}': {} bound, {} placeholders, {} unchanged, {} skipped",
            tree.package(),
            report.bound,
            report.placeholders,
            report.unchanged,
            report.skipped.len()
        );
        report
    }

    /// Apply a single record.
    ///
    /// Callers applying several records must order them by depth themselves.
    pub fn apply(&self, record: &ManifestRecord, tree: &mut ModuleTree) -> RecordResult {
        self.apply_counted(record, tree).0
    }

    fn apply_counted(
        &self,
        record: &ManifestRecord,
        tree: &mut ModuleTree,
    ) -> (RecordResult, usize) {
        let qualified = record.path.qualified_name();
        let Some(entity) = self.registry.lookup(&qualified) else {
            debug!(
                "No registry entry for '{}' (line {}), skipping",
                qualified, record.line
            );
            return (Err(SkipReason::Unresolved { name: qualified }), 0);
        };

        let mut module = tree.package().to_string();
        let mut created = 0;
        let mut parent = tree.root_mut();
        for segment in record.path.prefix() {
            let (child, is_new) = parent.child_or_placeholder(segment, &module);
            if is_new {
                trace!("Created placeholder '{}.{}'", module, segment);
                created += 1;
            }
            parent = child;
            module.push('.');
            module.push_str(segment);
        }

        let name = record.path.simple_name();
        let result = if entity.kind().is_namespace() {
            Ok(attach_placeholder(parent.children_mut(), name, &module))
        } else {
            let entity = self.relabel(entity, &module);
            attach_entity(parent.children_mut(), name, entity, &module)
        };
        (result, created)
    }

    fn relabel(&self, entity: EntityRef, module: &str) -> EntityRef {
        if entity.owning_module() == self.registry.umbrella_module() {
            Arc::new(Relabeled::new(entity, module))
        } else {
            entity
        }
    }
}

fn attach_placeholder(
    children: &mut AHashMap<Arc<str>, Node>,
    name: &Arc<str>,
    module: &str,
) -> Applied {
    match children.entry(Arc::clone(name)) {
        Entry::Occupied(_) => Applied::Unchanged,
        Entry::Vacant(slot) => {
            slot.insert(Node::placeholder(module));
            Applied::Placeholder
        }
    }
}

fn attach_entity(
    children: &mut AHashMap<Arc<str>, Node>,
    name: &Arc<str>,
    entity: EntityRef,
    module: &str,
) -> RecordResult {
    match children.entry(Arc::clone(name)) {
        Entry::Vacant(slot) => {
            slot.insert(Node::bound(entity));
            Ok(Applied::Bound)
        }
        Entry::Occupied(mut slot) => {
            let node = slot.get_mut();
            match node.entity() {
                None => {
                    node.bind(entity);
                    Ok(Applied::Upgraded)
                }
                Some(existing) if existing.identity() == entity.identity() => {
                    Ok(Applied::Unchanged)
                }
                Some(existing) => Err(SkipReason::Conflict {
                    path: format!("{}.{}", module, name),
                    existing: existing.qualified_name().to_string(),
                }),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{EntityKind, StaticEntity};
    use crate::registry::StaticRegistry;
    use rootmap_manifest::{parse_str, QualifiedPath, RecordKind};

    const UMBRELLA: &str = "cppyy.gbl";

    fn record(kind: RecordKind, name: &str, line: usize) -> ManifestRecord {
        let path =
            QualifiedPath::parse(name).unwrap_or_else(|| unreachable!("'{name}' is not empty"));
        ManifestRecord::new(kind, path, line)
    }

    fn registry(entries: &[(&str, EntityKind)]) -> StaticRegistry {
        let mut registry = StaticRegistry::new(UMBRELLA);
        for (name, kind) in entries {
            registry.register(name, *kind);
        }
        registry
    }

    #[test]
    fn test_depth_one_binding() {
        let registry = registry(&[("Foo", EntityKind::Class)]);
        let mut tree = ModuleTree::new("pkg");
        let result =
            Materializer::new(&registry).apply(&record(RecordKind::Class, "Foo", 1), &mut tree);

        assert_eq!(result, Ok(Applied::Bound));
        let node = tree.get("Foo");
        assert!(node.is_some_and(|n| n.entity().is_some()));
        assert!(node.is_some_and(|n| n.owning_module() == "pkg"));
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn test_repeated_depth_one_records_bind_each_name_once() {
        let registry = registry(&[
            ("Foo", EntityKind::Class),
            ("Bar", EntityKind::Variable),
            ("Baz", EntityKind::Enum),
        ]);
        let records = [
            record(RecordKind::Class, "Foo", 1),
            record(RecordKind::Variable, "Bar", 2),
            record(RecordKind::Class, "Foo", 3),
            record(RecordKind::Enum, "Baz", 4),
            record(RecordKind::Variable, "Bar", 5),
            record(RecordKind::Class, "Foo", 6),
        ];
        let mut tree = ModuleTree::new("pkg");
        let report = Materializer::new(&registry).materialize(&records, &mut tree);

        assert_eq!(report.bound, 3);
        assert_eq!(report.unchanged, 3);
        assert!(report.skipped.is_empty());
        assert_eq!(tree.len(), 3);
        assert_eq!(tree.root().child_names(), vec!["Bar", "Baz", "Foo"]);
        for name in ["Foo", "Bar", "Baz"] {
            let bound = tree.get(name).and_then(Node::entity).map(|e| e.identity());
            let expected = registry.lookup(name).map(|e| e.identity());
            assert!(bound.is_some());
            assert_eq!(bound, expected);
            assert!(tree.get(name).is_some_and(|n| n.owning_module() == "pkg"));
        }
    }

    #[test]
    fn test_intermediate_placeholders() {
        let registry = registry(&[("A::B::C", EntityKind::Class)]);
        let mut tree = ModuleTree::new("pkg");
        let records = [record(RecordKind::Class, "A::B::C", 3)];
        let report = Materializer::new(&registry).materialize(&records, &mut tree);

        assert_eq!(report.bound, 1);
        assert_eq!(report.placeholders, 2);
        assert!(tree.get("A").is_some_and(|n| n.is_placeholder() && n.owning_module() == "pkg"));
        assert!(tree
            .get("A.B")
            .is_some_and(|n| n.is_placeholder() && n.owning_module() == "pkg.A"));
        assert!(tree.get("A.B.C").is_some_and(|n| n.owning_module() == "pkg.A.B"));
    }

    #[test]
    fn test_materialize_is_idempotent() {
        let registry = registry(&[
            ("NS", EntityKind::Namespace),
            ("NS::count", EntityKind::Variable),
        ]);
        let records = vec![
            record(RecordKind::Variable, "NS::count", 2),
            record(RecordKind::Namespace, "NS", 1),
        ];
        let mut tree = ModuleTree::new("pkg");
        let materializer = Materializer::new(&registry);

        let first = materializer.materialize(&records, &mut tree);
        assert_eq!(first.bound, 1);
        assert_eq!(first.placeholders, 1);
        let before: Vec<String> = tree.walk().into_iter().map(|(p, _)| p).collect();

        let second = materializer.materialize(&records, &mut tree);
        assert!(second.is_noop());
        assert_eq!(second.unchanged, 2);
        assert!(second.skipped.is_empty());
        let after: Vec<String> = tree.walk().into_iter().map(|(p, _)| p).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_bound_parent_takes_precedence() {
        let registry = registry(&[("X", EntityKind::Class), ("X::Y", EntityKind::Class)]);
        let records = vec![
            record(RecordKind::Class, "X::Y", 1),
            record(RecordKind::Class, "X", 2),
        ];
        let mut tree = ModuleTree::new("pkg");
        let report = Materializer::new(&registry).materialize(&records, &mut tree);

        assert_eq!(report.bound, 2);
        assert_eq!(report.placeholders, 0);
        let x = tree.get("X");
        assert!(x.is_some_and(|n| !n.is_placeholder()));
        assert!(x.is_some_and(|n| n.get_child("Y").is_some()));
        assert!(tree.get("X.Y").is_some_and(|n| n.owning_module() == "pkg.X"));
    }

    #[test]
    fn test_unresolved_name_leaves_no_trace() {
        let registry = registry(&[]);
        let mut tree = ModuleTree::new("pkg");
        let report = Materializer::new(&registry).materialize(&[record(RecordKind::Class, "Gone::Away", 7)], &mut tree);

        assert!(tree.is_empty());
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].line, 7);
        assert_eq!(
            report.skipped[0].reason,
            SkipReason::Unresolved {
                name: "Gone::Away".to_string()
            }
        );
    }

    #[test]
    fn test_placeholder_upgraded_to_binding() {
        let registry = registry(&[
            ("Outer::Inner", EntityKind::Class),
            ("Outer", EntityKind::Class),
        ]);
        let mut tree = ModuleTree::new("pkg");
        let materializer = Materializer::new(&registry);

        let _ = materializer.apply(&record(RecordKind::Class, "Outer::Inner", 1), &mut tree);
        assert!(tree.get("Outer").is_some_and(Node::is_placeholder));

        let result = materializer.apply(&record(RecordKind::Class, "Outer", 2), &mut tree);
        assert_eq!(result, Ok(Applied::Upgraded));
        let outer = tree.get("Outer");
        assert!(outer.is_some_and(|n| n.entity().is_some()));
        assert!(outer.is_some_and(|n| n.get_child("Inner").is_some()));
    }

    #[test]
    fn test_namespace_over_binding_is_unchanged() {
        let registry = registry(&[("Foo", EntityKind::Class)]);
        let mut tree = ModuleTree::new("pkg");
        let materializer = Materializer::new(&registry);
        let _ = materializer.apply(&record(RecordKind::Class, "Foo", 1), &mut tree);

        let mut ns_registry = StaticRegistry::new(UMBRELLA);
        ns_registry.register("Foo", EntityKind::Namespace);
        let result = Materializer::new(&ns_registry)
            .apply(&record(RecordKind::Namespace, "Foo", 2), &mut tree);

        assert_eq!(result, Ok(Applied::Unchanged));
        assert!(tree.get("Foo").is_some_and(|n| n.entity().is_some()));
    }

    #[test]
    fn test_conflicting_binding_keeps_first() {
        let mut tree = ModuleTree::new("pkg");
        let first = registry(&[("Foo", EntityKind::Class)]);
        let second = registry(&[("Foo", EntityKind::TypeAlias)]);
        let rec = record(RecordKind::Class, "Foo", 1);

        assert_eq!(Materializer::new(&first).apply(&rec, &mut tree), Ok(Applied::Bound));
        let result = Materializer::new(&second).apply(&rec, &mut tree);
        assert!(matches!(result, Err(SkipReason::Conflict { ref path, .. }) if path == "pkg.Foo"));
        assert!(tree
            .get("Foo")
            .and_then(Node::entity)
            .is_some_and(|e| e.kind() == EntityKind::Class));
    }

    #[test]
    fn test_foreign_module_entity_not_relabeled() {
        let mut registry = StaticRegistry::new(UMBRELLA);
        registry.insert(StaticEntity::new("Foo", EntityKind::Class, "elsewhere").into_ref());
        let mut tree = ModuleTree::new("pkg");
        let _ = Materializer::new(&registry).apply(&record(RecordKind::Class, "Foo", 1), &mut tree);
        assert!(tree.get("Foo").is_some_and(|n| n.owning_module() == "elsewhere"));
    }

    #[test]
    fn test_sample_manifest_shape() {
        let manifest = parse_str(
            "{ decls }\nnamespace NS { int count; }\n[ libpkg.so ]\nclass Foo\nclass Foo::Bar\nnamespace NS\nvar NS::count\nclass Holder<Foo,Bar,int>\n",
        );
        let registry = StaticRegistry::from_manifest(&manifest, UMBRELLA);
        let mut tree = ModuleTree::new("pkg");
        let report = Materializer::new(&registry).materialize(manifest.unique_records(), &mut tree);

        assert!(report.skipped.is_empty());
        assert!(tree.get("Foo").is_some_and(|n| n.entity().is_some()));
        assert!(tree.get("Foo.Bar").is_some_and(|n| n.owning_module() == "pkg.Foo"));
        assert!(tree.get("NS").is_some_and(Node::is_placeholder));
        assert!(tree.get("NS.count").is_some_and(|n| n.owning_module() == "pkg.NS"));
        assert!(tree.get("Holder").is_some());
        assert!(tree.get("Bar").is_some());
        assert!(tree.get("int").is_none());
    }

    #[test]
    fn test_report_serializes_reasons() {
        let report = MaterializeReport {
            skipped: vec![SkippedRecord {
                line: 4,
                qualified_name: "geom::Gone".to_string(),
                reason: SkipReason::Unresolved {
                    name: "geom::Gone".to_string(),
                },
            }],
            ..Default::default()
        };
        assert!(report.is_noop());

        let value = serde_json::to_value(&report).unwrap_or_default();
        assert_eq!(value["skipped"][0]["reason"], "unresolved");
        assert_eq!(value["skipped"][0]["line"], 4);
        assert_eq!(value["skipped"][0]["qualified_name"], "geom::Gone");
    }
}
