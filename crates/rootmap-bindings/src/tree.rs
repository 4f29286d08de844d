//! Destination module tree
//!
//! The package a library's entities are exposed under. Every node is either a
//! synthesized placeholder scope or a bound foreign entity; both kinds can
//! carry children, so `geom.Shape.Kind` works whether `Shape` was bound or only
//! ever seen as an enclosing scope.

use crate::entity::EntityRef;
use ahash::AHashMap;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub enum NodeKind {
    /// Synthesized scope; `module` is the dotted path of its parent
    Placeholder { module: Arc<str> },
    Bound(EntityRef),
}

#[derive(Debug, Clone)]
pub struct Node {
    kind: NodeKind,
    children: AHashMap<Arc<str>, Node>,
}

impl Node {
    pub fn placeholder(module: impl Into<Arc<str>>) -> Self {
        Node {
            kind: NodeKind::Placeholder {
                module: module.into(),
            },
            children: AHashMap::new(),
        }
    }

    pub fn bound(entity: EntityRef) -> Self {
        Node {
            kind: NodeKind::Bound(entity),
            children: AHashMap::new(),
        }
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self.kind, NodeKind::Placeholder { .. })
    }

    pub fn entity(&self) -> Option<&EntityRef> {
        match &self.kind {
            NodeKind::Bound(entity) => Some(entity),
            NodeKind::Placeholder { .. } => None,
        }
    }

    pub fn owning_module(&self) -> &str {
        match &self.kind {
            NodeKind::Placeholder { module } => module,
            NodeKind::Bound(entity) => entity.owning_module(),
        }
    }

    pub fn get_child(&self, name: &str) -> Option<&Node> {
        self.children.get(name)
    }

    /// Attach `node` under `name`, returning the node it replaced
    pub fn set_child(&mut self, name: impl Into<Arc<str>>, node: Node) -> Option<Node> {
        self.children.insert(name.into(), node)
    }

    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    /// Child names, sorted
    pub fn child_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.children.keys().map(|name| name.as_ref()).collect();
        names.sort_unstable();
        names
    }

    /// Children sorted by name
    pub fn children(&self) -> Vec<(&str, &Node)> {
        let mut children: Vec<(&str, &Node)> = self
            .children
            .iter()
            .map(|(name, node)| (name.as_ref(), node))
            .collect();
        children.sort_unstable_by(|a, b| a.0.cmp(b.0));
        children
    }

    /// Child `name`, creating a placeholder homed in `module` when absent.
    /// The flag is true when a placeholder was created.
    pub(crate) fn child_or_placeholder(
        &mut self,
        name: &Arc<str>,
        module: &str,
    ) -> (&mut Node, bool) {
        let mut created = false;
        let node = self
            .children
            .entry(Arc::clone(name))
            .or_insert_with(|| {
                created = true;
                Node::placeholder(module)
            });
        (node, created)
    }

    pub(crate) fn children_mut(&mut self) -> &mut AHashMap<Arc<str>, Node> {
        &mut self.children
    }

    /// Turn this node into a binding, keeping its children
    pub(crate) fn bind(&mut self, entity: EntityRef) {
        self.kind = NodeKind::Bound(entity);
    }

    fn count(&self) -> usize {
        self.children.values().map(|child| 1 + child.count()).sum()
    }

    fn collect<'a>(&'a self, prefix: &str, out: &mut Vec<(String, &'a Node)>) {
        for (name, child) in self.children() {
            let path = if prefix.is_empty() {
                name.to_string()
            } else {
                format!("{}.{}", prefix, name)
            };
            out.push((path.clone(), child));
            child.collect(&path, out);
        }
    }
}

/// A destination package and everything attached beneath it
#[derive(Debug, Clone)]
pub struct ModuleTree {
    package: Arc<str>,
    root: Node,
}

impl ModuleTree {
    pub fn new(package: &str) -> Self {
        ModuleTree {
            package: Arc::from(package),
            root: Node::placeholder(package),
        }
    }

    pub fn package(&self) -> &str {
        &self.package
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut Node {
        &mut self.root
    }

    /// Node at a dotted path relative to the package (`"geom.Shape"`).
    /// The empty path is the package root.
    pub fn get(&self, dotted: &str) -> Option<&Node> {
        if dotted.is_empty() {
            return Some(&self.root);
        }
        dotted
            .split('.')
            .try_fold(&self.root, |node, segment| node.get_child(segment))
    }

    pub fn get_path<S: AsRef<str>>(&self, segments: &[S]) -> Option<&Node> {
        segments
            .iter()
            .try_fold(&self.root, |node, segment| node.get_child(segment.as_ref()))
    }

    /// Number of nodes below the root
    pub fn len(&self) -> usize {
        self.root.count()
    }

    pub fn is_empty(&self) -> bool {
        self.root.child_count() == 0
    }

    /// Every node below the root in pre-order, siblings sorted by name,
    /// paired with its dotted path relative to the package
    pub fn walk(&self) -> Vec<(String, &Node)> {
        let mut out = Vec::with_capacity(self.len());
        self.root.collect("", &mut out);
        out
    }
}
