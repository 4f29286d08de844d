//! Plain-text and JSON views of manifests and module trees

use rootmap_bindings::{ModuleTree, Node};
use rootmap_manifest::Manifest;
use serde::Serialize;
use std::fmt::Write;

/// `namespace` for placeholders, the entity kind otherwise
pub fn node_label(node: &Node) -> String {
    match node.entity() {
        Some(entity) => entity.kind().to_string(),
        None => "namespace".to_string(),
    }
}

/// Indented hierarchy, one node per line: `name  kind  [module]`
pub fn render_tree(tree: &ModuleTree) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", tree.package());
    render_children(tree.root(), 1, &mut out);
    out
}

fn render_children(node: &Node, depth: usize, out: &mut String) {
    for (name, child) in node.children() {
        let _ = writeln!(
            out,
            "{}{}  {}  [{}]",
            "  ".repeat(depth),
            name,
            node_label(child),
            child.owning_module()
        );
        render_children(child, depth + 1, out);
    }
}

/// One line per record: `line  kind  qualified::name`
pub fn render_records(manifest: &Manifest) -> String {
    let mut out = String::new();
    for record in &manifest.records {
        let _ = writeln!(
            out,
            "{:>5}  {:<9}  {}",
            record.line,
            record.kind.keyword(),
            record.path
        );
    }
    out
}

#[derive(Debug, Serialize)]
pub struct TreeEntry<'a> {
    pub path: String,
    pub kind: String,
    pub module: &'a str,
}

pub fn tree_entries(tree: &ModuleTree) -> Vec<TreeEntry<'_>> {
    tree.walk()
        .into_iter()
        .map(|(path, node)| TreeEntry {
            path,
            kind: node_label(node),
            module: node.owning_module(),
        })
        .collect()
}
