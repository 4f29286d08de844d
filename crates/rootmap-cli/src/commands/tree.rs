use crate::common::default_package;
use crate::logger;
use crate::render::{render_tree, tree_entries};
use crate::GlobalOpts;
use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use rootmap_bindings::{MaterializeReport, Materializer, ModuleTree, StaticRegistry};
use rootmap_config::LoaderConfig;
use rootmap_manifest::{read_from_path, Manifest};
use std::path::PathBuf;

#[derive(Args, Debug, Clone)]
pub struct TreeCommand {
    /// Rootmap file to materialize
    pub file: PathBuf,
    /// Destination package name (default: config `package`, then the file stem)
    #[arg(long)]
    pub package: Option<String>,
    /// Print the tree and report as JSON
    #[arg(long)]
    pub json: bool,
}

/// Materialize `manifest` into a fresh tree, resolving every name it records
pub fn preview_tree(
    manifest: &Manifest,
    package: &str,
    config: &LoaderConfig,
) -> (ModuleTree, MaterializeReport) {
    logger::step(&format!(
        "Building preview registry from {} records",
        manifest.len()
    ));
    let registry = StaticRegistry::from_manifest(manifest, config.umbrella_module());
    let mut tree = ModuleTree::new(package);

    logger::step(&format!("Materializing into '{}'", package));
    let report = Materializer::new(&registry).materialize(manifest.unique_records(), &mut tree);
    (tree, report)
}

/// Tree, summary and skip warnings for a finished preview
pub fn print_tree(tree: &ModuleTree, report: &MaterializeReport, json: bool) -> Result<()> {
    if json {
        let value = serde_json::json!({
            "package": tree.package(),
            "nodes": tree_entries(tree),
            "report": report,
        });
        let json = serde_json::to_string_pretty(&value).context("Failed to serialize tree")?;
        println!("{}", json);
        return Ok(());
    }

    print!("{}", render_tree(tree));
    for skipped in &report.skipped {
        logger::warn(&format!("line {}: {}", skipped.line, skipped.reason));
    }
    logger::info(&format!(
        "{} nodes: {} bound, {} placeholders, {} unchanged",
        tree.len(),
        report.bound,
        report.placeholders,
        report.unchanged
    ));
    Ok(())
}

pub fn handle_tree(cmd: TreeCommand, _opts: &GlobalOpts) -> Result<()> {
    let config = LoaderConfig::load().context("Failed to load config")?;
    let manifest = read_from_path(&cmd.file)?;
    let package = cmd
        .package
        .unwrap_or_else(|| default_package(&cmd.file, &config));

    let (tree, report) = preview_tree(&manifest, &package, &config);
    if !cmd.json {
        println!("{}", format!("Package tree for {}:", cmd.file.display()).bold().green());
    }
    print_tree(&tree, &report, cmd.json)
}
