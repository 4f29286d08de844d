use crate::commands::tree::print_tree;
use crate::logger;
use crate::common::library_package;
use crate::GlobalOpts;
use anyhow::{Context, Result};
use clap::Args;
use rootmap_bindings::{LoadedPackage, StaticRegistry};
use rootmap_config::LoaderConfig;
use std::path::PathBuf;

#[derive(Args, Debug, Clone)]
pub struct LoadCommand {
    /// Directory holding the compiled library and its rootmap
    pub dir: PathBuf,
    /// Library name (`geom`) or library file name (`libgeom.so`)
    pub lib: String,
    /// Destination package name (default: the library name)
    #[arg(long)]
    pub package: Option<String>,
    /// Print the tree and report as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn handle_load(cmd: LoadCommand, _opts: &GlobalOpts) -> Result<()> {
    let config = LoaderConfig::load().context("Failed to load config")?;
    let lib = library_package(&cmd.lib, &config);

    logger::spinner_start(&format!("Loading {}", lib));
    let package = match LoadedPackage::open(&cmd.dir, &lib, &config) {
        Ok(package) => {
            logger::spinner_success(&format!(
                "Loaded {}",
                package.library().path().display()
            ));
            package
        }
        Err(e) => {
            logger::spinner_error(&format!("Failed to load {}", lib));
            return Err(e.into());
        }
    };

    // The library registered its entities with the reflection layer; preview
    // them through the names its rootmap declares.
    let registry = StaticRegistry::from_manifest(package.manifest(), config.umbrella_module());
    let mut tree = match cmd.package {
        Some(ref name) => rootmap_bindings::ModuleTree::new(name),
        None => package.new_tree(),
    };
    let report = package.materialize(&registry, &mut tree);
    print_tree(&tree, &report, cmd.json)
}
