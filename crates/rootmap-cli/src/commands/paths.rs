use crate::logger;
use crate::common::library_package;
use crate::GlobalOpts;
use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use rootmap_config::{binding_paths, resolve_binding_paths, LoaderConfig};
use std::path::PathBuf;

#[derive(Args, Debug, Clone)]
pub struct PathsCommand {
    /// Directory holding the compiled library and its rootmap
    pub dir: PathBuf,
    /// Library name (`geom`) or library file name (`libgeom.so`)
    pub lib: String,
    /// Print the expected paths without checking that they exist
    #[arg(long)]
    pub unchecked: bool,
}

pub fn handle_paths(cmd: PathsCommand, _opts: &GlobalOpts) -> Result<()> {
    let config = LoaderConfig::load().context("Failed to load config")?;
    let package = library_package(&cmd.lib, &config);
    logger::debug(&format!(
        "Resolving '{}' in {} (prefix '{}', suffix '{}')",
        package,
        cmd.dir.display(),
        config.library_prefix(),
        config.library_suffix()
    ));

    let paths = if cmd.unchecked {
        binding_paths(&cmd.dir, &package, &config)
    } else {
        resolve_binding_paths(&cmd.dir, &package, &config)?
    };

    println!("{}: {}", "package".cyan(), paths.package);
    println!("{}: {}", "library".cyan(), paths.library.display());
    println!("{}: {}", "manifest".cyan(), paths.manifest.display());
    Ok(())
}
