//! Common types and utilities shared across commands

use clap::Parser;
use rootmap_config::{package_from_library, LoaderConfig};
use std::path::Path;

/// Global CLI options available to all commands
#[derive(Parser, Debug, Clone, Default)]
pub struct GlobalOpts {
    #[arg(short, long, global = true, help = "Decrease verbosity")]
    pub quiet: bool,

    #[arg(short, long, global = true, action = clap::ArgAction::Count, help = "Increase verbosity (-v for debug, -vv for trace)")]
    pub verbose: u8,
}

impl GlobalOpts {
    /// Get the effective verbosity level
    /// - 0: quiet/warn only
    /// - 1: debug (-v)
    /// - 2: trace (-vv)
    pub fn verbosity_level(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose
        }
    }
}

/// Destination package for a manifest when none is given on the command line.
///
/// Falls back from the configured `package` to the manifest file stem with the
/// library prefix removed (`libgeom.rootmap` -> `geom`).
pub fn default_package(manifest: &Path, config: &LoaderConfig) -> String {
    if let Some(ref package) = config.package {
        return package.clone();
    }
    let stem = manifest
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("package");
    let package = stem.strip_prefix(config.library_prefix()).unwrap_or(stem);
    if package.is_empty() {
        stem.to_string()
    } else {
        package.to_string()
    }
}

/// Package name for a LIB argument, accepting either the bare name (`geom`)
/// or the library file name (`libgeom.so`)
pub fn library_package(lib: &str, config: &LoaderConfig) -> String {
    package_from_library(Path::new(lib), config).unwrap_or_else(|| lib.to_string())
}
