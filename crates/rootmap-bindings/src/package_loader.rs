//! Loading a binding package end to end
//!
//! A package is a compiled library plus the rootmap written next to it.
//! Loading resolves both files, loads the library so it can register its
//! entities, and parses the rootmap. Materializing is a separate step because
//! only the host knows which registry the library registered with.

use crate::errors::LoadError;
use crate::library::NativeLibrary;
use crate::materializer::{MaterializeReport, Materializer};
use crate::registry::EntityRegistry;
use crate::tree::ModuleTree;
use rootmap_config::{resolve_binding_paths, BindingPaths, LoaderConfig};
use rootmap_manifest::{read_from_path, Manifest};
use std::path::Path;
use tracing::info;

#[derive(Debug)]
pub struct LoadedPackage {
    paths: BindingPaths,
    library: NativeLibrary,
    manifest: Manifest,
}

impl LoadedPackage {
    /// Resolve, load and parse `package` from `pkg_dir`
    pub fn open(pkg_dir: &Path, package: &str, config: &LoaderConfig) -> Result<Self, LoadError> {
        let paths = resolve_binding_paths(pkg_dir, package, config)?;
        let library = NativeLibrary::load(&paths.library)?;
        let manifest = read_from_path(&paths.manifest)?;

        info!(
            "Loaded package '{}' ({} records) from {}",
            paths.package,
            manifest.len(),
            paths.library.display()
        );
        Ok(LoadedPackage {
            paths,
            library,
            manifest,
        })
    }

    pub fn package(&self) -> &str {
        &self.paths.package
    }

    pub fn paths(&self) -> &BindingPaths {
        &self.paths
    }

    pub fn library(&self) -> &NativeLibrary {
        &self.library
    }

    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    /// A fresh tree named after the package
    pub fn new_tree(&self) -> ModuleTree {
        ModuleTree::new(&self.paths.package)
    }

    pub fn materialize<R: EntityRegistry + ?Sized>(
        &self,
        registry: &R,
        tree: &mut ModuleTree,
    ) -> MaterializeReport {
        Materializer::new(registry).materialize(self.manifest.unique_records(), tree)
    }
}

/// Parse the rootmap at `manifest_path` and attach its names to `tree`.
///
/// For hosts that load the library themselves. Only reading the file can fail;
/// per-record problems end up in the report.
pub fn load_manifest_into<R: EntityRegistry + ?Sized>(
    manifest_path: &Path,
    registry: &R,
    tree: &mut ModuleTree,
) -> Result<MaterializeReport, LoadError> {
    let manifest = read_from_path(manifest_path)?;
    Ok(Materializer::new(registry).materialize(manifest.unique_records(), tree))
}
