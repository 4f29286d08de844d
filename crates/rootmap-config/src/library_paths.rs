//! Utility functions for locating a compiled binding library and its rootmap
//!
//! A binding package `geom` living in `pkg_dir` consists of:
//! - the shared library, `<prefix>geom<suffix>` (`libgeom.so`, `libgeom.dylib`, `geom.dll`)
//! - the manifest, `geom.rootmap`, or `libgeom.rootmap` as the dictionary
//!   generator names it when no explicit rootmap name is given

use crate::loader_config::LoaderConfig;
use std::path::{Path, PathBuf};

/// Shared library file name prefix on this platform
#[cfg(windows)]
pub const SHARED_LIBRARY_PREFIX: &str = "";
#[cfg(not(windows))]
pub const SHARED_LIBRARY_PREFIX: &str = "lib";

/// Shared library file name suffix on this platform
#[cfg(windows)]
pub const SHARED_LIBRARY_SUFFIX: &str = ".dll";
#[cfg(target_os = "macos")]
pub const SHARED_LIBRARY_SUFFIX: &str = ".dylib";
#[cfg(not(any(windows, target_os = "macos")))]
pub const SHARED_LIBRARY_SUFFIX: &str = ".so";

/// Extension of the manifest written next to the library
pub const MANIFEST_EXTENSION: &str = "rootmap";

/// Error type for binding path resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    /// The package directory does not exist or is not a directory
    DirectoryNotFound(PathBuf),
    /// No shared library with the expected name
    LibraryNotFound(PathBuf),
    /// Neither manifest candidate exists
    ManifestNotFound(PathBuf),
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::DirectoryNotFound(path) => {
                write!(f, "Package directory not found: {}", path.display())
            }
            PathError::LibraryNotFound(path) => {
                write!(f, "Compiled library not found: {}", path.display())
            }
            PathError::ManifestNotFound(path) => {
                write!(f, "Rootmap manifest not found: {}", path.display())
            }
        }
    }
}

impl std::error::Error for PathError {}

/// Files that make up one binding package
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindingPaths {
    /// Name the package is exposed under
    pub package: String,
    pub library: PathBuf,
    pub manifest: PathBuf,
}

/// `<prefix><package><suffix>`
pub fn library_file_name(package: &str, prefix: &str, suffix: &str) -> String {
    format!("{}{}{}", prefix, package, suffix)
}

/// `<stem>.rootmap`
pub fn manifest_file_name(stem: &str) -> String {
    format!("{}.{}", stem, MANIFEST_EXTENSION)
}

/// Recover the package name from a library file name.
///
/// `libgeom.so` -> `geom`. Returns `None` when the name does not carry the
/// configured suffix.
pub fn package_from_library(library: &Path, config: &LoaderConfig) -> Option<String> {
    let file_name = library.file_name()?.to_str()?;
    let stem = file_name.strip_suffix(config.library_suffix())?;
    let package = stem.strip_prefix(config.library_prefix()).unwrap_or(stem);
    if package.is_empty() {
        None
    } else {
        Some(package.to_string())
    }
}

/// Expected paths for `package` inside `pkg_dir`, without touching the filesystem.
///
/// The manifest is `<package>.rootmap`.
pub fn binding_paths(pkg_dir: &Path, package: &str, config: &LoaderConfig) -> BindingPaths {
    let library = pkg_dir.join(library_file_name(
        package,
        config.library_prefix(),
        config.library_suffix(),
    ));
    BindingPaths {
        package: package.to_string(),
        library,
        manifest: pkg_dir.join(manifest_file_name(package)),
    }
}

/// Resolve and check the library and manifest for `package` in `pkg_dir`
///
/// # Arguments
///
/// * `pkg_dir` - Directory holding the compiled library and its rootmap
/// * `package` - Package name, without platform prefix or suffix
/// * `config` - Supplies prefix/suffix overrides
///
/// # Returns
///
/// The resolved paths, or the first missing piece
pub fn resolve_binding_paths(
    pkg_dir: &Path,
    package: &str,
    config: &LoaderConfig,
) -> Result<BindingPaths, PathError> {
    if !pkg_dir.is_dir() {
        return Err(PathError::DirectoryNotFound(pkg_dir.to_path_buf()));
    }

    let mut paths = binding_paths(pkg_dir, package, config);
    if !paths.library.is_file() {
        return Err(PathError::LibraryNotFound(paths.library));
    }

    if !paths.manifest.is_file() {
        // Dictionary generator default: library file name with the extension swapped
        let fallback = pkg_dir.join(manifest_file_name(&format!(
            "{}{}",
            config.library_prefix(),
            package
        )));
        if !fallback.is_file() {
            return Err(PathError::ManifestNotFound(paths.manifest));
        }
        paths.manifest = fallback;
    }

    Ok(paths)
}
