//! Dynamic loading of a compiled binding library
//!
//! The library registers its entities with the reflection layer from its own
//! static initializers, so loading it is all the loader has to do. Those
//! entities must outlive any handle the caller holds, so loaded libraries are
//! parked in a process-wide table and never unloaded.

use crate::errors::LoadError;
use ahash::AHashMap;
use once_cell::sync::Lazy;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use tracing::debug;

/// Every library this process has loaded, keyed by canonical path
static LOADED_LIBRARIES: Lazy<Mutex<AHashMap<PathBuf, libloading::Library>>> =
    Lazy::new(|| Mutex::new(AHashMap::new()));

#[derive(Debug, Clone)]
pub struct NativeLibrary {
    path: PathBuf,
}

impl NativeLibrary {
    /// Load the shared library at `lib_path`.
    ///
    /// On Unix this uses RTLD_NOW | RTLD_GLOBAL so every symbol is resolved up
    /// front and visible to libraries loaded afterwards, which the reflection
    /// layer relies on when it instantiates templates across libraries.
    /// Loading a path that is already loaded reuses the existing handle.
    pub fn load(lib_path: &Path) -> Result<Self, LoadError> {
        if !lib_path.exists() {
            return Err(LoadError::LibraryNotFound(lib_path.to_path_buf()));
        }
        let key = canonical_key(lib_path);

        let mut loaded = LOADED_LIBRARIES
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if loaded.contains_key(&key) {
            debug!("Library already loaded: {}", lib_path.display());
            return Ok(Self {
                path: lib_path.to_path_buf(),
            });
        }

        debug!("Loading compiled library: {}", lib_path.display());

        #[cfg(unix)]
        let library = Self::open_unix(lib_path)?;

        #[cfg(windows)]
        let library = Self::open_windows(lib_path)?;

        loaded.insert(key, library);
        debug!("Library loaded: {}", lib_path.display());
        Ok(Self {
            path: lib_path.to_path_buf(),
        })
    }

    /// Whether `lib_path` has been loaded by this process
    pub fn is_loaded(lib_path: &Path) -> bool {
        LOADED_LIBRARIES
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(&canonical_key(lib_path))
    }

    #[cfg(unix)]
    fn open_unix(lib_path: &Path) -> Result<libloading::Library, LoadError> {
        use libloading::os::unix::{Library, RTLD_GLOBAL, RTLD_NOW};

        // SAFETY: running the library's initializers is the point of loading it
        let library = unsafe { Library::open(Some(lib_path), RTLD_NOW | RTLD_GLOBAL) }.map_err(
            |source| LoadError::Library {
                path: lib_path.to_path_buf(),
                source,
            },
        )?;
        Ok(library.into())
    }

    #[cfg(windows)]
    fn open_windows(lib_path: &Path) -> Result<libloading::Library, LoadError> {
        // SAFETY: running the library's initializers is the point of loading it
        unsafe { libloading::Library::new(lib_path) }.map_err(|source| LoadError::Library {
            path: lib_path.to_path_buf(),
            source,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn canonical_key(lib_path: &Path) -> PathBuf {
    std::fs::canonicalize(lib_path).unwrap_or_else(|_| lib_path.to_path_buf())
}
