use rootmap_config::PathError;
use rootmap_manifest::ManifestError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Compiled library not found: {}", .0.display())]
    LibraryNotFound(PathBuf),

    #[error("Failed to load library {}: {source}", .path.display())]
    Library {
        path: PathBuf,
        #[source]
        source: libloading::Error,
    },

    #[error(transparent)]
    Paths(#[from] PathError),

    #[error(transparent)]
    Manifest(#[from] ManifestError),
}
