use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that make a manifest unusable as a whole
#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to read manifest '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
