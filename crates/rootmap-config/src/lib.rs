//! Configuration for rootmap loading
//!
//! Shared by `rootmap-bindings` (package loading) and the `rootmap` CLI:
//! - `loader_config`: the `rootmap.toml` file and its defaults
//! - `library_paths`: platform naming of compiled libraries and their rootmaps

pub mod library_paths;
pub mod loader_config;

pub use library_paths::{
    binding_paths, package_from_library, resolve_binding_paths, BindingPaths, PathError,
};
pub use loader_config::{ConfigError, LoaderConfig, CONFIG_ENV, DEFAULT_UMBRELLA_MODULE};
