//! Namespace materializer for rootmap packages
//!
//! Takes the records a rootmap declares, resolves each one in a
//! foreign-entity registry and attaches the result to a [`ModuleTree`] named
//! after the destination package:
//!
//! ```text
//! class Foo          ->  pkg.Foo           bound entity
//! class Foo::Bar     ->  pkg.Foo.Bar       bound entity, module "pkg.Foo"
//! namespace NS       ->  pkg.NS            placeholder
//! var NS::count      ->  pkg.NS.count      bound entity, module "pkg.NS"
//! ```
//!
//! The crate also loads the compiled library that registers those entities
//! ([`NativeLibrary`], [`LoadedPackage`]).

pub mod entity;
pub mod errors;
pub mod library;
pub mod materializer;
pub mod package_loader;
pub mod registry;
pub mod tree;

pub use entity::{EntityId, EntityKind, EntityRef, ForeignEntity, Relabeled, StaticEntity};
pub use errors::LoadError;
pub use library::NativeLibrary;
pub use materializer::{
    Applied, MaterializeReport, Materializer, RecordResult, SkipReason, SkippedRecord,
};
pub use package_loader::{load_manifest_into, LoadedPackage};
pub use registry::{EntityRegistry, StaticRegistry};
pub use tree::{ModuleTree, Node, NodeKind};
