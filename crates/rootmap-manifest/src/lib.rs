//! Rootmap manifest parsing
//!
//! A rootmap is the text file a reflection build step writes next to a compiled
//! library. It has two sections:
//!
//! ```text
//! { decls }
//! namespace geom { class Shape; }
//! [ libgeom.so ]
//! class geom::Shape
//! class geom::Holder<geom::Shape,int>
//! namespace geom
//! var geom::unit
//! header geom/shape.h
//! ```
//!
//! This crate turns that text into [`ManifestRecord`]s: one `(kind, path)` pair
//! per name the library exports. Per-line problems never abort a parse; they are
//! collected in [`Manifest::skipped`] instead.

pub mod errors;
pub mod names;
pub mod parser;
pub mod types;

pub use errors::ManifestError;
pub use parser::{
    parse_binding_line, parse_manifest, parse_str, read_from_path, top_level_namespaces,
};
pub use types::{LineSkip, Manifest, ManifestRecord, QualifiedPath, RecordKind, SkippedLine};
