//! Record types produced by the rootmap parser
//!
//! This module provides:
//! - `RecordKind` for the declaration keywords the loader binds
//! - `QualifiedPath`, an `Arc<str>`-interned, inline `::`-split name
//! - `Manifest`, the parsed file with its skip ledger

use ahash::AHashSet;
use serde::{Serialize, Serializer};
use smallvec::SmallVec;
use std::fmt;
use std::sync::Arc;

/// Scope separator used in qualified names
pub const SCOPE_SEPARATOR: &str = "::";

// =============================================================================
// RECORD KIND
// =============================================================================

/// Kind of declaration a record was read from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    Namespace,
    Class,
    Variable,
    TypeAlias,
    Enum,
}

impl RecordKind {
    /// Map a section-2 keyword to a record kind.
    ///
    /// `header` is deliberately absent: header lines name source files, not
    /// bindable entities.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "namespace" => Some(RecordKind::Namespace),
            "class" => Some(RecordKind::Class),
            "var" => Some(RecordKind::Variable),
            "typedef" => Some(RecordKind::TypeAlias),
            "enum" => Some(RecordKind::Enum),
            _ => None,
        }
    }

    /// The keyword this kind is written as in a rootmap
    pub fn keyword(self) -> &'static str {
        match self {
            RecordKind::Namespace => "namespace",
            RecordKind::Class => "class",
            RecordKind::Variable => "var",
            RecordKind::TypeAlias => "typedef",
            RecordKind::Enum => "enum",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

// =============================================================================
// QUALIFIED PATH - never empty
// =============================================================================

/// A `::`-separated name split into its simple names.
///
/// Invariant: holds at least one segment. The last segment is the entity's own
/// name, the preceding ones are its enclosing scopes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QualifiedPath {
    segments: SmallVec<[Arc<str>; 4]>,
}

impl QualifiedPath {
    /// Split a qualified name on `::`.
    ///
    /// Empty segments (a leading `::` for the global scope) are dropped. Returns
    /// `None` when nothing is left.
    pub fn parse(name: &str) -> Option<Self> {
        Self::from_segments(name.split(SCOPE_SEPARATOR))
    }

    /// Build a path from already-split segments, dropping empty ones
    pub fn from_segments<I, S>(segments: I) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let segments: SmallVec<[Arc<str>; 4]> = segments
            .into_iter()
            .map(|s| s.as_ref().trim().to_string())
            .filter(|s| !s.is_empty())
            .map(Arc::from)
            .collect();

        if segments.is_empty() {
            None
        } else {
            Some(QualifiedPath { segments })
        }
    }

    /// Number of simple names in the path
    #[inline]
    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    pub fn segments(&self) -> &[Arc<str>] {
        &self.segments
    }

    /// The enclosing scopes, outermost first
    pub fn prefix(&self) -> &[Arc<str>] {
        &self.segments[..self.segments.len() - 1]
    }

    /// The entity's own simple name
    pub fn simple_name(&self) -> &Arc<str> {
        &self.segments[self.segments.len() - 1]
    }

    /// The path joined back with `::`
    pub fn qualified_name(&self) -> String {
        self.join(SCOPE_SEPARATOR)
    }

    /// The path joined with `.`, the way it appears under a package
    pub fn dotted(&self) -> String {
        self.join(".")
    }

    pub fn starts_with(&self, other: &QualifiedPath) -> bool {
        self.segments.starts_with(&other.segments)
    }

    fn join(&self, separator: &str) -> String {
        self.segments
            .iter()
            .map(|s| s.as_ref())
            .collect::<Vec<_>>()
            .join(separator)
    }
}

impl fmt::Display for QualifiedPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.qualified_name())
    }
}

impl Serialize for QualifiedPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

// =============================================================================
// RECORDS AND SKIPS
// =============================================================================

/// One bindable name read from the manifest
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ManifestRecord {
    pub kind: RecordKind,
    pub path: QualifiedPath,
    /// 1-based source line
    pub line: usize,
}

impl ManifestRecord {
    pub fn new(kind: RecordKind, path: QualifiedPath, line: usize) -> Self {
        ManifestRecord { kind, path, line }
    }

    #[inline]
    pub fn depth(&self) -> usize {
        self.path.depth()
    }
}

/// Why a manifest line produced no records
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum LineSkip {
    Blank,
    Comment,
    /// `header <file>` lines reference sources, not entities
    Header,
    /// Keyword without a value
    MissingValue { keyword: String },
    UnknownKeyword { keyword: String },
    /// Value present but every token was a delimiter, digit or primitive
    NoNames { keyword: String },
}

impl LineSkip {
    /// Blank and comment lines are expected layout, not worth reporting
    pub fn is_layout(&self) -> bool {
        matches!(self, LineSkip::Blank | LineSkip::Comment)
    }
}

impl fmt::Display for LineSkip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LineSkip::Blank => write!(f, "blank line"),
            LineSkip::Comment => write!(f, "comment"),
            LineSkip::Header => write!(f, "header reference"),
            LineSkip::MissingValue { keyword } => write!(f, "'{}' without a name", keyword),
            LineSkip::UnknownKeyword { keyword } => write!(f, "unknown keyword '{}'", keyword),
            LineSkip::NoNames { keyword } => {
                write!(f, "'{}' line has no bindable names", keyword)
            }
        }
    }
}

/// A line that was read but contributed nothing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedLine {
    pub line: usize,
    #[serde(flatten)]
    pub reason: LineSkip,
}

// =============================================================================
// MANIFEST
// =============================================================================

/// A parsed rootmap
#[derive(Debug, Clone, Default, Serialize)]
pub struct Manifest {
    /// Library names from the `[ ... ]` section headers
    pub libraries: Vec<Arc<str>>,
    /// Raw forward-declaration lines from the first section
    pub declarations: Vec<String>,
    /// Records in file order
    pub records: Vec<ManifestRecord>,
    /// Non-layout lines that produced no records
    pub skipped: Vec<SkippedLine>,
}

impl Manifest {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Deepest qualified path in the manifest, 0 when empty
    pub fn max_depth(&self) -> usize {
        self.records.iter().map(ManifestRecord::depth).max().unwrap_or(0)
    }

    /// Records with duplicate paths removed, keeping the first occurrence.
    ///
    /// Template argument lists repeat the same names many times; the loader only
    /// needs each path once.
    pub fn unique_records(&self) -> Vec<&ManifestRecord> {
        let mut seen: AHashSet<&QualifiedPath> = AHashSet::with_capacity(self.records.len());
        self.records
            .iter()
            .filter(|record| seen.insert(&record.path))
            .collect()
    }

    /// Distinct paths recorded with the given kind, in file order
    pub fn names_by_kind(&self, kind: RecordKind) -> Vec<&QualifiedPath> {
        let mut seen: AHashSet<&QualifiedPath> = AHashSet::new();
        self.records
            .iter()
            .filter(|record| record.kind == kind)
            .map(|record| &record.path)
            .filter(|path| seen.insert(*path))
            .collect()
    }
}
