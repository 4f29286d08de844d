//! Rootmap parser
//!
//! Reads a rootmap line by line. Lines before the first `[`-prefixed header are
//! forward declarations, from which only top-level `namespace` names are kept.
//! Lines after it are `<keyword> <names>` bindings. Every line yields either
//! records or a [`LineSkip`]; only I/O failures abort the parse.

use crate::errors::ManifestError;
use crate::names::candidate_paths;
use crate::types::{LineSkip, Manifest, ManifestRecord, QualifiedPath, RecordKind, SkippedLine};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

/// Marker line the reflection build writes before its forward declarations
const DECLS_MARKER: &str = "{ decls }";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Declarations,
    Bindings,
}

struct ManifestBuilder {
    section: Section,
    manifest: Manifest,
}

impl ManifestBuilder {
    fn new() -> Self {
        ManifestBuilder {
            section: Section::Declarations,
            manifest: Manifest::default(),
        }
    }

    fn feed(&mut self, line_no: usize, raw: &str) {
        let line = raw.trim();

        if line.starts_with('[') {
            if self.section == Section::Declarations {
                debug!("Bindings section starts at line {}", line_no);
            }
            self.section = Section::Bindings;
            self.manifest.libraries.extend(library_names(line));
            return;
        }

        match self.section {
            Section::Declarations => self.feed_declaration(line_no, line),
            Section::Bindings => self.feed_binding(line_no, line),
        }
    }

    fn feed_declaration(&mut self, line_no: usize, line: &str) {
        if line.is_empty() || line == DECLS_MARKER || line.starts_with('#') {
            return;
        }

        for path in top_level_namespaces(line) {
            self.manifest
                .records
                .push(ManifestRecord::new(RecordKind::Namespace, path, line_no));
        }
        self.manifest.declarations.push(line.to_string());
    }

    fn feed_binding(&mut self, line_no: usize, line: &str) {
        match parse_binding_line(line) {
            Ok((kind, paths)) => {
                self.manifest.records.extend(
                    paths
                        .into_iter()
                        .map(|path| ManifestRecord::new(kind, path, line_no)),
                );
            }
            Err(reason) if reason.is_layout() => {}
            Err(reason) => {
                debug!("Skipping manifest line {}: {}", line_no, reason);
                self.manifest.skipped.push(SkippedLine {
                    line: line_no,
                    reason,
                });
            }
        }
    }

    fn finish(self) -> Manifest {
        self.manifest
    }
}

/// Parse a rootmap from any buffered reader.
///
/// Fails only when the reader fails (including invalid UTF-8).
pub fn parse_manifest<R: BufRead>(reader: R) -> Result<Manifest, ManifestError> {
    let mut builder = ManifestBuilder::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        builder.feed(idx + 1, &line);
    }
    Ok(builder.finish())
}

/// Parse rootmap text that is already in memory
pub fn parse_str(content: &str) -> Manifest {
    let mut builder = ManifestBuilder::new();
    for (idx, line) in content.lines().enumerate() {
        builder.feed(idx + 1, line);
    }
    builder.finish()
}

/// Read and parse the rootmap at `path`
pub fn read_from_path(path: &Path) -> Result<Manifest, ManifestError> {
    debug!("Reading manifest from: {:?}", path);

    let read_error = |source: std::io::Error| ManifestError::Read {
        path: path.to_path_buf(),
        source,
    };

    let file = File::open(path).map_err(read_error)?;
    let manifest = parse_manifest(BufReader::new(file)).map_err(|err| match err {
        ManifestError::Io(source) => read_error(source),
        other => other,
    })?;

    info!(
        "Manifest {:?}: {} records, {} skipped lines, libraries {:?}",
        path,
        manifest.records.len(),
        manifest.skipped.len(),
        manifest.libraries
    );
    Ok(manifest)
}

/// Parse one bindings-section line into its kind and referenced paths
pub fn parse_binding_line(line: &str) -> Result<(RecordKind, Vec<QualifiedPath>), LineSkip> {
    let line = line.trim();
    if line.is_empty() {
        return Err(LineSkip::Blank);
    }
    if line.starts_with('#') {
        return Err(LineSkip::Comment);
    }

    let Some((keyword, value)) = line.split_once(char::is_whitespace) else {
        return Err(LineSkip::MissingValue {
            keyword: line.to_string(),
        });
    };
    let value = value.trim();
    if value.is_empty() {
        return Err(LineSkip::MissingValue {
            keyword: keyword.to_string(),
        });
    }

    if keyword == "header" {
        return Err(LineSkip::Header);
    }

    let Some(kind) = RecordKind::from_keyword(keyword) else {
        return Err(LineSkip::UnknownKeyword {
            keyword: keyword.to_string(),
        });
    };

    let paths = candidate_paths(value);
    if paths.is_empty() {
        return Err(LineSkip::NoNames {
            keyword: keyword.to_string(),
        });
    }

    Ok((kind, paths))
}

/// Names of the `namespace` declarations at brace depth zero.
///
/// `namespace A { namespace B { class C; } } namespace D { }` gives `A` and `D`.
/// Anonymous namespaces are ignored.
pub fn top_level_namespaces(line: &str) -> Vec<QualifiedPath> {
    let mut found = Vec::new();
    let mut depth = 0usize;
    let mut tokens = declaration_tokens(line).into_iter().peekable();

    while let Some(token) = tokens.next() {
        match token {
            "{" => depth += 1,
            "}" => depth = depth.saturating_sub(1),
            "namespace" if depth == 0 => {
                let name = tokens.next_if(|next| !matches!(*next, "{" | "}" | ";"));
                if let Some(path) = name.and_then(QualifiedPath::parse) {
                    found.push(path);
                }
            }
            _ => {}
        }
    }

    found
}

/// Whitespace-separated words, with `{`, `}` and `;` as tokens of their own
fn declaration_tokens(line: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut start: Option<usize> = None;

    for (idx, ch) in line.char_indices() {
        let is_punct = matches!(ch, '{' | '}' | ';');
        if ch.is_whitespace() || is_punct {
            if let Some(begin) = start.take() {
                tokens.push(&line[begin..idx]);
            }
            if is_punct {
                tokens.push(&line[idx..idx + ch.len_utf8()]);
            }
        } else if start.is_none() {
            start = Some(idx);
        }
    }
    if let Some(begin) = start {
        tokens.push(&line[begin..]);
    }

    tokens
}

/// `[ libA.so libB.so ]` -> `libA.so`, `libB.so`
fn library_names(header: &str) -> Vec<Arc<str>> {
    let inner = header.trim_start_matches('[');
    let inner = inner.split(']').next().unwrap_or_default();
    inner.split_whitespace().map(Arc::from).collect()
}
