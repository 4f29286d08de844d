//! Heuristic name extraction from rootmap values
//!
//! A value such as `geom::Holder<geom::Shape,int>` names the template itself and
//! every type in its argument list. There is no template grammar here: the value
//! is cut on angle brackets, parentheses, commas, `&`, `*` and whitespace, and
//! every remaining token is treated as its own qualified name.

use crate::types::QualifiedPath;

/// Tokens that can appear in argument lists but never name a bindable entity
const PRIMITIVE_KEYWORDS: &[&str] = &[
    "bool", "char", "short", "int", "unsigned", "long", "float", "double", "void",
];

#[inline]
pub fn is_name_delimiter(ch: char) -> bool {
    matches!(ch, '<' | '>' | '(' | ')' | ',' | '&' | '*') || ch.is_whitespace()
}

/// Non-type template arguments (`std::array<int,3>`) and builtin types
pub fn is_filtered_token(token: &str) -> bool {
    token.bytes().all(|b| b.is_ascii_digit()) || PRIMITIVE_KEYWORDS.contains(&token)
}

/// Split a value into candidate name tokens, in order of appearance
pub fn split_names(value: &str) -> impl Iterator<Item = &str> {
    value
        .split(is_name_delimiter)
        .filter(|token| !token.is_empty())
        .filter(|token| !is_filtered_token(token))
}

/// Every qualified path a value references
pub fn candidate_paths(value: &str) -> Vec<QualifiedPath> {
    split_names(value).filter_map(QualifiedPath::parse).collect()
}
