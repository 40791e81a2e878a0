//! Result-tree and per-directive types.
//!
//! Copyright (c) 2025 Posit, PBC
//!
//! The type hierarchy is:
//! - BundleResult: one node of the recursive bundle tree — per file, whether
//!   it was found, its flattened text, and the results for its own imports
//! - ImportData: transient record for a single scanned directive, alive only
//!   while its parent file is being processed

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

fn is_false(value: &bool) -> bool {
    !*value
}

/// One node of the bundle result tree.
///
/// `imports` is empty exactly when the file's own content had no import
/// directives, or the node itself is `found: false`. The `deduped`,
/// `ignored`, and `tilde` markers are edge properties: they describe how the
/// parent referenced this file, and serialize only when set so that absent
/// and false coincide.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundleResult {
    /// Absolute path of the file (or of the last resolution candidate when
    /// not found)
    pub file_path: PathBuf,

    /// Whether the file was resolved to an existing source
    pub found: bool,

    /// Fully flattened text; present only for found, non-cache-hit nodes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bundled_content: Option<String>,

    /// Child results, in source order of the import directives
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub imports: Vec<BundleResult>,

    /// Content was suppressed by the dedupe policy on a repeat inclusion
    #[serde(default, skip_serializing_if = "is_false")]
    pub deduped: bool,

    /// Directive matched an ignore pattern and was passed through
    #[serde(default, skip_serializing_if = "is_false")]
    pub ignored: bool,

    /// Directive used a package-style (`~`-prefixed) path
    #[serde(default, skip_serializing_if = "is_false")]
    pub tilde: bool,
}

impl BundleResult {
    /// Node for a file that failed the existence check.
    pub fn not_found(file_path: impl Into<PathBuf>) -> Self {
        Self {
            file_path: file_path.into(),
            found: false,
            ..Default::default()
        }
    }
}

/// Transient record for one scanned import directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportData {
    /// Exact matched source text of the directive, used as the splice key
    pub import_string: String,

    /// Raw referenced string as written, before extension/tilde resolution
    pub path: String,

    /// Resolved absolute candidate
    pub full_path: PathBuf,

    /// Whether the candidate exists
    pub found: bool,

    /// Directive matched an ignore pattern
    pub ignored: bool,

    /// Package-style path
    pub tilde: bool,
}
