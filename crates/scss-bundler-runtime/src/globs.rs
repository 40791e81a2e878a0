//! Glob expansion for dedupe file lists.
//!
//! Copyright (c) 2025 Posit, PBC
//!
//! The bundler's dedupe policy takes a list of concrete file paths; callers
//! usually hold glob patterns instead. This module materializes patterns into
//! absolute paths before they reach the core.

use std::path::PathBuf;

use crate::traits::{RuntimeError, RuntimeResult};

/// Expand glob patterns into absolute file paths.
///
/// Matches that are not regular files (directories, broken links) are
/// skipped. Relative matches are made absolute against the current working
/// directory. Pattern order is preserved; a pattern with no matches simply
/// contributes nothing.
///
/// # Errors
///
/// Returns `RuntimeError::Pattern` for a malformed pattern, or
/// `RuntimeError::Io` when a matched path cannot be inspected.
pub fn expand_globs(patterns: &[String]) -> RuntimeResult<Vec<PathBuf>> {
    let mut paths = Vec::new();

    for pattern in patterns {
        let entries = glob::glob(pattern)
            .map_err(|e| RuntimeError::Pattern(format!("{}: {}", pattern, e)))?;

        for entry in entries {
            let path = entry.map_err(|e| RuntimeError::Io(e.into_error()))?;
            if path.is_file() {
                paths.push(std::path::absolute(&path)?);
            }
        }
    }

    Ok(paths)
}
