//! Error types for bundling operations.
//!
//! Copyright (c) 2025 Posit, PBC

use std::path::PathBuf;

use scss_bundler_runtime::RuntimeError;
use thiserror::Error;

/// Errors that can occur while bundling.
///
/// Unresolvable imports are not errors: they propagate by value as
/// `found: false` nodes in the result tree. Errors here are reserved for a
/// failed entry-file read, provider failures, and import cycles.
#[derive(Debug, Error)]
pub enum BundleError {
    /// An import resolved to a file that is already being bundled further up
    /// the call stack
    #[error("Circular import detected: {} (import chain: {})", .path.display(), .chain)]
    CircularImport {
        /// The file the back edge points at
        path: PathBuf,
        /// Rendered chain of files on the bundling stack
        chain: String,
    },

    /// Filesystem provider failure
    #[error("Runtime error: {0}")]
    Runtime(#[from] RuntimeError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_circular_import_display() {
        let err = BundleError::CircularImport {
            path: PathBuf::from("/styles/a.scss"),
            chain: "/styles/a.scss -> /styles/b.scss -> /styles/a.scss".to_string(),
        };

        let rendered = err.to_string();
        assert!(rendered.contains("Circular import"));
        assert!(rendered.contains("/styles/b.scss"));
    }
}
