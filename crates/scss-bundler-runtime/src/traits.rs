/*
 * traits.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Defines the SystemRuntime trait and supporting types for the runtime
 * abstraction layer.
 *
 * The bundling core treats the filesystem as a set of fallible async
 * primitives; this trait is that contract. Implementations decide where the
 * bytes actually live (real filesystem, test fixture, virtual overlay).
 */

use async_trait::async_trait;
use std::io;
use std::path::{Path, PathBuf};

/// Result type for runtime operations
pub type RuntimeResult<T> = Result<T, RuntimeError>;

/// Errors that can occur during runtime operations
#[derive(Debug)]
pub enum RuntimeError {
    /// Standard I/O error
    Io(io::Error),

    /// Malformed glob pattern
    Pattern(String),
}

impl std::fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RuntimeError::Io(e) => write!(f, "I/O error: {}", e),
            RuntimeError::Pattern(msg) => write!(f, "Invalid glob pattern: {}", msg),
        }
    }
}

impl std::error::Error for RuntimeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RuntimeError::Io(e) => Some(e),
            RuntimeError::Pattern(_) => None,
        }
    }
}

impl From<io::Error> for RuntimeError {
    fn from(e: io::Error) -> Self {
        RuntimeError::Io(e)
    }
}

/// Trait defining the filesystem operations the bundler depends on.
///
/// Every method that touches storage is async: existence probes and
/// reads/writes are suspension points, so concurrent resolution of sibling
/// imports can interleave on a single thread without blocking each other.
#[async_trait]
pub trait SystemRuntime: Send + Sync {
    /// Check if path exists and is a regular file.
    ///
    /// A missing path is `Ok(false)`, not an error.
    async fn is_file(&self, path: &Path) -> RuntimeResult<bool>;

    /// Read file contents as a UTF-8 string.
    async fn file_read_string(&self, path: &Path) -> RuntimeResult<String>;

    /// Write bytes to file (creates or overwrites).
    async fn file_write(&self, path: &Path, contents: &[u8]) -> RuntimeResult<()>;

    /// Create a directory, optionally with parents.
    async fn dir_create(&self, path: &Path, recursive: bool) -> RuntimeResult<()>;

    /// Get current working directory.
    fn cwd(&self) -> RuntimeResult<PathBuf>;

    /// Write a file, creating its parent directories first.
    ///
    /// Default implementation composes `dir_create` and `file_write`.
    async fn write_file_creating_dirs(&self, path: &Path, contents: &[u8]) -> RuntimeResult<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                self.dir_create(parent, true).await?;
            }
        }
        self.file_write(path, contents).await
    }
}
