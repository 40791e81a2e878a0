//! Shared file registry.
//!
//! Copyright (c) 2025 Posit, PBC

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Mapping from absolute file path to its (eventually fully bundled) text.
///
/// The registry is a shared-ownership handle: cloning it produces another
/// view of the same map, so every frame of a recursive bundle call — and
/// multiple bundler instances, when the caller passes one registry to each —
/// observes the same mutations. Each file is written at most twice: once to
/// seed raw content at first encounter, once to overwrite with bundled
/// content when its own recursion completes.
///
/// Callers may also seed entries up front to provide virtual content for
/// paths that do not exist on disk.
#[derive(Debug, Clone, Default)]
pub struct FileRegistry {
    inner: Arc<Mutex<HashMap<PathBuf, String>>>,
}

impl FileRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the registry has content for `path`.
    pub fn contains(&self, path: &Path) -> bool {
        self.lock().contains_key(path)
    }

    /// Current content for `path`, if any.
    pub fn get(&self, path: &Path) -> Option<String> {
        self.lock().get(path).cloned()
    }

    /// Insert or overwrite the content for `path`.
    pub fn insert(&self, path: impl Into<PathBuf>, content: impl Into<String>) {
        self.lock().insert(path.into(), content.into());
    }

    /// Number of registered files.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<PathBuf, String>> {
        // The guard never crosses a suspension point, so the lock is
        // uncontended in cooperative use and cannot deadlock
        self.inner.lock().expect("file registry lock poisoned")
    }
}
