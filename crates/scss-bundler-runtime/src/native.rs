/*
 * native.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * NativeRuntime: filesystem provider backed by tokio::fs.
 */

use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::traits::{RuntimeResult, SystemRuntime};

/// Default runtime with full filesystem access.
#[derive(Debug, Clone, Default)]
pub struct NativeRuntime;

impl NativeRuntime {
    /// Create a new native runtime.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl SystemRuntime for NativeRuntime {
    async fn is_file(&self, path: &Path) -> RuntimeResult<bool> {
        match tokio::fs::metadata(path).await {
            Ok(meta) => Ok(meta.is_file()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    async fn file_read_string(&self, path: &Path) -> RuntimeResult<String> {
        Ok(tokio::fs::read_to_string(path).await?)
    }

    async fn file_write(&self, path: &Path, contents: &[u8]) -> RuntimeResult<()> {
        Ok(tokio::fs::write(path, contents).await?)
    }

    async fn dir_create(&self, path: &Path, recursive: bool) -> RuntimeResult<()> {
        if recursive {
            Ok(tokio::fs::create_dir_all(path).await?)
        } else {
            Ok(tokio::fs::create_dir(path).await?)
        }
    }

    fn cwd(&self) -> RuntimeResult<PathBuf> {
        Ok(std::env::current_dir()?)
    }
}
