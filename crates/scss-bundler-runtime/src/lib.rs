/*
 * scss-bundler-runtime
 * Copyright (c) 2025 Posit, PBC
 *
 * Runtime abstraction layer for the SCSS bundler.
 *
 * This crate provides the collaborators the bundling core consumes but does
 * not implement:
 *
 * - SystemRuntime: trait for async filesystem access (existence checks,
 *   UTF-8 reads, writes, directory creation)
 * - NativeRuntime: default provider backed by tokio::fs
 * - compile_scss / compile_scss_with_packages: grass-backed SCSS compilation
 *   with structured errors and package-import resolution
 * - expand_globs: glob expansion for dedupe file lists
 */

mod compile;
mod globs;
mod native;
mod traits;

// Re-export core types (API surface)
pub use traits::{RuntimeError, RuntimeResult, SystemRuntime};

// Re-export runtime implementations
pub use native::NativeRuntime;

// Re-export compiler integration
pub use compile::{PackageFs, SassCompileError, compile_scss, compile_scss_with_packages};

// Re-export glob expansion
pub use globs::expand_globs;

/// Create a default runtime for the current platform.
///
/// Returns a NativeRuntime with full filesystem access.
pub fn default_runtime() -> NativeRuntime {
    NativeRuntime::new()
}
