//! Recursive SCSS import bundling.
//!
//! Copyright (c) 2025 Posit, PBC
//!
//! This crate flattens a tree of SCSS partials connected by `@import`
//! directives into one self-contained document a downstream compiler can
//! consume. It provides:
//!
//! - [`Bundler`]: the recursive engine — scans directives, resolves each
//!   through the SCSS naming conventions, bundles every file exactly once,
//!   and splices flattened content into the parent text
//! - [`FileRegistry`]: shared path→content cache, seedable by callers and
//!   reusable across entry points
//! - [`BundleResult`]: the per-file result tree with dedupe/ignore/package
//!   markers
//!
//! The bundler treats all non-import stylesheet syntax as opaque text;
//! compilation itself is a collaborator behind `scss-bundler-runtime`.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use scss_bundler::Bundler;
//! use scss_bundler_runtime::NativeRuntime;
//!
//! let mut bundler = Bundler::new(Arc::new(NativeRuntime::new()))
//!     .with_project_root("/project");
//! let result = bundler
//!     .bundle("styles/main.scss".as_ref(), &[], &[], &[])
//!     .await?;
//! println!("{}", result.bundled_content.unwrap_or_default());
//! ```

mod bundler;
mod error;
mod paths;
mod registry;
mod resolver;
mod scanner;
mod types;

pub use bundler::Bundler;
pub use error::BundleError;
pub use paths::normalize;
pub use registry::FileRegistry;
pub use resolver::{Resolution, resolve_import};
pub use scanner::{ImportMatch, scan_imports, strip_commented_imports};
pub use types::{BundleResult, ImportData};
