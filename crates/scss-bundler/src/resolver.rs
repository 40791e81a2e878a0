//! Import path resolution.
//!
//! Copyright (c) 2025 Posit, PBC
//!
//! Maps a raw import reference to a concrete file, trying the SCSS naming
//! conventions in order:
//!
//! 1. append the default `.scss` extension when the reference has no
//!    recognized stylesheet extension
//! 2. rewrite package-style (`~`-prefixed) references onto
//!    `<project root>/node_modules/` (requires a configured project root;
//!    otherwise the literal string falls through to directory resolution)
//! 3. resolve relative to the importing file's directory
//! 4. retry with an underscore-prefixed base name (partial convention)
//! 5. retry with the plain `.css` extension
//! 6. repeat 2–5 with each include path standing in for the importing
//!    directory
//!
//! Resolution consults the registry only as a fast path: a candidate that is
//! already a registry key counts as found without touching storage.

use std::path::{Path, PathBuf};

use scss_bundler_runtime::SystemRuntime;
use tracing::debug;

use crate::paths::normalize;
use crate::registry::FileRegistry;

const DEFAULT_EXTENSION: &str = "scss";
const PLAIN_EXTENSION: &str = "css";
const PACKAGES_DIR: &str = "node_modules";

/// Outcome of resolving one raw import reference.
///
/// When nothing matched, `full_path` holds the last attempted candidate so
/// diagnostics can name a concrete path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// Resolved absolute path, or the last attempted candidate
    pub full_path: PathBuf,

    /// Whether the candidate exists
    pub found: bool,
}

/// Resolve a raw import reference against its context.
///
/// `context_dir` is the importing file's directory; `project_root` anchors
/// package-style references; `include_paths` are fallback context
/// directories tried in order.
pub async fn resolve_import(
    runtime: &dyn SystemRuntime,
    registry: &FileRegistry,
    raw_path: &str,
    context_dir: &Path,
    project_root: Option<&Path>,
    include_paths: &[PathBuf],
) -> Resolution {
    let raw = ensure_extension(raw_path);

    let mut attempt = resolve_in_dir(runtime, registry, &raw, context_dir, project_root).await;
    if attempt.found {
        return attempt;
    }

    for dir in include_paths {
        let retry = resolve_in_dir(runtime, registry, &raw, dir, project_root).await;
        if retry.found {
            debug!(
                import = raw_path,
                include_path = %dir.display(),
                "import resolved via include path"
            );
            return retry;
        }
        attempt = retry;
    }

    debug!(
        import = raw_path,
        candidate = %attempt.full_path.display(),
        "import did not resolve"
    );
    attempt
}

/// Append the default extension unless the reference already carries a
/// recognized stylesheet extension.
fn ensure_extension(raw_path: &str) -> String {
    let recognized = Path::new(raw_path)
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e == DEFAULT_EXTENSION || e == PLAIN_EXTENSION);

    if recognized {
        raw_path.to_string()
    } else {
        format!("{}.{}", raw_path, DEFAULT_EXTENSION)
    }
}

/// Try strategies 2–5 with `dir` as the context directory.
async fn resolve_in_dir(
    runtime: &dyn SystemRuntime,
    registry: &FileRegistry,
    raw: &str,
    dir: &Path,
    project_root: Option<&Path>,
) -> Resolution {
    // Package-style rewrite, anchored at the project root when one is
    // configured; otherwise the literal string resolves like any other
    // relative reference
    let candidate = match (raw.strip_prefix('~'), project_root) {
        (Some(rest), Some(root)) => normalize(&root.join(PACKAGES_DIR).join(rest)),
        _ => normalize(&dir.join(raw)),
    };

    if exists(runtime, registry, &candidate).await {
        return Resolution {
            full_path: candidate,
            found: true,
        };
    }

    // Partial convention: underscore-prefixed base name, same directory
    if let Some(partial) = with_underscore_prefix(&candidate) {
        if exists(runtime, registry, &partial).await {
            return Resolution {
                full_path: partial,
                found: true,
            };
        }
    }

    // Plain-stylesheet fallback for default-extension candidates
    let plain = candidate.with_extension(PLAIN_EXTENSION);
    let is_default = candidate
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e == DEFAULT_EXTENSION);
    if is_default && exists(runtime, registry, &plain).await {
        return Resolution {
            full_path: plain,
            found: true,
        };
    }

    Resolution {
        full_path: if is_default { plain } else { candidate },
        found: false,
    }
}

/// Existence probe with the registry fast path.
async fn exists(runtime: &dyn SystemRuntime, registry: &FileRegistry, path: &Path) -> bool {
    registry.contains(path) || runtime.is_file(path).await.unwrap_or(false)
}

fn with_underscore_prefix(path: &Path) -> Option<PathBuf> {
    let name = path.file_name()?.to_str()?;
    Some(path.with_file_name(format!("_{}", name)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use scss_bundler_runtime::NativeRuntime;

    fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&path, content).unwrap();
        path
    }

    async fn resolve(
        raw: &str,
        context_dir: &Path,
        project_root: Option<&Path>,
        include_paths: &[PathBuf],
    ) -> Resolution {
        let runtime = NativeRuntime::new();
        let registry = FileRegistry::new();
        resolve_import(
            &runtime,
            &registry,
            raw,
            context_dir,
            project_root,
            include_paths,
        )
        .await
    }

    #[test]
    fn test_ensure_extension() {
        assert_eq!(ensure_extension("colors"), "colors.scss");
        assert_eq!(ensure_extension("colors.scss"), "colors.scss");
        assert_eq!(ensure_extension("colors.css"), "colors.css");
        // Unrecognized extensions still get the default appended
        assert_eq!(ensure_extension("colors.theme"), "colors.theme.scss");
    }

    #[tokio::test]
    async fn test_extension_inference_is_idempotent() {
        let temp = tempfile::tempdir().unwrap();
        write(temp.path(), "colors.scss", "$c: red;");

        let bare = resolve("colors", temp.path(), None, &[]).await;
        let explicit = resolve("colors.scss", temp.path(), None, &[]).await;

        assert!(bare.found);
        assert_eq!(bare.full_path, explicit.full_path);
    }

    #[tokio::test]
    async fn test_partial_convention() {
        let temp = tempfile::tempdir().unwrap();
        write(temp.path(), "_colors.scss", "$c: red;");

        let resolution = resolve("colors", temp.path(), None, &[]).await;

        assert!(resolution.found);
        assert!(resolution.full_path.ends_with("_colors.scss"));
    }

    #[tokio::test]
    async fn test_plain_css_fallback() {
        let temp = tempfile::tempdir().unwrap();
        write(temp.path(), "reset.css", "* { margin: 0; }");

        let resolution = resolve("reset", temp.path(), None, &[]).await;

        assert!(resolution.found);
        assert!(resolution.full_path.ends_with("reset.css"));
    }

    #[tokio::test]
    async fn test_package_import_with_project_root() {
        let temp = tempfile::tempdir().unwrap();
        write(temp.path(), "node_modules/pkg/file.scss", "$p: 1;");
        let elsewhere = temp.path().join("src");
        std::fs::create_dir_all(&elsewhere).unwrap();

        let resolution = resolve("~pkg/file", &elsewhere, Some(temp.path()), &[]).await;

        assert!(resolution.found);
        assert_eq!(
            resolution.full_path,
            temp.path().join("node_modules/pkg/file.scss")
        );
    }

    #[tokio::test]
    async fn test_package_import_without_project_root_falls_through() {
        let temp = tempfile::tempdir().unwrap();
        // The literal string resolves relative to the context directory
        write(temp.path(), "~pkg/file.scss", "$p: 1;");

        let resolution = resolve("~pkg/file", temp.path(), None, &[]).await;

        assert!(resolution.found);
        assert_eq!(resolution.full_path, temp.path().join("~pkg/file.scss"));
    }

    #[tokio::test]
    async fn test_include_path_fallback() {
        let temp = tempfile::tempdir().unwrap();
        let shared = temp.path().join("shared");
        write(&shared, "_mixins.scss", "@mixin m { }");
        let src = temp.path().join("src");
        std::fs::create_dir_all(&src).unwrap();

        let resolution = resolve("mixins", &src, None, &[shared.clone()]).await;

        assert!(resolution.found);
        assert_eq!(resolution.full_path, shared.join("_mixins.scss"));
    }

    #[tokio::test]
    async fn test_include_paths_tried_in_order() {
        let temp = tempfile::tempdir().unwrap();
        let first = temp.path().join("first");
        let second = temp.path().join("second");
        write(&first, "theme.scss", "$t: 1;");
        write(&second, "theme.scss", "$t: 2;");
        let src = temp.path().join("src");
        std::fs::create_dir_all(&src).unwrap();

        let resolution =
            resolve("theme", &src, None, &[first.clone(), second.clone()]).await;

        assert!(resolution.found);
        assert_eq!(resolution.full_path, first.join("theme.scss"));
    }

    #[tokio::test]
    async fn test_not_found_keeps_last_candidate() {
        let temp = tempfile::tempdir().unwrap();
        let include = temp.path().join("inc");
        std::fs::create_dir_all(&include).unwrap();

        let resolution = resolve("ghost", temp.path(), None, &[include.clone()]).await;

        assert!(!resolution.found);
        // Last attempt was the plain-extension candidate in the last include path
        assert_eq!(resolution.full_path, include.join("ghost.css"));
    }

    #[tokio::test]
    async fn test_registry_fast_path() {
        let temp = tempfile::tempdir().unwrap();
        let runtime = NativeRuntime::new();
        let registry = FileRegistry::new();

        // Virtual file: exists only in the registry
        let virtual_path = temp.path().join("virtual.scss");
        registry.insert(virtual_path.clone(), "$v: 1;");

        let resolution = resolve_import(
            &runtime,
            &registry,
            "virtual",
            temp.path(),
            None,
            &[],
        )
        .await;

        assert!(resolution.found);
        assert_eq!(resolution.full_path, virtual_path);
    }
}
