//! Recursive import bundling.
//!
//! Copyright (c) 2025 Posit, PBC
//!
//! The bundler walks the implicit import graph from an entry file: it scans
//! a file's directives, resolves them concurrently, recurses into each
//! newly discovered import, and splices the flattened content back into the
//! parent text. Each file is bundled at most once per bundler instance; a
//! repeat reference reuses the cached subtree and the registry content.
//!
//! Two phases per file keep the shared state deterministic: resolution fans
//! out concurrently (independent existence probes, no shared-state writes),
//! then splicing and registry/usage mutation run strictly sequentially in
//! source order. The check-and-mark step on the usage tracker never crosses
//! a suspension point.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use futures::FutureExt;
use futures::future::{BoxFuture, join_all};
use regex::Regex;
use tracing::{debug, warn};

use scss_bundler_runtime::SystemRuntime;

use crate::error::BundleError;
use crate::paths::normalize;
use crate::registry::FileRegistry;
use crate::resolver::resolve_import;
use crate::scanner::{scan_imports, strip_commented_imports};
use crate::types::{BundleResult, ImportData};

/// Per-call configuration, shared by every frame of one `bundle()` call.
struct BundlePass {
    dedupe_files: Vec<PathBuf>,
    include_paths: Vec<PathBuf>,
    ignore_patterns: Vec<Regex>,
}

/// Recursive import bundler.
///
/// The registry, usage tracker, and by-file cache live for the instance's
/// lifetime, so several `bundle()` calls on one instance intentionally
/// cross-dedupe. Supplying an external [`FileRegistry`] extends that sharing
/// across instances.
pub struct Bundler {
    runtime: Arc<dyn SystemRuntime>,
    registry: FileRegistry,
    project_root: Option<PathBuf>,
    used_imports: HashMap<PathBuf, usize>,
    imports_by_file: HashMap<PathBuf, Vec<BundleResult>>,
    /// Files on the current recursion stack (cycle guard)
    bundling: Vec<PathBuf>,
}

impl Bundler {
    /// Create a bundler with its own empty registry.
    pub fn new(runtime: Arc<dyn SystemRuntime>) -> Self {
        Self::with_registry(runtime, FileRegistry::new())
    }

    /// Create a bundler observing (and mutating) a caller-supplied registry.
    pub fn with_registry(runtime: Arc<dyn SystemRuntime>, registry: FileRegistry) -> Self {
        Self {
            runtime,
            registry,
            project_root: None,
            used_imports: HashMap::new(),
            imports_by_file: HashMap::new(),
            bundling: Vec::new(),
        }
    }

    /// Set the project root used to anchor package-style imports and to
    /// resolve a relative entry file.
    pub fn with_project_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.project_root = Some(root.into());
        self
    }

    /// The registry this bundler reads and writes.
    pub fn registry(&self) -> &FileRegistry {
        &self.registry
    }

    /// Bundle an entry file into one flattened document.
    ///
    /// `dedupe_file_paths` lists files whose content is suppressed on repeat
    /// inclusion; `include_paths` are fallback resolution directories;
    /// `ignore_import_patterns` select directives (matched against the raw
    /// path as written) that are passed through to the downstream compiler
    /// instead of being inlined.
    ///
    /// A missing entry file is not an error: the result is a single
    /// `found: false` node carrying the path as supplied.
    pub async fn bundle(
        &mut self,
        entry_file: &Path,
        dedupe_file_paths: &[PathBuf],
        include_paths: &[PathBuf],
        ignore_import_patterns: &[Regex],
    ) -> Result<BundleResult, BundleError> {
        let base = match &self.project_root {
            Some(root) => root.clone(),
            None => self.runtime.cwd()?,
        };
        let full_path = normalize(&base.join(entry_file));

        if !self.registry.contains(&full_path) && !self.runtime.is_file(&full_path).await? {
            warn!(entry = %entry_file.display(), "entry file not found");
            return Ok(BundleResult::not_found(entry_file));
        }

        let content = match self.registry.get(&full_path) {
            Some(content) => content,
            None => self.runtime.file_read_string(&full_path).await?,
        };

        let pass = BundlePass {
            dedupe_files: dedupe_file_paths
                .iter()
                .map(|p| normalize(&base.join(p)))
                .collect(),
            include_paths: include_paths
                .iter()
                .map(|p| normalize(&base.join(p)))
                .collect(),
            ignore_patterns: ignore_import_patterns.to_vec(),
        };

        self.bundle_internal(full_path, content, &pass).await
    }

    /// Cycle-guarded recursion entry.
    ///
    /// Boxing breaks the infinitely-sized future that direct async recursion
    /// would create.
    fn bundle_internal<'a>(
        &'a mut self,
        file_path: PathBuf,
        content: String,
        pass: &'a BundlePass,
    ) -> BoxFuture<'a, Result<BundleResult, BundleError>> {
        async move {
            if self.bundling.contains(&file_path) {
                let chain = self
                    .bundling
                    .iter()
                    .chain(std::iter::once(&file_path))
                    .map(|p| p.display().to_string())
                    .collect::<Vec<_>>()
                    .join(" -> ");
                return Err(BundleError::CircularImport {
                    path: file_path,
                    chain,
                });
            }

            self.bundling.push(file_path.clone());
            let result = self.bundle_file(file_path, content, pass).await;
            self.bundling.pop();
            result
        }
        .boxed()
    }

    async fn bundle_file(
        &mut self,
        file_path: PathBuf,
        content: String,
        pass: &BundlePass,
    ) -> Result<BundleResult, BundleError> {
        let file_path = normalize(&file_path);
        debug!(file = %file_path.display(), "bundling");

        // Comment-embedded directives are scrubbed up front so they can
        // never match as real imports or survive into the output
        let mut content = strip_commented_imports(&content);

        if !self.registry.contains(&file_path) {
            self.registry.insert(file_path.clone(), content.clone());
        }

        let context_dir = file_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));

        // Resolution fans out concurrently; output ordering follows source
        // order in the sequential phase below, not I/O completion order
        let matches = scan_imports(&content);
        let resolutions = {
            let runtime = &self.runtime;
            let registry = &self.registry;
            let project_root = self.project_root.as_deref();
            let context_dir = &context_dir;
            let include_paths = &pass.include_paths;
            join_all(matches.iter().map(|m| async move {
                resolve_import(
                    runtime.as_ref(),
                    registry,
                    &m.path,
                    context_dir,
                    project_root,
                    include_paths,
                )
                .await
            }))
            .await
        };

        let imports: Vec<ImportData> = matches
            .into_iter()
            .zip(resolutions)
            .map(|(m, resolution)| ImportData {
                ignored: pass.ignore_patterns.iter().any(|rx| rx.is_match(&m.path)),
                tilde: m.path.starts_with('~'),
                import_string: m.import_string,
                path: m.path,
                full_path: resolution.full_path,
                found: resolution.found,
            })
            .collect();

        // Sequential phase: splicing and registry/usage mutation, in source
        // order
        let mut children: Vec<BundleResult> = Vec::with_capacity(imports.len());
        for import in imports {
            if !import.found {
                warn!(
                    import = %import.full_path.display(),
                    from = %file_path.display(),
                    "import not found"
                );
                replace_last(
                    &mut content,
                    &import.import_string,
                    &unresolved_placeholder(&import.import_string),
                );
                children.push(edge_not_found(&import));
                continue;
            }

            let first_use = !self.used_imports.contains_key(&import.full_path);
            let usage;
            let mut degraded = false;

            let mut child = if first_use {
                // Check-and-mark is one step: no suspension point sits
                // between the lookup above and this insert
                self.used_imports.insert(import.full_path.clone(), 1);
                usage = 1;

                match self.descend(&import, pass).await {
                    Ok(node) => node,
                    Err(err) => {
                        warn!(
                            import = %import.full_path.display(),
                            from = %file_path.display(),
                            error = %err,
                            "import degraded to not-found"
                        );
                        degraded = true;
                        edge_not_found(&import)
                    }
                }
            } else {
                let count = self
                    .used_imports
                    .get_mut(&import.full_path)
                    .expect("usage count present for repeat import");
                *count += 1;
                usage = *count;

                // Cache hit: reuse the previously computed subtree, never
                // re-descend
                BundleResult {
                    file_path: import.full_path.clone(),
                    found: true,
                    imports: self
                        .imports_by_file
                        .get(&import.full_path)
                        .cloned()
                        .unwrap_or_default(),
                    ..Default::default()
                }
            };
            child.ignored = import.ignored;
            child.tilde = import.tilde;

            // Splice text: pass-through for first-use ignored imports (None
            // leaves the directive in place), registry content otherwise
            let mut splice = if degraded {
                Some(unresolved_placeholder(&import.import_string))
            } else if import.ignored {
                (usage > 1).then(String::new)
            } else {
                Some(self.registry.get(&import.full_path).unwrap_or_else(|| {
                    format!("// Missing content for import: {}", import.import_string)
                }))
            };

            // Dedupe policy: repeat inclusions of listed files contribute
            // nothing
            if usage > 1 && pass.dedupe_files.contains(&import.full_path) {
                splice = Some(String::new());
                child.deduped = true;
            }

            if let Some(text) = splice {
                replace_last(&mut content, &import.import_string, &text);
            }
            children.push(child);
        }

        // Bundled content overwrites the raw seed; the subtree is cached for
        // repeat references
        self.registry.insert(file_path.clone(), content.clone());
        self.imports_by_file
            .insert(file_path.clone(), children.clone());

        Ok(BundleResult {
            file_path,
            found: true,
            bundled_content: Some(content),
            imports: children,
            ..Default::default()
        })
    }

    /// Read an import's content (registry first) and bundle its subtree.
    async fn descend(
        &mut self,
        import: &ImportData,
        pass: &BundlePass,
    ) -> Result<BundleResult, BundleError> {
        let content = match self.registry.get(&import.full_path) {
            Some(content) => content,
            None => self.runtime.file_read_string(&import.full_path).await?,
        };
        self.bundle_internal(import.full_path.clone(), content, pass)
            .await
    }
}

/// Child node for an edge that could not be followed.
fn edge_not_found(import: &ImportData) -> BundleResult {
    BundleResult {
        file_path: import.full_path.clone(),
        found: false,
        ignored: import.ignored,
        tilde: import.tilde,
        ..Default::default()
    }
}

/// Diagnostic placeholder spliced where an import could not be inlined.
fn unresolved_placeholder(import_string: &str) -> String {
    format!("// Unresolved import: {}", import_string)
}

/// Replace the last occurrence of `needle` in `content`.
///
/// Sibling directives may share identical literal text, and earlier splices
/// may have inserted content that coincidentally contains the same
/// substring; scanning from the end consumes one not-yet-processed
/// occurrence without disturbing already-spliced regions.
fn replace_last(content: &mut String, needle: &str, replacement: &str) {
    if let Some(pos) = content.rfind(needle) {
        content.replace_range(pos..pos + needle.len(), replacement);
    }
}
