//! SCSS compilation using the grass crate.
//!
//! Copyright (c) 2025 Posit, PBC
//!
//! This module wraps grass, a pure Rust SCSS compiler, behind the interface
//! the bundling pipeline consumes:
//!
//! - `compile_scss` / `compile_scss_with_packages`: compile bundled text with
//!   an include-path list, returning a structured `SassCompileError`
//! - `PackageFs`: a `grass::Fs` implementation that resolves package-style
//!   (`~`-prefixed) import paths against a `node_modules` directory, so
//!   directives passed through to the compiler still resolve

use std::path::{Path, PathBuf};

use grass::{Options, OutputStyle};
use once_cell::sync::Lazy;
use regex::Regex;

/// `line:column` location in grass's rendered error text.
///
/// grass only exposes its error as rendered text; the location trailer on
/// the final line (e.g. `./stdin:3:14`) is the last `line:column` pair in
/// the message.
static ERROR_LOCATION: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d+):(\d+)").unwrap());

/// Structured SCSS compilation failure.
///
/// `line` and `column` are extracted from the compiler's rendered output when
/// present; `message` always carries the full rendered text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SassCompileError {
    /// Full rendered compiler error
    pub message: String,
    /// 1-based source line, when the compiler reported one
    pub line: Option<u32>,
    /// 1-based source column, when the compiler reported one
    pub column: Option<u32>,
}

impl SassCompileError {
    fn from_grass(err: &grass::Error) -> Self {
        let message = err.to_string();
        let (line, column) = ERROR_LOCATION
            .captures_iter(&message)
            .last()
            .map(|caps| (caps[1].parse().ok(), caps[2].parse().ok()))
            .unwrap_or((None, None));
        Self {
            message,
            line,
            column,
        }
    }
}

impl std::fmt::Display for SassCompileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SCSS compilation failed: {}", self.message)
    }
}

impl std::error::Error for SassCompileError {}

/// Filesystem adapter for grass with package-import resolution.
///
/// grass probes candidate paths through this adapter while resolving
/// `@import`/`@use`. Any candidate containing a `~`-prefixed component is
/// first remapped onto `<package_root>/node_modules/` before falling back to
/// the literal path, so package-style directives that the bundler passed
/// through still compile.
#[derive(Debug, Default)]
pub struct PackageFs {
    package_root: Option<PathBuf>,
}

impl PackageFs {
    /// Create an adapter with no package resolution (plain filesystem).
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an adapter resolving `~` imports against `package_root`.
    pub fn with_package_root(package_root: impl Into<PathBuf>) -> Self {
        Self {
            package_root: Some(package_root.into()),
        }
    }

    /// Rewrite a candidate containing a `~`-prefixed component onto the
    /// packages directory. Returns None when no rewrite applies.
    fn remap(&self, path: &Path) -> Option<PathBuf> {
        let root = self.package_root.as_ref()?;
        let mut mapped: Option<PathBuf> = None;
        for comp in path.components() {
            let comp = comp.as_os_str();
            match mapped {
                Some(ref mut m) => m.push(comp),
                None => {
                    let text = comp.to_string_lossy();
                    if let Some(rest) = text.strip_prefix('~') {
                        let mut m = root.join("node_modules");
                        if !rest.is_empty() {
                            m.push(rest);
                        }
                        mapped = Some(m);
                    }
                }
            }
        }
        mapped
    }
}

impl grass::Fs for PackageFs {
    fn is_dir(&self, path: &Path) -> bool {
        if let Some(mapped) = self.remap(path) {
            if mapped.is_dir() {
                return true;
            }
        }
        path.is_dir()
    }

    fn is_file(&self, path: &Path) -> bool {
        if let Some(mapped) = self.remap(path) {
            if mapped.is_file() {
                return true;
            }
        }
        path.is_file()
    }

    fn read(&self, path: &Path) -> std::io::Result<Vec<u8>> {
        if let Some(mapped) = self.remap(path) {
            if mapped.is_file() {
                return std::fs::read(mapped);
            }
        }
        std::fs::read(path)
    }
}

/// Compile SCSS source to CSS.
///
/// # Arguments
///
/// * `scss` - The SCSS source code to compile
/// * `load_paths` - Directories to search for @use/@import resolution
/// * `minified` - Whether to produce compressed output
///
/// # Returns
///
/// Compiled CSS string on success, structured `SassCompileError` on failure.
pub fn compile_scss(
    scss: &str,
    load_paths: &[PathBuf],
    minified: bool,
) -> Result<String, SassCompileError> {
    let fs = PackageFs::new();
    compile_with(&fs, scss, load_paths, minified)
}

/// Compile SCSS source to CSS, resolving package-style imports.
///
/// Identical to `compile_scss`, but `~`-prefixed import paths are resolved
/// against `<package_root>/node_modules/`.
pub fn compile_scss_with_packages(
    scss: &str,
    load_paths: &[PathBuf],
    package_root: &Path,
    minified: bool,
) -> Result<String, SassCompileError> {
    let fs = PackageFs::with_package_root(package_root);
    compile_with(&fs, scss, load_paths, minified)
}

fn compile_with(
    fs: &PackageFs,
    scss: &str,
    load_paths: &[PathBuf],
    minified: bool,
) -> Result<String, SassCompileError> {
    let style = if minified {
        OutputStyle::Compressed
    } else {
        OutputStyle::Expanded
    };

    let options = Options::default().fs(fs).load_paths(load_paths).style(style);

    grass::from_string(scss, &options).map_err(|e| SassCompileError::from_grass(&e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compile_simple_scss() {
        let scss = "$primary: #007bff; .btn { color: $primary; }";

        let css = compile_scss(scss, &[], false).unwrap();

        assert!(css.contains(".btn"));
        assert!(css.contains("#007bff"));
    }

    #[test]
    fn test_compile_scss_minified() {
        let scss = "$primary: blue;\n\n.btn {\n  color: $primary;\n}";

        let css = compile_scss(scss, &[], true).unwrap();

        assert!(!css.contains("\n\n"));
        assert!(css.contains(".btn"));
        assert!(css.contains("blue"));
    }

    #[test]
    fn test_compile_error_carries_location() {
        // Undefined variable on line 2
        let scss = ".ok { color: red; }\n.btn { color: $missing; }";

        let err = compile_scss(scss, &[], false).unwrap_err();

        assert!(err.message.contains("$missing") || err.message.contains("Undefined"));
        assert_eq!(err.line, Some(2));
        assert!(err.column.is_some());
    }

    #[test]
    fn test_compile_error_display() {
        let err = SassCompileError {
            message: "Undefined variable.".to_string(),
            line: Some(1),
            column: Some(8),
        };
        assert!(err.to_string().contains("SCSS compilation failed"));
        assert!(err.to_string().contains("Undefined variable"));
    }

    #[test]
    fn test_package_fs_remap() {
        let fs = PackageFs::with_package_root("/proj");

        let mapped = fs.remap(Path::new("/load/~pkg/colors.scss")).unwrap();
        assert_eq!(mapped, Path::new("/proj/node_modules/pkg/colors.scss"));

        // No tilde component, no rewrite
        assert!(fs.remap(Path::new("/load/pkg/colors.scss")).is_none());

        // No package root configured, no rewrite
        let plain = PackageFs::new();
        assert!(plain.remap(Path::new("~pkg/colors.scss")).is_none());
    }

    #[test]
    fn test_compile_with_package_import() {
        let temp = tempfile::tempdir().unwrap();
        let pkg_dir = temp.path().join("node_modules/pkg");
        std::fs::create_dir_all(&pkg_dir).unwrap();
        std::fs::write(pkg_dir.join("_colors.scss"), "$c: red;").unwrap();

        let scss = "@import '~pkg/colors';\n.btn { color: $c; }";
        let load_paths = vec![temp.path().to_path_buf()];

        let css =
            compile_scss_with_packages(scss, &load_paths, temp.path(), false).unwrap();

        assert!(css.contains(".btn"));
        assert!(css.contains("red"));
    }
}
