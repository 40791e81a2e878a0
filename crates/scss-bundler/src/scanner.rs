//! Import directive scanning.
//!
//! Copyright (c) 2025 Posit, PBC
//!
//! Extracts `@import '...';` directives from SCSS text. A directive that
//! sits inside a comment is not a real import, but the comment itself must
//! survive: only the import-looking substring within the comment span is
//! removed. This is done in two explicit passes — locate comment spans, then
//! scrub import-like substrings within each span — so the comment-vs-code
//! disambiguation stays independently testable.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// Import directive grammar: `@import` followed by one quoted path and an
/// optional trailing semicolon. Captures the referenced path in group 1.
static IMPORT_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"@import\s+['"]([^'"]+)['"];?"#).unwrap());

/// Line comment span (`//` to end of line).
static LINE_COMMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"//[^\r\n]*").unwrap());

/// Block comment span (`/* ... */`), non-greedy so adjacent comments stay
/// separate spans; may cross lines.
static BLOCK_COMMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)/\*.*?\*/").unwrap());

/// A scanned import directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportMatch {
    /// Exact matched source text (used later as the splice key)
    pub import_string: String,

    /// Referenced path as written
    pub path: String,
}

/// Remove import directives that appear inside comment spans.
///
/// Comment text itself is preserved; only nested import-looking substrings
/// are scrubbed, so a directive can never be both a real import and a
/// leftover fragment inside a mangled comment.
pub fn strip_commented_imports(content: &str) -> String {
    let scrub = |caps: &Captures<'_>| IMPORT_PATTERN.replace_all(&caps[0], "").into_owned();

    let pass = LINE_COMMENT.replace_all(content, scrub);
    BLOCK_COMMENT.replace_all(&pass, scrub).into_owned()
}

/// Scan text for import directives, in source order.
///
/// Callers are expected to run `strip_commented_imports` first; this
/// function matches whatever directives remain.
pub fn scan_imports(content: &str) -> Vec<ImportMatch> {
    IMPORT_PATTERN
        .captures_iter(content)
        .map(|caps| ImportMatch {
            import_string: caps[0].to_string(),
            path: caps[1].to_string(),
        })
        .collect()
}
