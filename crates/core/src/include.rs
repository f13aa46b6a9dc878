//! Inline `require('lib')` statements before upload.
//!
//! The controller has no module loader, so every uncommented top-level
//! `require` line is replaced with the library's source wrapped in marker
//! comments. Expansion repeats over the whole text until no uncommented
//! `require` remains, which picks up requires inside inlined libraries.
//! There is no cycle detection; a pass limit turns an include cycle into an
//! error instead of a hang.
//!
//! Scripts and libraries are handled as bytes, so sources that are not valid
//! UTF-8 are inlined verbatim.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::bytes::{Captures, Regex};

use crate::body::{find_bytes, SceneBody};
use crate::error::SceneError;
use crate::scene::LUA_EXTENSION;

/// Default tag that marks a `require` line as "comment out, never inline".
pub const DEFAULT_IGNORE_TAG: &str = "library2Ignore";

/// Default upper bound on whole-text expansion passes.
pub const DEFAULT_MAX_PASSES: usize = 64;

/// Prefix used to comment out an expanded statement.
const STATEMENT_COMMENT: &str = "--^ ";

const LIBRARY_BEGIN: &str = "-- LIBRARY BEGIN -------------------------\n-- DO NOT MODIFY THE CODE\n";
const LIBRARY_END: &str = "-- LIBRARY END -------------------------\n";
const NOT_FOUND_SUFFIX: &str = " <-- FILE NOT FOUND";

/// An uncommented `require("name")` at the start of a line.
static REQUIRE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?m-u)^\s*require\(('|")(.*)('|")\);?"#).expect("valid require regex")
});

// ---------------------------------------------------------------------------
// File access
// ---------------------------------------------------------------------------

/// Source of library file contents.
pub trait FileSource {
    fn read(&self, path: &Path) -> std::io::Result<Vec<u8>>;
}

/// Reads libraries from the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsSource;

impl FileSource for FsSource {
    fn read(&self, path: &Path) -> std::io::Result<Vec<u8>> {
        std::fs::read(path)
    }
}

// ---------------------------------------------------------------------------
// Expander
// ---------------------------------------------------------------------------

/// Settings for inlining `require` statements.
#[derive(Debug, Clone)]
pub struct IncludeExpander {
    /// Directory libraries are resolved in (`<dir>/<name>.lua`).
    pub search_dir: PathBuf,
    /// Statements containing this tag are commented out instead of inlined.
    pub ignore_tag: Option<String>,
    /// Passes allowed before giving up on a (probable) include cycle.
    pub max_passes: usize,
}

impl Default for IncludeExpander {
    fn default() -> Self {
        Self {
            search_dir: PathBuf::new(),
            ignore_tag: Some(DEFAULT_IGNORE_TAG.to_string()),
            max_passes: DEFAULT_MAX_PASSES,
        }
    }
}

impl IncludeExpander {
    pub fn new(search_dir: impl Into<PathBuf>) -> Self {
        Self {
            search_dir: search_dir.into(),
            ..Self::default()
        }
    }

    pub fn with_ignore_tag(mut self, tag: Option<String>) -> Self {
        self.ignore_tag = tag.filter(|t| !t.is_empty());
        self
    }

    /// Expand every uncommented `require` in `text`.
    ///
    /// Text without a `require` is returned unchanged. Otherwise each pass
    /// rewrites line by line, and every output line ends with `\n`.
    pub fn expand<C: AsRef<[u8]> + ?Sized>(
        &self,
        text: &C,
        files: &impl FileSource,
    ) -> Result<SceneBody, SceneError> {
        let mut current = text.as_ref().to_vec();
        let mut passes = 0;

        while REQUIRE_RE.is_match(&current) {
            if passes == self.max_passes {
                return Err(SceneError::IncludeDepthExceeded { passes });
            }
            passes += 1;
            current = self.expand_pass(&current, files);
        }

        if passes > 0 {
            tracing::debug!(passes, "Include expansion finished");
        }
        Ok(SceneBody::from(current))
    }

    fn expand_pass(&self, text: &[u8], files: &impl FileSource) -> Vec<u8> {
        let mut out = Vec::with_capacity(text.len());
        for line in lines(text) {
            if REQUIRE_RE.is_match(line) {
                let rewritten = REQUIRE_RE.replace(line, |caps: &Captures| {
                    self.rewrite_statement(&caps[0], &caps[2], files)
                });
                out.extend_from_slice(&rewritten);
            } else {
                out.extend_from_slice(line);
            }
            out.push(b'\n');
        }
        out
    }

    fn rewrite_statement(
        &self,
        statement: &[u8],
        library: &[u8],
        files: &impl FileSource,
    ) -> Vec<u8> {
        if self
            .ignore_tag
            .as_deref()
            .is_some_and(|tag| find_bytes(statement, tag.as_bytes()).is_some())
        {
            return comment_out(statement);
        }

        let library = String::from_utf8_lossy(library);
        let path = self.library_path(&library);
        match files.read(&path) {
            Ok(source) => {
                tracing::debug!(%library, path = %path.display(), "Inlining library");
                let mut out = comment_out(statement);
                out.push(b'\n');
                out.extend_from_slice(LIBRARY_BEGIN.as_bytes());
                out.extend_from_slice(&source);
                out.push(b'\n');
                out.extend_from_slice(LIBRARY_END.as_bytes());
                out
            }
            Err(e) => {
                tracing::warn!(%library, path = %path.display(), error = %e, "Library not found");
                let mut out = comment_out(statement);
                out.extend_from_slice(NOT_FOUND_SUFFIX.as_bytes());
                out
            }
        }
    }

    fn library_path(&self, library: &str) -> PathBuf {
        self.search_dir.join(format!("{library}.{LUA_EXTENSION}"))
    }
}

fn comment_out(statement: &[u8]) -> Vec<u8> {
    let mut out = STATEMENT_COMMENT.as_bytes().to_vec();
    out.extend_from_slice(statement);
    out
}

/// Lines of `text` without their `\n` or `\r\n` terminators.
fn lines(text: &[u8]) -> impl Iterator<Item = &[u8]> {
    text.split_inclusive(|&b| b == b'\n').map(|line| match line.strip_suffix(b"\n") {
        Some(line) => line.strip_suffix(b"\r").unwrap_or(line),
        None => line,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
