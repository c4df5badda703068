//! Ignore-pattern sources and glob matching.
//!
//! Pattern files use the familiar `.gitignore` layout (one pattern per line, `#` comments,
//! blank lines allowed) but each pattern is a plain shell glob: `*`, `?` and `[seq]`, with
//! `*` free to cross `/`. There is no negation and no directory anchoring.

use crate::error::CodepressError;
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// Ordered glob patterns, passed through verbatim to matching.
pub type PatternList = Vec<String>;

/// Parses pattern text, dropping blank lines and `#` comments.
pub fn load_patterns(source: &str) -> PatternList {
    source
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_owned)
        .collect()
}

/// Reads and parses a patterns file.
///
/// # Errors
///
/// [`CodepressError::PatternsNotFound`] when `path` does not exist, [`CodepressError::Io`]
/// for any other read failure.
pub fn load_patterns_from_file(path: impl AsRef<Path>) -> Result<PatternList, CodepressError> {
    let path = path.as_ref();
    match fs::read_to_string(path) {
        Ok(source) => Ok(load_patterns(&source)),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            Err(CodepressError::PatternsNotFound(path.to_path_buf()))
        }
        Err(e) => Err(CodepressError::io(path, e)),
    }
}

/// A compiled, read-only set of ignore patterns.
#[derive(Debug, Clone)]
pub struct PatternSet {
    patterns: PatternList,
    matcher: GlobSet,
}

impl PatternSet {
    pub fn new(patterns: PatternList) -> Result<Self, CodepressError> {
        let mut builder = GlobSetBuilder::new();
        for pattern in &patterns {
            let glob = Glob::new(pattern).map_err(|e| CodepressError::InvalidPattern {
                pattern: pattern.clone(),
                message: e.to_string(),
            })?;
            builder.add(glob);
        }
        let matcher = builder.build().map_err(|e| CodepressError::InvalidPattern {
            pattern: patterns.join(", "),
            message: e.to_string(),
        })?;
        Ok(Self { patterns, matcher })
    }

    pub fn empty() -> Self {
        Self {
            patterns: Vec::new(),
            matcher: GlobSet::empty(),
        }
    }

    /// True if the `/`-separated form of `path` matches any pattern.
    pub fn is_ignored(&self, path: impl AsRef<Path>) -> bool {
        !self.patterns.is_empty() && self.matcher.is_match(path.as_ref())
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

impl Default for PatternSet {
    fn default() -> Self {
        Self::empty()
    }
}

/// One-shot form of [`PatternSet::is_ignored`] for callers holding raw pattern strings.
///
/// Matching itself is a pure yes/no, exactly as [`PatternSet::is_ignored`] answers it. The
/// `Result` only carries compilation failures: an unparsable glob such as `[abc` is reported
/// as [`CodepressError::InvalidPattern`] instead of being matched literally. For a list of
/// valid globs this always returns `Ok`, and an empty list is `Ok(false)`.
///
/// # Errors
///
/// [`CodepressError::InvalidPattern`] if any pattern does not compile.
pub fn is_ignored(path: impl AsRef<Path>, patterns: &[String]) -> Result<bool, CodepressError> {
    if patterns.is_empty() {
        return Ok(false);
    }
    Ok(PatternSet::new(patterns.to_vec())?.is_ignored(path))
}
