use crate::error::CodepressError;
use crate::patterns::{PatternList, load_patterns_from_file};
use serde::{Deserialize, Serialize};
use std::fs;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

/// Line limit applied when the caller does not choose one.
pub const DEFAULT_TRUNCATE_LINES: usize = 5000;

/// Name of the gitignore file picked up from the root when enabled.
const GITIGNORE: &str = ".gitignore";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraversalOptions {
    pub root: PathBuf,
    pub ignore_patterns: PatternList,
    pub ignore_hidden: bool,
    pub truncate_lines: Option<NonZeroUsize>,
    pub max_depth: Option<usize>,
    pub follow_links: bool,
    /// Canonical paths never yielded by a directory walk.
    #[serde(default)]
    pub exclude_paths: Vec<PathBuf>,
}
impl Default for TraversalOptions {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            ignore_patterns: Vec::new(),
            ignore_hidden: true,
            truncate_lines: NonZeroUsize::new(DEFAULT_TRUNCATE_LINES),
            max_depth: None,
            follow_links: false,
            exclude_paths: Vec::new(),
        }
    }
}
impl TraversalOptions {
    /// Keeps `path` out of directory walks. Paths are compared after canonicalization, so the
    /// file must exist when this is called.
    pub fn exclude(&mut self, path: impl AsRef<Path>) -> Result<(), CodepressError> {
        let path = path.as_ref();
        let canonical = fs::canonicalize(path).map_err(|e| CodepressError::io(path, e))?;
        self.exclude_paths.push(canonical);
        Ok(())
    }
}

/// Builds [`TraversalOptions`], rejecting invalid settings before any walk starts.
#[derive(Debug)]
pub struct TraversalBuilder {
    options: TraversalOptions,
    truncate_lines: Option<i64>,
    patterns_files: Vec<PathBuf>,
    use_gitignore: bool,
}
impl Default for TraversalBuilder {
    fn default() -> Self {
        Self::new(".")
    }
}
impl TraversalBuilder {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            options: TraversalOptions {
                root: root.into(),
                ..Default::default()
            },
            truncate_lines: Some(DEFAULT_TRUNCATE_LINES as i64),
            patterns_files: Vec::new(),
            use_gitignore: false,
        }
    }
    pub fn ignore_patterns(mut self, patterns: PatternList) -> Self {
        self.options.ignore_patterns = patterns;
        self
    }
    pub fn ignore_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.options.ignore_patterns.push(pattern.into());
        self
    }
    /// Appends the patterns of `path` at build time. A missing file fails the build.
    pub fn patterns_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.patterns_files.push(path.into());
        self
    }
    /// Appends the patterns of `<root>/.gitignore` at build time, if that file exists.
    pub fn use_gitignore(mut self, yes: bool) -> Self {
        self.use_gitignore = yes;
        self
    }
    pub fn ignore_hidden(mut self, yes: bool) -> Self {
        self.options.ignore_hidden = yes;
        self
    }
    /// Keep only the first `lines` lines of each file. Must be positive.
    pub fn truncate_lines(mut self, lines: i64) -> Self {
        self.truncate_lines = Some(lines);
        self
    }
    pub fn no_truncation(mut self) -> Self {
        self.truncate_lines = None;
        self
    }
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.options.max_depth = Some(depth);
        self
    }
    pub fn no_limit_depth(mut self) -> Self {
        self.options.max_depth = None;
        self
    }
    pub fn follow_links(mut self, yes: bool) -> Self {
        self.options.follow_links = yes;
        self
    }
    pub fn build(self) -> Result<TraversalOptions, CodepressError> {
        let mut options = self.options;
        options.truncate_lines = match self.truncate_lines {
            None => None,
            Some(lines) => Some(
                usize::try_from(lines)
                    .ok()
                    .and_then(NonZeroUsize::new)
                    .ok_or(CodepressError::InvalidTruncation(lines))?,
            ),
        };
        for path in &self.patterns_files {
            options.ignore_patterns.extend(load_patterns_from_file(path)?);
        }
        if self.use_gitignore && options.root.is_dir() {
            let gitignore = options.root.join(GITIGNORE);
            if gitignore.is_file() {
                options
                    .ignore_patterns
                    .extend(load_patterns_from_file(&gitignore)?);
            }
        }
        Ok(options)
    }
}
