use std::path::PathBuf;
use thiserror::Error;
#[derive(Debug, Error)]
pub enum CodepressError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Walk error: {0}")]
    Walk(String),
    #[error("Patterns file not found: {0}")]
    PatternsNotFound(PathBuf),
    #[error("Invalid glob pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },
    #[error("Invalid truncate_lines value {0}: must be a positive integer")]
    InvalidTruncation(i64),
    #[error("{path} is not valid UTF-8: {source}")]
    Decode {
        path: PathBuf,
        source: std::string::FromUtf8Error,
    },
    #[error("Template error: {0}")]
    Template(#[from] TemplateError),
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}
impl CodepressError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CodepressError::Io {
            path: path.into(),
            source,
        }
    }
    /// Whether this error comes from a bad configuration rather than the data being walked.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            CodepressError::PatternsNotFound(_)
                | CodepressError::InvalidPattern { .. }
                | CodepressError::InvalidTruncation(_)
        )
    }
}

/// A malformed render template.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    #[error("unclosed placeholder starting at byte {offset}")]
    Unclosed { offset: usize },
    #[error("empty placeholder at byte {offset}")]
    Empty { offset: usize },
    #[error("unknown placeholder '{name}' at byte {offset}")]
    UnknownField { name: String, offset: usize },
}
