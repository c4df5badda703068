use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// A file that passed every filter, together with the text that was read from it.
///
/// Records are produced by [`FileWalk`](crate::FileWalk) and handed to the consumer by value;
/// the fields cannot be changed after construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FileRecord {
    /// Path of the file, relative or absolute depending on how the root was given.
    path: PathBuf,
    /// UTF-8 content, possibly truncated to the configured number of lines.
    content: String,
}

impl FileRecord {
    pub fn new(path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn into_parts(self) -> (PathBuf, String) {
        (self.path, self.content)
    }
}
