use crate::classify::{is_hidden, is_text_file};
use crate::error::CodepressError;
use crate::events::{Event, EventSink, TracingSink};
use crate::options::TraversalOptions;
use crate::patterns::PatternSet;
use crate::reader::read_file;
use crate::types::FileRecord;
use ignore::WalkBuilder;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

enum Source {
    /// Root given directly as a file: yielded at most once, unfiltered.
    Single(Option<PathBuf>),
    Tree(ignore::Walk),
}

/// Name and visibility filters applied to directory entries.
struct Filters {
    root: PathBuf,
    patterns: PatternSet,
    ignore_hidden: bool,
    /// Canonical paths that are never yielded.
    excluded: Vec<PathBuf>,
}
impl Filters {
    fn rejects(&self, path: &Path, sink: &dyn EventSink) -> bool {
        let ignored = path
            .file_name()
            .is_some_and(|name| self.patterns.is_ignored(Path::new(name)));
        if ignored {
            sink.record(&Event::Ignored { path });
            return true;
        }
        if self.ignore_hidden && is_hidden(&self.root, path) {
            sink.record(&Event::Hidden { path });
            return true;
        }
        if self.is_excluded(path) {
            sink.record(&Event::Excluded { path });
            return true;
        }
        false
    }
    fn is_excluded(&self, path: &Path) -> bool {
        !self.excluded.is_empty()
            && fs::canonicalize(path).is_ok_and(|canonical| self.excluded.contains(&canonical))
    }
}

/// Lazy sequence of [`FileRecord`]s for one traversal.
///
/// Nothing is enumerated or read until the iterator is polled, and each call to `next` reads
/// at most one file. Files that cannot be classified or read are reported to the event sink
/// and skipped. An `Err` item means the directory walk itself failed somewhere (for example
/// an unreadable subdirectory); polling again continues with the rest of the tree.
pub struct FileWalk {
    source: Source,
    filters: Filters,
    truncate_lines: Option<usize>,
    sink: Arc<dyn EventSink>,
}
impl FileWalk {
    /// Routes skip and failure events to `sink` instead of `tracing`.
    pub fn with_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.sink = sink;
        self
    }
    pub fn root(&self) -> &Path {
        &self.filters.root
    }
    fn load(&self, path: PathBuf) -> Option<FileRecord> {
        let sink = self.sink.as_ref();
        if !is_text_file(&path, sink) {
            sink.record(&Event::NotText { path: &path });
            return None;
        }
        match read_file(&path, self.truncate_lines) {
            Ok(content) => {
                sink.record(&Event::Emitted { path: &path });
                Some(FileRecord::new(path, content))
            }
            Err(error) => {
                sink.record(&Event::ReadFailed {
                    path: &path,
                    error: &error,
                });
                None
            }
        }
    }
}
impl Iterator for FileWalk {
    type Item = Result<FileRecord, CodepressError>;
    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let path = match &mut self.source {
                Source::Single(root) => root.take()?,
                Source::Tree(entries) => match entries.next()? {
                    Ok(entry) => entry.into_path(),
                    Err(e) => return Some(Err(CodepressError::Walk(e.to_string()))),
                },
            };
            if matches!(self.source, Source::Tree(_))
                && (!path.is_file() || self.filters.rejects(&path, self.sink.as_ref()))
            {
                continue;
            }
            if let Some(record) = self.load(path) {
                return Some(Ok(record));
            }
        }
    }
}

/// Starts a traversal of `options.root`.
///
/// # Errors
///
/// Fails before yielding anything if the root cannot be inspected or an ignore pattern does
/// not compile.
pub fn walk(options: &TraversalOptions) -> Result<FileWalk, CodepressError> {
    let root = options.root.clone();
    let metadata = fs::metadata(&root).map_err(|e| CodepressError::io(&root, e))?;
    let patterns = PatternSet::new(options.ignore_patterns.clone())?;
    let source = if metadata.is_dir() {
        let mut builder = WalkBuilder::new(&root);
        builder
            .standard_filters(false)
            .max_depth(options.max_depth)
            .follow_links(options.follow_links);
        Source::Tree(builder.build())
    } else {
        Source::Single(Some(root.clone()))
    };
    Ok(FileWalk {
        source,
        filters: Filters {
            root,
            patterns,
            ignore_hidden: options.ignore_hidden,
            excluded: options.exclude_paths.clone(),
        },
        truncate_lines: options.truncate_lines.map(|lines| lines.get()),
        sink: Arc::new(TracingSink),
    })
}

/// Walks the whole tree and collects every record, stopping at the first traversal error.
pub fn snapshot(options: &TraversalOptions) -> Result<Vec<FileRecord>, CodepressError> {
    walk(options)?.collect()
}
