//! # Codepress
//!
//! `codepress` walks a file or directory, drops files that are ignored, hidden or binary, reads
//! what is left (optionally truncated to a number of lines) and renders each file through a
//! text template. The result is a clean textual snapshot of a codebase for people or LLMs.
//!
//! The traversal is lazy: [`walk`] returns a [`FileWalk`] iterator that reads one file per
//! step, so a consumer can stop at any point without the rest of the tree being touched.
//!
//! # Filtering rules
//!
//! - Ignore patterns are shell globs (`*`, `?`, `[seq]`) matched against each file's base name.
//! - With `ignore_hidden`, a file is skipped if its name or any directory between the root and
//!   the file starts with `.`.
//! - Binary files are recognized by their magic bytes; unrecognized content is sampled for
//!   null bytes and UTF-8 validity.
//! - A root given directly as a file is only checked for being text.
//!
//! Per-file problems (unreadable file, invalid UTF-8) are reported through an [`EventSink`]
//! and the file is skipped. Configuration problems fail the builder; a missing root fails
//! [`walk`].
//!
//! # Example
//!
//! ```no_run
//! use codepress::{Template, TraversalBuilder, walk};
//!
//! let options = TraversalBuilder::new(".")
//!     .ignore_pattern("*.lock")
//!     .use_gitignore(true)
//!     .truncate_lines(200)
//!     .build()
//!     .expect("invalid configuration");
//!
//! let template = Template::default();
//! for record in walk(&options).expect("cannot walk root") {
//!     let record = record.expect("traversal failed");
//!     print!("{}", template.render(&record));
//! }
//! ```

pub mod classify;
mod engine;
mod error;
pub mod events;
mod options;
pub mod output;
pub mod patterns;
mod reader;
mod types;

pub use classify::{is_hidden, is_text_file};
pub use engine::{FileWalk, snapshot, walk};
pub use error::{CodepressError, TemplateError};
pub use events::{Event, EventSink, NullSink, TracingSink};
pub use options::{DEFAULT_TRUNCATE_LINES, TraversalBuilder, TraversalOptions};
pub use output::{DEFAULT_TEMPLATE, OutputFormat, Template, format_record, render};
pub use patterns::{PatternList, PatternSet, is_ignored, load_patterns, load_patterns_from_file};
pub use reader::read_file;
pub use types::FileRecord;
