//! Observer interface for what the walker and classifier decide.
//!
//! Nothing in the library logs directly. Every decision worth reporting is turned into an
//! [`Event`] and handed to an [`EventSink`]; the default [`TracingSink`] forwards to `tracing`.

use crate::error::CodepressError;
use std::fmt;
use std::path::Path;
use tracing::Level;

#[derive(Debug)]
pub enum Event<'a> {
    /// The base name matched an ignore pattern.
    Ignored { path: &'a Path },
    /// The file or one of its directories below the root is hidden.
    Hidden { path: &'a Path },
    /// The path was explicitly excluded, e.g. the file the snapshot is being written to.
    Excluded { path: &'a Path },
    /// The classifier judged the file to be binary.
    NotText { path: &'a Path },
    /// Content sniffing could not run; the byte heuristic decides instead.
    SniffFailed { path: &'a Path, error: &'a std::io::Error },
    /// The heuristic sample was not valid UTF-8.
    UndecodableSample { path: &'a Path },
    /// The file passed the filters but could not be read.
    ReadFailed {
        path: &'a Path,
        error: &'a CodepressError,
    },
    /// A record was handed to the consumer.
    Emitted { path: &'a Path },
}

impl Event<'_> {
    pub fn path(&self) -> &Path {
        match self {
            Event::Ignored { path }
            | Event::Hidden { path }
            | Event::Excluded { path }
            | Event::NotText { path }
            | Event::SniffFailed { path, .. }
            | Event::UndecodableSample { path }
            | Event::ReadFailed { path, .. }
            | Event::Emitted { path } => path,
        }
    }

    pub fn level(&self) -> Level {
        match self {
            Event::Ignored { .. } | Event::Hidden { .. } | Event::Excluded { .. } => Level::DEBUG,
            Event::Emitted { .. } => Level::DEBUG,
            Event::SniffFailed { .. } => Level::DEBUG,
            Event::NotText { .. } => Level::INFO,
            Event::UndecodableSample { .. } => Level::WARN,
            Event::ReadFailed { .. } => Level::ERROR,
        }
    }

    /// Short stable name, handy for assertions and structured output.
    pub fn kind(&self) -> &'static str {
        match self {
            Event::Ignored { .. } => "ignored",
            Event::Hidden { .. } => "hidden",
            Event::Excluded { .. } => "excluded",
            Event::NotText { .. } => "not-text",
            Event::SniffFailed { .. } => "sniff-failed",
            Event::UndecodableSample { .. } => "undecodable-sample",
            Event::ReadFailed { .. } => "read-failed",
            Event::Emitted { .. } => "emitted",
        }
    }
}

impl fmt::Display for Event<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = self.path().display();
        match self {
            Event::Ignored { .. } => write!(f, "Skipping ignored file: {path}"),
            Event::Hidden { .. } => write!(f, "Skipping hidden file: {path}"),
            Event::Excluded { .. } => write!(f, "Skipping excluded file: {path}"),
            Event::NotText { .. } => write!(f, "Skipping non-text file: {path}"),
            Event::SniffFailed { error, .. } => {
                write!(f, "Content sniffing failed for {path}: {error}")
            }
            Event::UndecodableSample { .. } => write!(f, "Could not decode {path} as UTF-8"),
            Event::ReadFailed { error, .. } => write!(f, "Failed to read {path}: {error}"),
            Event::Emitted { .. } => write!(f, "Emitting {path}"),
        }
    }
}

pub trait EventSink: Send + Sync {
    fn record(&self, event: &Event<'_>);
}

/// Forwards events to the `tracing` dispatcher at the event's level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn record(&self, event: &Event<'_>) {
        let kind = event.kind();
        let level = event.level();
        if level == Level::ERROR {
            tracing::error!(kind, "{}", event);
        } else if level == Level::WARN {
            tracing::warn!(kind, "{}", event);
        } else if level == Level::INFO {
            tracing::info!(kind, "{}", event);
        } else {
            tracing::debug!(kind, "{}", event);
        }
    }
}

/// Drops every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl EventSink for NullSink {
    fn record(&self, _event: &Event<'_>) {}
}
