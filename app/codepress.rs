//! Command-line interface for codepress.
//!
//! Walks a file or directory and prints every text file through a template, so a whole
//! codebase can be pasted into a document or an LLM prompt.

use clap::{ArgAction, Parser, ValueEnum};
use codepress::{
    CodepressError, DEFAULT_TRUNCATE_LINES, FileRecord, OutputFormat, Template, TraversalBuilder,
    TraversalOptions, format_record, walk,
};
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process::exit;

/// Transform code into clean, readable text
#[derive(Parser)]
#[command(name = "codepress", version, about, long_about = None)]
struct Cli {
    /// File or directory to process (default current dir)
    #[arg(default_value = ".")]
    root: PathBuf,

    /// Glob patterns matched against file names (can be repeated)
    #[arg(short = 'I', long = "ignore")]
    ignore_patterns: Vec<String>,

    /// Read extra ignore patterns from a file (can be repeated)
    #[arg(long)]
    patterns_file: Vec<PathBuf>,

    /// Include hidden files and files under hidden directories
    #[arg(long)]
    no_ignore_hidden: bool,

    /// Do not load <root>/.gitignore as extra patterns
    #[arg(long)]
    no_gitignore: bool,

    /// Lines to read from each file (0 = unlimited)
    #[arg(long, default_value_t = DEFAULT_TRUNCATE_LINES as i64, allow_negative_numbers = true)]
    truncate_lines: i64,

    /// Max depth (unlimited if not set)
    #[arg(long)]
    max_depth: Option<usize>,

    /// Follow symlinks
    #[arg(long)]
    follow_links: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Plain)]
    format: Format,

    /// Template file with {{ file.path }} and {{ file.content }} placeholders
    #[arg(long, conflicts_with = "format")]
    template: Option<PathBuf>,

    /// Pretty JSON output
    #[arg(short, long)]
    pretty: bool,

    /// Write to a file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Suppress log output
    #[arg(short, long)]
    quiet: bool,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum Format {
    Plain,
    Markdown,
    Json,
    Paths,
}

enum Renderer {
    Template(Template),
    Builtin(OutputFormat, bool),
    Paths,
}

impl Renderer {
    fn render(&self, record: &FileRecord) -> Result<String, CodepressError> {
        match self {
            Renderer::Template(template) => Ok(template.render(record)),
            Renderer::Builtin(OutputFormat::Json, pretty) => {
                Ok(format_record(record, OutputFormat::Json, *pretty)? + "\n")
            }
            Renderer::Builtin(format, pretty) => format_record(record, *format, *pretty),
            Renderer::Paths => Ok(format!("{}\n", record.path().display())),
        }
    }
}

impl Cli {
    fn into_options(self) -> Result<(TraversalOptions, Renderer, Option<PathBuf>), CodepressError> {
        let mut builder = TraversalBuilder::new(self.root)
            .ignore_patterns(self.ignore_patterns)
            .use_gitignore(!self.no_gitignore)
            .ignore_hidden(!self.no_ignore_hidden)
            .follow_links(self.follow_links);

        for path in self.patterns_file {
            builder = builder.patterns_file(path);
        }

        builder = match self.truncate_lines {
            0 => builder.no_truncation(),
            lines => builder.truncate_lines(lines),
        };

        builder = if let Some(depth) = self.max_depth {
            builder.max_depth(depth)
        } else {
            builder.no_limit_depth()
        };

        let renderer = match (self.template, self.format) {
            (Some(path), _) => {
                let source =
                    fs::read_to_string(&path).map_err(|source| CodepressError::Io { path, source })?;
                Renderer::Template(source.parse::<Template>()?)
            }
            (None, Format::Plain) => Renderer::Builtin(OutputFormat::Plain, self.pretty),
            (None, Format::Markdown) => Renderer::Builtin(OutputFormat::Markdown, self.pretty),
            (None, Format::Json) => Renderer::Builtin(OutputFormat::Json, self.pretty),
            (None, Format::Paths) => Renderer::Paths,
        };

        Ok((builder.build()?, renderer, self.output))
    }
}

fn main() {
    let cli = Cli::parse();
    setup_logging(cli.verbose, cli.quiet);

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        exit(1);
    }
}

fn setup_logging(verbose: u8, quiet: bool) {
    if quiet {
        return;
    }

    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        match verbose {
            0 => tracing_subscriber::EnvFilter::new("warn"),
            1 => tracing_subscriber::EnvFilter::new("info,ignore=warn,globset=warn"),
            2 => tracing_subscriber::EnvFilter::new("debug,ignore=warn,globset=warn"),
            _ => tracing_subscriber::EnvFilter::new("trace"),
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<(), CodepressError> {
    let (mut options, renderer, output) = cli.into_options()?;

    let (mut out, out_path): (Box<dyn Write>, PathBuf) = match output {
        Some(path) => {
            let file = File::create(&path).map_err(|source| CodepressError::Io {
                path: path.clone(),
                source,
            })?;
            // The output may live under the root; never snapshot it into itself.
            options.exclude(&path)?;
            (Box::new(BufWriter::new(file)), path)
        }
        None => (Box::new(io::stdout().lock()), PathBuf::from("<stdout>")),
    };
    let write_error = |source: io::Error| CodepressError::Io {
        path: out_path.clone(),
        source,
    };

    for record in walk(&options)? {
        let record = record?;
        tracing::info!(path = %record.path().display(), "Processed file");
        out.write_all(renderer.render(&record)?.as_bytes())
            .map_err(write_error)?;
    }
    out.flush().map_err(write_error)?;
    Ok(())
}
