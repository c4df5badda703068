//! Rendering of [`FileRecord`]s into text.
//!
//! Templates are plain strings with `{{ file.path }}`, `{{ file.content }}` and
//! `{{ file.language }}` placeholders. Everything outside a placeholder is copied verbatim,
//! content included, so the exact bytes of each file survive rendering.

use crate::error::{CodepressError, TemplateError};
use crate::types::FileRecord;
use std::str::FromStr;

/// Banner-delimited block used when no template is supplied.
pub const DEFAULT_TEMPLATE: &str = "
# ==============================
# File: {{ file.path }}
# ==============================

{{ file.content }}

# ==============================
# End of file
# ==============================
";

/// Fenced Markdown section tagged with the file's language.
pub const MARKDOWN_TEMPLATE: &str = "## {{ file.path }}

```{{ file.language }}
{{ file.content }}
```

";

const OPEN: &str = "{{";
const CLOSE: &str = "}}";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Path,
    Content,
    Language,
}
impl Field {
    fn parse(name: &str) -> Option<Self> {
        match name {
            "file.path" => Some(Field::Path),
            "file.content" => Some(Field::Content),
            "file.language" => Some(Field::Language),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Field(Field),
}

/// A parsed render template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    segments: Vec<Segment>,
}

impl Template {
    /// Parses `source`, validating every placeholder.
    ///
    /// # Errors
    ///
    /// Returns a [`TemplateError`] for an unclosed `{{`, an empty placeholder or an unknown
    /// field name.
    pub fn parse(source: &str) -> Result<Self, TemplateError> {
        let mut segments = Vec::new();
        let mut rest = source;
        let mut offset = 0;
        while let Some(start) = rest.find(OPEN) {
            if start > 0 {
                segments.push(Segment::Literal(rest[..start].to_owned()));
            }
            let inner_start = start + OPEN.len();
            let end = rest[inner_start..]
                .find(CLOSE)
                .ok_or(TemplateError::Unclosed {
                    offset: offset + start,
                })?;
            let name = rest[inner_start..inner_start + end].trim();
            if name.is_empty() {
                return Err(TemplateError::Empty {
                    offset: offset + start,
                });
            }
            let field = Field::parse(name).ok_or_else(|| TemplateError::UnknownField {
                name: name.to_owned(),
                offset: offset + start,
            })?;
            segments.push(Segment::Field(field));
            let consumed = inner_start + end + CLOSE.len();
            rest = &rest[consumed..];
            offset += consumed;
        }
        if !rest.is_empty() {
            segments.push(Segment::Literal(rest.to_owned()));
        }
        Ok(Self { segments })
    }

    pub fn markdown() -> Self {
        Self::parse(MARKDOWN_TEMPLATE).expect("built-in markdown template is valid")
    }

    pub fn render(&self, record: &FileRecord) -> String {
        let mut out = String::with_capacity(record.content().len() + 128);
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Field(Field::Path) => {
                    out.push_str(&record.path().display().to_string())
                }
                Segment::Field(Field::Content) => out.push_str(record.content()),
                Segment::Field(Field::Language) => out.push_str(language_of(record)),
            }
        }
        out
    }
}

impl Default for Template {
    fn default() -> Self {
        Self::parse(DEFAULT_TEMPLATE).expect("built-in default template is valid")
    }
}

impl FromStr for Template {
    type Err = TemplateError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Renders one record through a template given as text.
pub fn render(record: &FileRecord, template: &str) -> Result<String, TemplateError> {
    Ok(Template::parse(template)?.render(record))
}

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Plain,
    Markdown,
    Json,
}

/// Formats a record with one of the built-in formats.
///
/// JSON output is a single object per record, suitable for JSON Lines when `pretty` is off.
pub fn format_record(
    record: &FileRecord,
    format: OutputFormat,
    pretty: bool,
) -> Result<String, CodepressError> {
    match format {
        OutputFormat::Plain => Ok(Template::default().render(record)),
        OutputFormat::Markdown => Ok(Template::markdown().render(record)),
        OutputFormat::Json if pretty => Ok(serde_json::to_string_pretty(record)?),
        OutputFormat::Json => Ok(serde_json::to_string(record)?),
    }
}

fn language_of(record: &FileRecord) -> &'static str {
    let ext = record
        .path()
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("");
    language_from_extension(ext)
}

fn language_from_extension(ext: &str) -> &'static str {
    match ext {
        "rs" => "rust", "toml" => "toml", "json" => "json", "md" | "markdown" => "markdown",
        "txt" => "text", "html" | "htm" => "html", "css" => "css", "js" => "javascript",
        "ts" => "typescript", "py" => "python", "sh" | "bash" => "bash",
        "yml" | "yaml" => "yaml", "xml" => "xml", "sql" => "sql",
        "c" => "c", "cpp" | "cc" | "cxx" => "cpp", "h" => "c", "hpp" => "cpp",
        "go" => "go", "rb" => "ruby", "php" => "php", "swift" => "swift", "java" => "java",
        "kt" | "kts" => "kotlin", "scala" => "scala", "dart" => "dart",
        _ => "",
    }
}
