use codepress::classify::is_text_mime;
use codepress::{
    CodepressError, Event, EventSink, FileRecord, NullSink, OutputFormat, PatternSet, Template,
    TemplateError, TraversalBuilder, format_record, is_hidden, is_ignored, is_text_file,
    load_patterns, load_patterns_from_file, read_file, render,
};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tempfile::tempdir;

#[derive(Default)]
struct RecordingSink {
    events: Mutex<Vec<(String, PathBuf)>>,
}
impl EventSink for RecordingSink {
    fn record(&self, event: &Event<'_>) {
        self.events
            .lock()
            .unwrap()
            .push((event.kind().to_string(), event.path().to_path_buf()));
    }
}

fn png_bytes() -> Vec<u8> {
    let mut bytes = vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
    bytes.extend_from_slice(&[0, 0, 0, 0x0D, b'I', b'H', b'D', b'R']);
    bytes.extend_from_slice(&[0; 32]);
    bytes
}

#[test]
fn test_load_patterns_skips_comments_and_blanks() {
    let patterns = load_patterns("# build output\ntarget\n\n   *.log  \n#*.txt\n");
    assert_eq!(patterns, vec!["target".to_string(), "*.log".to_string()]);
}

#[test]
fn test_load_patterns_from_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("patterns");
    fs::write(&path, "# comment\n\n*.log\n").unwrap();
    assert_eq!(load_patterns_from_file(&path).unwrap(), vec!["*.log".to_string()]);
}

#[test]
fn test_load_patterns_from_missing_file() {
    let dir = tempdir().unwrap();
    let err = load_patterns_from_file(dir.path().join("nope")).unwrap_err();
    assert!(matches!(err, CodepressError::PatternsNotFound(_)));
    assert!(err.is_config_error());
}

#[test]
fn test_is_ignored_glob_semantics() {
    let log = vec!["*.log".to_string()];
    assert!(is_ignored("debug.log", &log).unwrap());
    assert!(!is_ignored("debug.txt", &log).unwrap());
    assert!(!is_ignored("debug.log.txt", &log).unwrap());

    let single = vec!["?.rs".to_string()];
    assert!(is_ignored("a.rs", &single).unwrap());
    assert!(!is_ignored("ab.rs", &single).unwrap());

    let class = vec!["[ab].txt".to_string()];
    assert!(is_ignored("a.txt", &class).unwrap());
    assert!(!is_ignored("c.txt", &class).unwrap());

    let negated = vec!["[!ab].txt".to_string()];
    assert!(is_ignored("c.txt", &negated).unwrap());
    assert!(!is_ignored("a.txt", &negated).unwrap());
}

#[test]
fn test_star_crosses_separators() {
    let patterns = vec!["*.rs".to_string()];
    assert!(is_ignored(Path::new("src/engine/main.rs"), &patterns).unwrap());
}

#[test]
fn test_empty_patterns_never_match() {
    assert!(!is_ignored("anything", &[]).unwrap());
    assert!(!PatternSet::empty().is_ignored(".git"));
}

#[test]
fn test_invalid_pattern_is_config_error() {
    let err = PatternSet::new(vec!["[abc".to_string()]).unwrap_err();
    assert!(matches!(err, CodepressError::InvalidPattern { .. }));
    assert!(err.is_config_error());
}

#[test]
fn test_is_ignored_reports_invalid_glob_instead_of_matching() {
    let patterns = vec!["*.log".to_string(), "[abc".to_string()];
    let err = is_ignored("[abc", &patterns).unwrap_err();
    assert!(matches!(err, CodepressError::InvalidPattern { ref pattern, .. } if pattern == "[abc"));

    let valid = vec!["*.log".to_string(), "build".to_string()];
    let set = PatternSet::new(valid.clone()).unwrap();
    for name in ["app.log", "build", "main.rs"] {
        assert_eq!(is_ignored(name, &valid).unwrap(), set.is_ignored(name));
    }
}

#[test]
fn test_is_hidden() {
    let root = Path::new("/repo");
    assert!(is_hidden(root, Path::new("/repo/.env")));
    assert!(is_hidden(root, Path::new("/repo/.git/config")));
    assert!(is_hidden(root, Path::new("/repo/src/.cache/data.txt")));
    assert!(!is_hidden(root, Path::new("/repo/src/main.rs")));
}

#[test]
fn test_hidden_root_segments_are_not_considered() {
    let root = Path::new("/home/me/.config/app");
    assert!(!is_hidden(root, Path::new("/home/me/.config/app/settings.toml")));
    assert!(is_hidden(root, Path::new("/home/me/.config/app/.secret")));
}

#[test]
fn test_text_file_detected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("main.rs");
    fs::write(&path, "fn main() {\n    println!(\"hi\");\n}\n").unwrap();
    assert!(is_text_file(&path, &NullSink));
}

#[test]
fn test_empty_file_is_text() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("empty.txt");
    fs::write(&path, "").unwrap();
    assert!(is_text_file(&path, &NullSink));
}

#[test]
fn test_directory_is_not_text() {
    let dir = tempdir().unwrap();
    assert!(!is_text_file(dir.path(), &NullSink));
}

#[test]
fn test_sniffed_image_is_not_text() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("image.png");
    fs::write(&path, png_bytes()).unwrap();
    assert!(!is_text_file(&path, &NullSink));
}

#[test]
fn test_sniffed_elf_is_not_text() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("program");
    let mut bytes = vec![0x7F, b'E', b'L', b'F', 2, 1, 1, 0];
    bytes.resize(128, 0);
    fs::write(&path, bytes).unwrap();
    assert!(!is_text_file(&path, &NullSink));
}

#[test]
fn test_sniffed_pdf_wins_over_byte_heuristic() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("doc.pdf");
    fs::write(&path, "%PDF-1.4\n% plain ascii body\n").unwrap();
    assert!(!is_text_file(&path, &NullSink));
}

#[test]
fn test_null_bytes_without_signature_are_binary() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("blob.dat");
    fs::write(&path, b"hello\0world\0").unwrap();
    assert!(!is_text_file(&path, &NullSink));
}

#[test]
fn test_invalid_utf8_sample_is_reported() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("latin1.txt");
    fs::write(&path, [b'c', b'a', b'f', 0xE9, b'\n']).unwrap();
    let sink = RecordingSink::default();
    assert!(!is_text_file(&path, &sink));
    let events = sink.events.lock().unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].0, "undecodable-sample");
    assert_eq!(events[0].1, path);
}

#[test]
fn test_mime_verdicts() {
    assert!(is_text_mime("text/plain"));
    assert!(is_text_mime("text/html"));
    assert!(is_text_mime("application/json"));
    assert!(is_text_mime("application/x-shellscript"));
    assert!(!is_text_mime("image/svg+xml"));
    assert!(!is_text_mime("font/woff2"));
    assert!(!is_text_mime("audio/mpeg"));
    assert!(!is_text_mime("application/zip"));
    assert!(!is_text_mime("application/x-executable"));
    assert!(!is_text_mime("application/pdf"));
    assert!(!is_text_mime(
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
    ));
    assert!(!is_text_mime("application/vnd.oasis.opendocument.spreadsheet"));
}

#[test]
fn test_read_file_truncates() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("a.txt");
    fs::write(&path, "one\ntwo\nthree\n").unwrap();
    assert_eq!(read_file(&path, Some(2)).unwrap(), "one\ntwo\n");
    assert_eq!(read_file(&path, Some(3)).unwrap(), "one\ntwo\nthree\n");
    assert_eq!(read_file(&path, Some(10)).unwrap(), "one\ntwo\nthree\n");
    assert_eq!(read_file(&path, None).unwrap(), "one\ntwo\nthree\n");
}

#[test]
fn test_read_file_zero_lines() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("a.txt");
    fs::write(&path, "one\n").unwrap();
    assert_eq!(read_file(&path, Some(0)).unwrap(), "");
}

#[test]
fn test_read_file_keeps_partial_line_and_terminators() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("crlf.txt");
    fs::write(&path, "one\r\ntwo\r\nthree").unwrap();
    assert_eq!(read_file(&path, Some(2)).unwrap(), "one\r\ntwo\r\n");
    assert_eq!(read_file(&path, Some(3)).unwrap(), "one\r\ntwo\r\nthree");
}

#[test]
fn test_read_file_decode_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bad.txt");
    fs::write(&path, [b'o', b'k', b'\n', 0xFF, 0xFE, b'\n']).unwrap();
    assert!(matches!(
        read_file(&path, None),
        Err(CodepressError::Decode { .. })
    ));
    // The invalid bytes sit past the limit, so a truncated read succeeds.
    assert_eq!(read_file(&path, Some(1)).unwrap(), "ok\n");
}

#[test]
fn test_read_missing_file() {
    let dir = tempdir().unwrap();
    assert!(matches!(
        read_file(&dir.path().join("gone.txt"), None),
        Err(CodepressError::Io { .. })
    ));
}

#[test]
fn test_builder_rejects_bad_truncation() {
    let negative = TraversalBuilder::new(".").truncate_lines(-3).build();
    assert!(matches!(negative, Err(CodepressError::InvalidTruncation(-3))));
    let zero = TraversalBuilder::new(".").truncate_lines(0).build();
    assert!(matches!(zero, Err(CodepressError::InvalidTruncation(0))));
    let ok = TraversalBuilder::new(".").truncate_lines(7).build().unwrap();
    assert_eq!(ok.truncate_lines.map(|n| n.get()), Some(7));
    let unlimited = TraversalBuilder::new(".").no_truncation().build().unwrap();
    assert!(unlimited.truncate_lines.is_none());
}

#[test]
fn test_builder_defaults() {
    let options = TraversalBuilder::new("src").build().unwrap();
    assert!(options.ignore_hidden);
    assert_eq!(options.truncate_lines.map(|n| n.get()), Some(5000));
    assert!(options.ignore_patterns.is_empty());
}

#[test]
fn test_builder_loads_pattern_sources() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join(".gitignore"), "# generated\n*.tmp\n").unwrap();
    let extra = dir.path().join("extra-patterns");
    fs::write(&extra, "*.bak\n").unwrap();

    let options = TraversalBuilder::new(dir.path())
        .ignore_pattern("*.log")
        .patterns_file(&extra)
        .use_gitignore(true)
        .build()
        .unwrap();
    assert_eq!(options.ignore_patterns, vec!["*.log", "*.bak", "*.tmp"]);

    let missing = TraversalBuilder::new(dir.path())
        .patterns_file(dir.path().join("missing"))
        .build();
    assert!(matches!(missing, Err(CodepressError::PatternsNotFound(_))));
}

#[test]
fn test_default_template() {
    let record = FileRecord::new("src/a.rs", "fn a() {}\n");
    let expected = "\n# ==============================\n# File: src/a.rs\n# ==============================\n\nfn a() {}\n\n\n# ==============================\n# End of file\n# ==============================\n";
    assert_eq!(Template::default().render(&record), expected);
}

#[test]
fn test_custom_template() {
    let record = FileRecord::new("notes.txt", "hello");
    let out = render(&record, "<{{file.path}}>{{  file.content  }}</{{ file.path }}>").unwrap();
    assert_eq!(out, "<notes.txt>hello</notes.txt>");
}

#[test]
fn test_content_is_not_reinterpreted() {
    let record = FileRecord::new("t.txt", "{{ file.path }}");
    assert_eq!(render(&record, "{{ file.content }}").unwrap(), "{{ file.path }}");
}

#[test]
fn test_template_errors() {
    let record = FileRecord::new("a.txt", "a");
    assert_eq!(
        render(&record, "{{ file.name }}"),
        Err(TemplateError::UnknownField {
            name: "file.name".to_string(),
            offset: 0
        })
    );
    assert_eq!(
        render(&record, "abc {{ file.path"),
        Err(TemplateError::Unclosed { offset: 4 })
    );
    assert_eq!(render(&record, "x{{ }}"), Err(TemplateError::Empty { offset: 1 }));
}

#[test]
fn test_markdown_format() {
    let record = FileRecord::new("src/lib.rs", "pub fn f() {}\n");
    let out = format_record(&record, OutputFormat::Markdown, false).unwrap();
    assert_eq!(out, "## src/lib.rs\n\n```rust\npub fn f() {}\n\n```\n\n");
}

#[test]
fn test_json_format() {
    let record = FileRecord::new("a.txt", "line\n");
    let out = format_record(&record, OutputFormat::Json, false).unwrap();
    let value: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(value["path"], "a.txt");
    assert_eq!(value["content"], "line\n");
}

#[test]
fn test_every_sniffable_binary_application_type_is_rejected() {
    // Every binary `application/*` type the magic-byte sniffer can report.
    let sniffed = [
        "application/wasm",
        "application/vnd.microsoft.portable-executable",
        "application/x-executable",
        "application/x-llvm",
        "application/x-mach-binary",
        "application/java",
        "application/vnd.android.dex",
        "application/vnd.android.dey",
        "application/x-x509-ca-cert",
        "application/epub+zip",
        "application/zip",
        "application/x-tar",
        "application/vnd.rar",
        "application/gzip",
        "application/x-bzip2",
        "application/vnd.bzip3",
        "application/x-7z-compressed",
        "application/x-xz",
        "application/pdf",
        "application/x-shockwave-flash",
        "application/octet-stream",
        "application/vnd.sqlite3",
        "application/x-nintendo-nes-rom",
        "application/x-google-chrome-extension",
        "application/vnd.ms-cab-compressed",
        "application/vnd.debian.binary-package",
        "application/x-unix-archive",
        "application/x-compress",
        "application/x-lzip",
        "application/x-rpm",
        "application/dicom",
        "application/zstd",
        "application/x-lz4",
        "application/x-ole-storage",
        "application/x-cpio",
        "application/x-par2",
        "application/x-mobipocket-ebook",
        "application/msword",
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "application/vnd.ms-excel",
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        "application/vnd.ms-powerpoint",
        "application/vnd.openxmlformats-officedocument.presentationml.presentation",
        "application/vnd.oasis.opendocument.text",
        "application/vnd.oasis.opendocument.spreadsheet",
        "application/vnd.oasis.opendocument.presentation",
        "application/font-woff",
        "application/font-sfnt",
    ];
    for mime in sniffed {
        assert!(!is_text_mime(mime), "{mime} should not be text");
    }
}

#[test]
fn test_sniffed_sqlite_is_not_text() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("app.db");
    let mut bytes = b"SQLite format 3\0".to_vec();
    bytes.resize(4096, 0);
    fs::write(&path, bytes).unwrap();
    assert!(!is_text_file(&path, &NullSink));
}

#[test]
fn test_sniffed_woff_is_not_text() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("f.woff");
    let mut bytes = b"wOFF\0\x01\0\0".to_vec();
    bytes.resize(256, 0);
    fs::write(&path, bytes).unwrap();
    assert!(!is_text_file(&path, &NullSink));
}

#[test]
fn test_character_split_by_sample_boundary_is_text() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("euro.txt");
    // The 3-byte '€' occupies bytes 1022..1025, straddling the 1024-byte sample.
    let mut content = "a".repeat(1022);
    content.push('€');
    content.push_str(" tail\n");
    fs::write(&path, &content).unwrap();
    let sink = RecordingSink::default();
    assert!(is_text_file(&path, &sink));
    assert!(sink.events.lock().unwrap().is_empty());
}

#[test]
fn test_character_cut_by_end_of_file_is_not_text() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("cut.txt");
    fs::write(&path, [b'a', b'b', 0xE2, 0x82]).unwrap();
    assert!(!is_text_file(&path, &NullSink));
}
