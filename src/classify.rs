//! Per-path predicates: hidden-file detection and text/binary classification.

use crate::events::{Event, EventSink};
use std::fs::File;
use std::io::{self, Read};
use std::path::{Component, Path};

/// Bytes inspected by the fallback heuristic.
const SAMPLE_SIZE: u64 = 1024;

/// Top-level MIME types that never carry readable text.
const BINARY_TOP_LEVEL: &[&str] = &["image/", "video/", "audio/", "font/", "model/"];

/// `application/` subtypes known to be binary payloads.
const BINARY_APPLICATION_SUBTYPES: &[&str] = &[
    // archives
    "zip",
    "x-zip-compressed",
    "epub+zip",
    "x-tar",
    "x-7z-compressed",
    "vnd.rar",
    "x-rar-compressed",
    "gzip",
    "x-gzip",
    "x-bzip2",
    "vnd.bzip3",
    "x-xz",
    "zstd",
    "x-lzip",
    "x-lz4",
    "x-compress",
    "x-unix-archive",
    "x-cpio",
    "vnd.ms-cab-compressed",
    "x-par2",
    "x-google-chrome-extension",
    // executables
    "x-executable",
    "x-elf",
    "x-sharedlib",
    "x-mach-binary",
    "x-msdownload",
    "x-dosexec",
    "vnd.microsoft.portable-executable",
    "java-archive",
    "x-java-archive",
    "java-vm",
    "java",
    "x-java-applet",
    "wasm",
    "vnd.android.dex",
    "vnd.android.dey",
    "x-llvm",
    // documents
    "pdf",
    "msword",
    "vnd.ms-excel",
    "vnd.ms-powerpoint",
    "x-ole-storage",
    "x-mobipocket-ebook",
    // disk and package images
    "x-iso9660-image",
    "vnd.android.package-archive",
    "x-apple-diskimage",
    "vnd.debian.binary-package",
    "x-debian-package",
    "x-rpm",
    // certificates and keys
    "x-x509-ca-cert",
    "pkix-cert",
    "pkcs12",
    "x-pkcs12",
    "x-pem-file",
    // misc
    "x-shockwave-flash",
    "x-netcdf",
    "netcdf",
    "vnd.wolfram.mathematica",
    "mathematica",
    "vnd.ms-fontobject",
    "x-font-ttf",
    "font-sfnt",
    "font-woff",
    "vnd.sqlite3",
    "x-sqlite3",
    "dicom",
    "x-nintendo-nes-rom",
    "octet-stream",
];

/// Families of `application/` subtypes matched by prefix (office suites).
const BINARY_APPLICATION_PREFIXES: &[&str] = &[
    "vnd.openxmlformats-officedocument.",
    "vnd.oasis.opendocument.",
];

/// Returns true if `path` is hidden relative to `root`.
///
/// A path is hidden when its base name starts with `.` or when any directory between `root`
/// and the file does. Segments that belong to `root` itself are not considered, so walking
/// `./.config/app` still yields its visible files.
pub fn is_hidden(root: &Path, path: &Path) -> bool {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative.components().any(|component| match component {
        Component::Normal(segment) => segment.to_string_lossy().starts_with('.'),
        _ => false,
    })
}

/// Decides whether a file should be treated as human-readable text.
///
/// Content is first sniffed for a known file signature; if no signature is recognized (or the
/// sniff cannot run) a byte heuristic over the first 1024 bytes decides. This never fails:
/// every error resolves to a verdict and, where relevant, an event on `sink`.
pub fn is_text_file(path: &Path, sink: &dyn EventSink) -> bool {
    if path.is_dir() {
        return false;
    }
    match sniff_mime(path) {
        Ok(Some(mime)) => is_text_mime(mime),
        Ok(None) => sample_is_text(path, sink),
        Err(error) => {
            sink.record(&Event::SniffFailed { path, error: &error });
            sample_is_text(path, sink)
        }
    }
}

/// Primary strategy: infer a MIME type from the file's magic bytes.
///
/// `Ok(None)` means the content matched no known signature, which is the common case for
/// source code.
pub fn sniff_mime(path: &Path) -> io::Result<Option<&'static str>> {
    Ok(infer::get_from_path(path)?.map(|kind| kind.mime_type()))
}

/// Verdict for a sniffed MIME type.
pub fn is_text_mime(mime: &str) -> bool {
    if BINARY_TOP_LEVEL.iter().any(|prefix| mime.starts_with(prefix)) {
        return false;
    }
    match mime.strip_prefix("application/") {
        Some(subtype) => !is_binary_application_subtype(subtype),
        None => true,
    }
}

fn is_binary_application_subtype(subtype: &str) -> bool {
    BINARY_APPLICATION_SUBTYPES.contains(&subtype)
        || BINARY_APPLICATION_PREFIXES
            .iter()
            .any(|prefix| subtype.starts_with(prefix))
}

/// Fallback strategy: null bytes mean binary, otherwise the sample must decode as UTF-8.
fn sample_is_text(path: &Path, sink: &dyn EventSink) -> bool {
    let sample = match read_sample(path) {
        Ok(sample) => sample,
        Err(error) => {
            sink.record(&Event::SniffFailed { path, error: &error });
            return false;
        }
    };
    if content_inspector::inspect(&sample).is_binary() {
        return false;
    }
    match std::str::from_utf8(&sample) {
        Ok(_) => true,
        // A multi-byte character cut off by the sample boundary is still text.
        Err(e) if e.error_len().is_none() && sample.len() as u64 == SAMPLE_SIZE => true,
        Err(_) => {
            sink.record(&Event::UndecodableSample { path });
            false
        }
    }
}

fn read_sample(path: &Path) -> io::Result<Vec<u8>> {
    let mut sample = Vec::with_capacity(SAMPLE_SIZE as usize);
    File::open(path)?.take(SAMPLE_SIZE).read_to_end(&mut sample)?;
    Ok(sample)
}
