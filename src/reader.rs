use crate::error::CodepressError;
use std::fs::{self, File};
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Reads a file as UTF-8, keeping at most `truncate_lines` lines.
///
/// A line ends at `\n` (the terminator is kept); a final line without one still counts.
/// Reading stops as soon as the limit is reached. `Some(0)` yields an empty string and does
/// not touch the file contents.
///
/// # Errors
///
/// [`CodepressError::Io`] if the file cannot be opened or read, [`CodepressError::Decode`]
/// if the bytes that were read are not valid UTF-8.
pub fn read_file(path: &Path, truncate_lines: Option<usize>) -> Result<String, CodepressError> {
    let bytes = match truncate_lines {
        None => fs::read(path).map_err(|e| CodepressError::io(path, e))?,
        Some(limit) => read_lines(path, limit)?,
    };
    String::from_utf8(bytes).map_err(|source| CodepressError::Decode {
        path: path.to_path_buf(),
        source,
    })
}

fn read_lines(path: &Path, limit: usize) -> Result<Vec<u8>, CodepressError> {
    let file = File::open(path).map_err(|e| CodepressError::io(path, e))?;
    let mut reader = BufReader::new(file);
    let mut buffer = Vec::new();
    for _ in 0..limit {
        let read = reader
            .read_until(b'\n', &mut buffer)
            .map_err(|e| CodepressError::io(path, e))?;
        if read == 0 {
            break;
        }
    }
    Ok(buffer)
}
