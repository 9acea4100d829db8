//! On-disk history format
//!
//! The file starts with a cookie line followed by one entry per line.
//! Inside entries, space, tab, newline and backslash bytes are written as
//! a backslash and three octal digits, so every entry fits on one line.

use std::fs;
use std::io::{self, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

pub const COOKIE: &str = "_HiStOrY_V2_";

#[derive(Debug, Error)]
pub enum HistoryFileError {
    #[error("history file I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("invalid escape sequence {sequence:?} on line {line}")]
    MalformedEscape { line: usize, sequence: String },
    #[error("history entry on line {line} is not valid UTF-8")]
    InvalidUtf8 { line: usize },
}

/// Default location: `<data_dir>/lineweave/history`
pub fn default_history_path() -> Option<PathBuf> {
    dirs::data_dir().map(|d| d.join("lineweave").join("history"))
}

/// Load history entries from a file. A missing file is an empty history.
pub fn load_history(path: &Path) -> Result<Vec<String>, HistoryFileError> {
    let file = match fs::File::open(path) {
        Ok(f) => f,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };
    let entries = load_history_from(file)?;
    debug!(path = %path.display(), count = entries.len(), "history loaded");
    Ok(entries)
}

/// Load history entries from a reader. Content without the cookie line is
/// not ours and yields an empty history.
pub fn load_history_from<R: Read>(mut reader: R) -> Result<Vec<String>, HistoryFileError> {
    let mut contents = Vec::new();
    reader.read_to_end(&mut contents)?;

    let header = format!("{}\n", COOKIE);
    let Some(body) = contents.strip_prefix(header.as_bytes()) else {
        return Ok(Vec::new());
    };
    let body = body.strip_suffix(b"\n").unwrap_or(body);
    if body.is_empty() {
        return Ok(Vec::new());
    }

    body.split(|&b| b == b'\n')
        .enumerate()
        // The cookie is line 1
        .map(|(i, line)| unescape_line(line, i + 2))
        .collect()
}

/// Write history entries to a file, replacing it
pub fn save_history(entries: &[String], path: &Path) -> Result<(), HistoryFileError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let file = fs::File::create(path)?;
    save_history_to(entries, file)?;
    debug!(path = %path.display(), count = entries.len(), "history saved");
    Ok(())
}

/// Write the cookie line and the escaped entries
pub fn save_history_to<W: Write>(entries: &[String], writer: W) -> Result<(), HistoryFileError> {
    let mut w = BufWriter::new(writer);
    w.write_all(COOKIE.as_bytes())?;
    w.write_all(b"\n")?;
    for entry in entries {
        w.write_all(&escape_entry(entry))?;
        w.write_all(b"\n")?;
    }
    w.flush()?;
    Ok(())
}

fn escape_entry(entry: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(entry.len());
    for &b in entry.as_bytes() {
        if matches!(b, b' ' | b'\t' | b'\n' | b'\\') {
            out.push(b'\\');
            out.push(b'0' + ((b >> 6) & 7));
            out.push(b'0' + ((b >> 3) & 7));
            out.push(b'0' + (b & 7));
        } else {
            out.push(b);
        }
    }
    out
}

fn unescape_line(line: &[u8], line_no: usize) -> Result<String, HistoryFileError> {
    let mut out = Vec::with_capacity(line.len());
    let mut i = 0;
    while i < line.len() {
        if line[i] != b'\\' {
            out.push(line[i]);
            i += 1;
            continue;
        }
        let digits = line.get(i + 1..i + 4).unwrap_or(&line[i + 1..]);
        let malformed = || HistoryFileError::MalformedEscape {
            line: line_no,
            sequence: String::from_utf8_lossy(&line[i..i + 1 + digits.len()]).into_owned(),
        };
        if digits.len() != 3 || !digits.iter().all(|d| (b'0'..=b'7').contains(d)) {
            return Err(malformed());
        }
        let value = digits.iter().fold(0u32, |acc, d| (acc << 3) | u32::from(d - b'0'));
        let byte = u8::try_from(value).map_err(|_| malformed())?;
        out.push(byte);
        i += 4;
    }
    String::from_utf8(out).map_err(|_| HistoryFileError::InvalidUtf8 { line: line_no })
}
