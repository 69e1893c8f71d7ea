//! File decoding and encoding.
//!
//! Files are read as UTF-8 and split on any of `\r\n`, `\n` or `\r`. The
//! dominant terminator is reported for diagnostics only; saving always writes
//! `\n` between lines with no trailing terminator.

use std::path::Path;

use tracing::{debug, warn};

use crate::error::DocumentError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineEnding {
    #[default]
    Lf,
    Cr,
    Crlf,
}

impl LineEnding {
    pub fn as_str(self) -> &'static str {
        match self {
            LineEnding::Lf => "\n",
            LineEnding::Cr => "\r",
            LineEnding::Crlf => "\r\n",
        }
    }
}

/// Result of splitting raw file text into lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedText {
    pub lines: Vec<String>,
    /// Most frequent terminator; ties resolve CRLF > LF > CR.
    pub ending: LineEnding,
    /// More than one terminator style occurred.
    pub mixed: bool,
}

/// Split `input` into terminator-free lines. A final terminator does not
/// produce an extra empty line; empty input yields one empty line.
pub fn decode_lines(input: &str) -> DecodedText {
    let mut lines = Vec::new();
    let (mut crlf, mut lf, mut cr) = (0usize, 0usize, 0usize);
    let mut start = 0usize;
    let mut chars = input.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        match c {
            '\r' => {
                lines.push(input[start..i].to_string());
                if let Some(&(_, '\n')) = chars.peek() {
                    chars.next();
                    crlf += 1;
                    start = i + 2;
                } else {
                    cr += 1;
                    start = i + 1;
                }
            }
            '\n' => {
                lines.push(input[start..i].to_string());
                lf += 1;
                start = i + 1;
            }
            _ => {}
        }
    }
    if start < input.len() || lines.is_empty() {
        lines.push(input[start..].to_string());
    }
    let mut ending = LineEnding::Lf;
    let mut best = 0usize;
    for (style, count) in [
        (LineEnding::Crlf, crlf),
        (LineEnding::Lf, lf),
        (LineEnding::Cr, cr),
    ] {
        if count > best {
            best = count;
            ending = style;
        }
    }
    let mixed = [crlf, lf, cr].iter().filter(|n| **n > 0).count() > 1;
    DecodedText {
        lines,
        ending,
        mixed,
    }
}

pub fn read_file(path: &Path) -> Result<DecodedText, DocumentError> {
    let raw = std::fs::read_to_string(path).map_err(|source| DocumentError::Load {
        path: path.to_path_buf(),
        source,
    })?;
    let decoded = decode_lines(&raw);
    if decoded.mixed {
        warn!(target: "state.io", path = %path.display(), "mixed_line_endings_normalized");
    }
    debug!(target: "state.io", path = %path.display(), lines = decoded.lines.len(), ending = ?decoded.ending, "file_loaded");
    Ok(decoded)
}

pub fn write_file<'a>(
    path: &Path,
    lines: impl Iterator<Item = &'a str>,
) -> Result<(), DocumentError> {
    let text = lines.collect::<Vec<_>>().join("\n");
    std::fs::write(path, text.as_bytes()).map_err(|source| DocumentError::Save {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(target: "state.io", path = %path.display(), bytes = text.len(), "file_saved");
    Ok(())
}
