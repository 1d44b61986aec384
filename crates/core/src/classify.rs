//! Per-line classification of the supported markdown subset.
//!
//! Every physical line becomes exactly one [`ClassifiedLine`]. No state is
//! carried between lines: list context and table boundaries are not tracked.

use crate::{ClassifiedLine, Error, Result};
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;
use unicode_normalization::UnicodeNormalization;

/// `\r\n`, lone `\r`, `\n`, and the other Unicode line boundaries.
static LINE_BREAK_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\r\n|[\n\r\x0B\x0C\x1C-\x1E\x{85}\x{2028}\x{2029}]").unwrap()
});

/// Separator used when flattening a table row into a single line.
pub const TABLE_CELL_SEPARATOR: &str = " | ";

/// Classify every line of a markdown document.
pub fn classify(text: &str) -> Vec<ClassifiedLine> {
    split_lines(text).into_iter().map(classify_line).collect()
}

/// Split text into physical lines on any line boundary.
///
/// A trailing boundary does not start an extra empty line.
pub fn split_lines(text: &str) -> Vec<&str> {
    let mut lines: Vec<&str> = LINE_BREAK_REGEX.split(text).collect();
    if lines.last().is_some_and(|line| line.is_empty()) {
        lines.pop();
    }
    lines
}

/// Classify a single physical line.
pub fn classify_line(raw: &str) -> ClassifiedLine {
    let line = raw.trim_end();
    if line.trim().is_empty() {
        return ClassifiedLine::Blank;
    }

    if line.starts_with('#') {
        return ClassifiedLine::Heading(line.trim_start_matches('#').trim().to_string());
    }

    if line.starts_with('|') {
        return ClassifiedLine::Body(flatten_table_row(line));
    }

    ClassifiedLine::Body(line.to_string())
}

/// Flatten `| a | b |` into `a | b`.
fn flatten_table_row(line: &str) -> String {
    line.trim_matches('|')
        .split('|')
        .map(str::trim)
        .collect::<Vec<_>>()
        .join(TABLE_CELL_SEPARATOR)
}

/// Read a UTF-8 markdown document, normalized to NFC.
///
/// Composed forms matter for glyph lookup: a decomposed `й` would otherwise
/// be measured and drawn as two glyphs.
pub fn read_document(path: &Path) -> Result<String> {
    if !path.exists() {
        return Err(Error::InputNotFound(path.to_path_buf()));
    }
    let raw = std::fs::read_to_string(path)?;
    Ok(raw.nfc().collect())
}
