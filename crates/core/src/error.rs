//! Error types for markdown conversion.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while converting markdown into PDFs or decks.
#[derive(Error, Debug)]
pub enum Error {
    /// No candidate (regular, bold) font pair exists on this host.
    #[error("No suitable font pair found; searched: {0}")]
    FontUnavailable(String),

    /// A candidate font file exists but is not a usable TrueType font.
    #[error("Failed to parse font: {0}")]
    FontParseError(String),

    /// The source markdown document does not exist.
    #[error("Input document not found: {}", .0.display())]
    InputNotFound(PathBuf),

    /// Failed to read or write a file.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Failed to encode or save the PDF document.
    #[error("PDF error: {0}")]
    PdfError(String),

    /// ZIP archive error (for PPTX).
    #[error("ZIP error: {0}")]
    ZipError(String),

    /// XML writing or parsing error (for PPTX).
    #[error("XML error: {0}")]
    XmlError(String),
}
