//! PPTX (Office Open XML) backend for mdpress.
//!
//! Writes slide sections as a ZIP archive of PresentationML parts, and reads
//! slide outlines back from existing decks.

pub mod parts;
pub mod reader;
pub mod writer;

pub use reader::DeckReader;
pub use writer::DeckWriter;

use mdpress_core::{classify_slides, read_document, Result, SlideConfig};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Convert a markdown file into a slide deck, one slide per `## ` section.
pub fn markdown_to_pptx(source: &Path, target: &Path, config: &SlideConfig) -> Result<()> {
    let text = read_document(source)?;
    let sections = classify_slides(&text, config);

    let title = source
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("presentation");

    let file = File::create(target)?;
    let mut out = DeckWriter::new(config.clone())
        .with_title(title)
        .write(&sections, BufWriter::new(file))?;
    out.flush()?;

    log::debug!(
        "Wrote {} ({} slides) from {}",
        target.display(),
        sections.len(),
        source.display()
    );
    Ok(())
}
