//! PDF backend: TrueType font resolution and metrics, and a `lopdf` writer
//! for laid-out markdown documents.

pub mod fonts;
#[cfg(any(test, feature = "test-fonts"))]
pub mod testing;
pub mod writer;

pub use fonts::{FontResolver, FontSet, LoadedFont, SystemFontResolver};
pub use writer::PdfWriter;

use mdpress_core::{classify, layout, read_document, LayoutConfig, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Convert a markdown file into a paginated PDF.
///
/// The document title is the source file's stem.
pub fn markdown_to_pdf(
    source: &Path,
    target: &Path,
    fonts: &FontSet,
    config: &LayoutConfig,
) -> Result<()> {
    let text = read_document(source)?;
    let lines = classify(&text);
    let document = layout(&lines, config, fonts);

    let title = source
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("document");

    let file = File::create(target)?;
    let mut out = BufWriter::new(file);
    PdfWriter::new(fonts).with_title(title).write(&document, &mut out)?;
    out.flush()?;

    log::debug!(
        "Wrote {} ({} pages) from {}",
        target.display(),
        document.page_count(),
        source.display()
    );
    Ok(())
}
