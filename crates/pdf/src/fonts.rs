//! TrueType loading, metrics, and font pair resolution.

use mdpress_core::{
    default_candidates, find_candidate, CandidatePair, Error, FontHandle, Result, TextMeasure,
};
use std::collections::HashMap;
use std::path::Path;
use ttf_parser::{name_id, Face, GlyphId};

/// Resolves the regular/bold pair used for all measurement and drawing.
pub trait FontResolver {
    /// Locate, load, and register the font pair.
    fn resolve(&self) -> Result<FontSet>;
}

/// Probes a fixed candidate list on the local filesystem.
#[derive(Debug, Clone)]
pub struct SystemFontResolver {
    candidates: Vec<CandidatePair>,
}

impl SystemFontResolver {
    /// Resolver over the built-in candidate list.
    pub fn new() -> Self {
        Self {
            candidates: default_candidates(),
        }
    }

    /// Resolver over a custom candidate list, tried in order.
    pub fn with_candidates(candidates: Vec<CandidatePair>) -> Self {
        Self { candidates }
    }
}

impl Default for SystemFontResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl FontResolver for SystemFontResolver {
    fn resolve(&self) -> Result<FontSet> {
        let pair = find_candidate(&self.candidates)?;
        log::info!(
            "Using fonts {} / {}",
            pair.regular.display(),
            pair.bold.display()
        );
        Ok(FontSet {
            regular: LoadedFont::load(FontHandle::regular(), &pair.regular)?,
            bold: LoadedFont::load(FontHandle::bold(), &pair.bold)?,
        })
    }
}

/// Vertical metrics in font units, used for the PDF font descriptor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaceMetrics {
    pub units_per_em: u16,
    pub ascender: i16,
    pub descender: i16,
    pub cap_height: i16,
    pub bbox: [i16; 4],
    pub italic_angle: f32,
}

/// A parsed TrueType font registered under a logical handle.
///
/// The character map and advance widths are extracted once at load time, so
/// measurement never re-parses the font.
pub struct LoadedFont {
    handle: FontHandle,
    postscript_name: String,
    data: Vec<u8>,
    metrics: FaceMetrics,
    glyphs: HashMap<char, u16>,
    advances: Vec<u16>,
}

impl std::fmt::Debug for LoadedFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadedFont")
            .field("handle", &self.handle)
            .field("postscript_name", &self.postscript_name)
            .field("data_len", &self.data.len())
            .field("glyphs", &self.glyphs.len())
            .finish()
    }
}

impl LoadedFont {
    /// Read and parse a font file.
    pub fn load(handle: FontHandle, path: &Path) -> Result<Self> {
        let data = std::fs::read(path)?;
        Self::from_bytes(handle, data)
            .map_err(|e| Error::FontParseError(format!("{}: {}", path.display(), e)))
    }

    /// Parse font data already in memory.
    pub fn from_bytes(handle: FontHandle, data: Vec<u8>) -> Result<Self> {
        let face = Face::parse(&data, 0).map_err(|e| Error::FontParseError(e.to_string()))?;

        let bbox = face.global_bounding_box();
        let metrics = FaceMetrics {
            units_per_em: face.units_per_em(),
            ascender: face.ascender(),
            descender: face.descender(),
            cap_height: face.capital_height().unwrap_or_else(|| face.ascender()),
            bbox: [bbox.x_min, bbox.y_min, bbox.x_max, bbox.y_max],
            italic_angle: face.italic_angle(),
        };

        let mut glyphs = HashMap::new();
        if let Some(cmap) = face.tables().cmap {
            for subtable in cmap.subtables {
                if !subtable.is_unicode() {
                    continue;
                }
                subtable.codepoints(|code_point| {
                    if let (Some(c), Some(gid)) =
                        (char::from_u32(code_point), subtable.glyph_index(code_point))
                    {
                        glyphs.entry(c).or_insert(gid.0);
                    }
                });
            }
        }

        let advances = (0..face.number_of_glyphs())
            .map(|id| face.glyph_hor_advance(GlyphId(id)).unwrap_or(0))
            .collect();

        let postscript_name = postscript_name(&face).unwrap_or_else(|| handle.name.clone());

        log::debug!(
            "Loaded {} as {} ({} mapped chars)",
            postscript_name,
            handle.name,
            glyphs.len()
        );

        Ok(Self {
            handle,
            postscript_name,
            data,
            metrics,
            glyphs,
            advances,
        })
    }

    /// Logical handle this font is registered under.
    pub fn handle(&self) -> &FontHandle {
        &self.handle
    }

    /// PostScript name, safe for use as a PDF name.
    pub fn postscript_name(&self) -> &str {
        &self.postscript_name
    }

    /// Raw TrueType bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn metrics(&self) -> &FaceMetrics {
        &self.metrics
    }

    /// Glyph for `c`, or `.notdef` (0) when the font lacks it.
    pub fn glyph_id(&self, c: char) -> u16 {
        self.glyphs.get(&c).copied().unwrap_or(0)
    }

    /// Advance width of a glyph in font units.
    pub fn advance(&self, gid: u16) -> u16 {
        self.advances.get(gid as usize).copied().unwrap_or(0)
    }

    /// Advance width of a glyph scaled to a 1000-unit em.
    pub fn advance_per_mille(&self, gid: u16) -> f32 {
        self.scale(self.advance(gid) as f32, 1000.0)
    }

    /// Rendered width of `text` at `size` points.
    pub fn text_width(&self, text: &str, size: f32) -> f32 {
        let units: u32 = text
            .chars()
            .map(|c| self.advance(self.glyph_id(c)) as u32)
            .sum();
        self.scale(units as f32, size)
    }

    fn scale(&self, units: f32, size: f32) -> f32 {
        units * size / self.metrics.units_per_em.max(1) as f32
    }
}

/// PostScript name (name id 6), falling back to the full or family name.
fn postscript_name(face: &Face<'_>) -> Option<String> {
    [name_id::POST_SCRIPT_NAME, name_id::FULL_NAME, name_id::FAMILY]
        .into_iter()
        .find_map(|id| {
            face.names()
                .into_iter()
                .filter(|n| n.name_id == id)
                .find_map(|n| n.to_string())
        })
        .map(|name| {
            name.chars()
                .filter(|c| c.is_ascii_graphic() && !"()<>[]{}/%#".contains(*c))
                .collect::<String>()
        })
        .filter(|name| !name.is_empty())
}

/// The resolved regular/bold pair.
#[derive(Debug)]
pub struct FontSet {
    pub regular: LoadedFont,
    pub bold: LoadedFont,
}

impl FontSet {
    /// Pair two already-loaded fonts.
    pub fn new(regular: LoadedFont, bold: LoadedFont) -> Self {
        Self { regular, bold }
    }

    /// The loaded font a handle refers to.
    pub fn get(&self, handle: &FontHandle) -> &LoadedFont {
        if handle.is_bold {
            &self.bold
        } else {
            &self.regular
        }
    }
}

impl TextMeasure for FontSet {
    fn text_width(&self, font: &FontHandle, text: &str, size: f32) -> f32 {
        self.get(font).text_width(text, size)
    }
}
