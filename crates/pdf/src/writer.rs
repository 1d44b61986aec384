//! Serializes a laid-out document into PDF with `lopdf`.
//!
//! Fonts are embedded as Type0 composite fonts over the original TrueType
//! data (`CIDFontType2`, `Identity-H`), so text is written as two-byte glyph
//! ids and any script the font covers renders. Only the glyphs actually drawn
//! get entries in the width array and the `ToUnicode` map.

use crate::fonts::{FontSet, LoadedFont};
use flate2::write::ZlibEncoder;
use flate2::Compression;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream, StringFormat};
use mdpress_core::{DrawCall, Error, FontHandle, LaidOutDocument, Page, Result};
use std::collections::BTreeMap;
use std::io::Write;

/// Glyphs drawn with one font, mapped to the character they came from.
type GlyphUsage = BTreeMap<u16, char>;

/// Writes [`LaidOutDocument`]s using a resolved font pair.
pub struct PdfWriter<'a> {
    fonts: &'a FontSet,
    title: Option<String>,
}

impl<'a> PdfWriter<'a> {
    /// Create a writer drawing with `fonts`.
    pub fn new(fonts: &'a FontSet) -> Self {
        Self { fonts, title: None }
    }

    /// Set the document title metadata.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Serialize `document` to `out`.
    pub fn write<W: Write>(&self, document: &LaidOutDocument, out: &mut W) -> Result<()> {
        let mut pdf = self.build(document)?;
        pdf.save_to(out).map_err(pdf_error)?;
        Ok(())
    }

    /// Build the in-memory PDF object graph.
    pub fn build(&self, document: &LaidOutDocument) -> Result<Document> {
        let mut pdf = Document::with_version("1.7");
        let pages_id = pdf.new_object_id();
        let mut usage = FontUsage::default();

        let mut page_ids = Vec::with_capacity(document.pages.len());
        for page in &document.pages {
            let content = self.page_content(page, &mut usage);
            let encoded = content.encode().map_err(pdf_error)?;
            let content_id = pdf.add_object(compressed_stream(Dictionary::new(), &encoded)?);
            let page_id = pdf.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            page_ids.push(page_id);
        }

        let mut font_resources = Dictionary::new();
        for (handle, glyphs) in [
            (FontHandle::regular(), &usage.regular),
            (FontHandle::bold(), &usage.bold),
        ] {
            if glyphs.is_empty() {
                continue;
            }
            let font_id = embed_font(&mut pdf, self.fonts.get(&handle), glyphs)?;
            font_resources.set(resource_name(&handle), font_id);
        }

        let kids: Vec<Object> = page_ids.iter().map(|id| Object::from(*id)).collect();
        let media_box: Vec<Object> = vec![
            0.into(),
            0.into(),
            document.page_width.into(),
            document.page_height.into(),
        ];
        pdf.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => page_ids.len() as i64,
                "MediaBox" => media_box,
                "Resources" => dictionary! { "Font" => font_resources },
            }),
        );

        let catalog_id = pdf.add_object(dictionary! { "Type" => "Catalog", "Pages" => pages_id });
        pdf.trailer.set("Root", catalog_id);

        let mut info = dictionary! {
            "Producer" => Object::String(b"mdpress".to_vec(), StringFormat::Literal),
        };
        if let Some(title) = &self.title {
            info.set("Title", Object::String(utf16_text(title), StringFormat::Hexadecimal));
        }
        let info_id = pdf.add_object(info);
        pdf.trailer.set("Info", info_id);

        log::debug!(
            "Built PDF with {} pages, {} regular and {} bold glyphs",
            page_ids.len(),
            usage.regular.len(),
            usage.bold.len()
        );
        Ok(pdf)
    }

    fn page_content(&self, page: &Page, usage: &mut FontUsage) -> Content {
        let mut operations = Vec::with_capacity(page.draws.len() * 4);
        for draw in &page.draws {
            if draw.text.is_empty() {
                continue;
            }
            let encoded = self.encode_text(draw, usage);
            operations.push(Operation::new("BT", vec![]));
            operations.push(Operation::new(
                "Tf",
                vec![Object::Name(resource_name(&draw.font).into_bytes()), draw.size.into()],
            ));
            operations.push(Operation::new("Td", vec![draw.x.into(), draw.y.into()]));
            operations.push(Operation::new(
                "Tj",
                vec![Object::String(encoded, StringFormat::Hexadecimal)],
            ));
            operations.push(Operation::new("ET", vec![]));
        }
        Content { operations }
    }

    /// Two-byte big-endian glyph ids for `draw.text`, recording usage.
    fn encode_text(&self, draw: &DrawCall, usage: &mut FontUsage) -> Vec<u8> {
        let font = self.fonts.get(&draw.font);
        let glyphs = usage.for_handle(&draw.font);
        let mut bytes = Vec::with_capacity(draw.text.len() * 2);
        for c in draw.text.chars() {
            let gid = font.glyph_id(c);
            glyphs.entry(gid).or_insert(c);
            bytes.extend_from_slice(&gid.to_be_bytes());
        }
        bytes
    }
}

#[derive(Debug, Default)]
struct FontUsage {
    regular: GlyphUsage,
    bold: GlyphUsage,
}

impl FontUsage {
    fn for_handle(&mut self, handle: &FontHandle) -> &mut GlyphUsage {
        if handle.is_bold {
            &mut self.bold
        } else {
            &mut self.regular
        }
    }
}

/// Resource name a handle is drawn with in content streams.
fn resource_name(handle: &FontHandle) -> String {
    if handle.is_bold {
        "F2".to_string()
    } else {
        "F1".to_string()
    }
}

/// Add the Type0 font, its CID descendant, descriptor, font file, and
/// `ToUnicode` map; returns the Type0 font id.
fn embed_font(pdf: &mut Document, font: &LoadedFont, glyphs: &GlyphUsage) -> Result<ObjectId> {
    let base_font = Object::Name(font.postscript_name().as_bytes().to_vec());
    let metrics = font.metrics();
    let per_mille = |units: i16| -> i64 {
        (units as f32 * 1000.0 / metrics.units_per_em.max(1) as f32).round() as i64
    };

    let font_file = compressed_stream(
        dictionary! { "Length1" => font.data().len() as i64 },
        font.data(),
    )?;
    let font_file_id = pdf.add_object(font_file);

    let flags: i64 = if font.handle().is_bold { 32 | (1 << 18) } else { 32 };
    let descriptor_id = pdf.add_object(dictionary! {
        "Type" => "FontDescriptor",
        "FontName" => base_font.clone(),
        "Flags" => flags,
        "FontBBox" => metrics.bbox.iter().map(|v| Object::Integer(per_mille(*v))).collect::<Vec<_>>(),
        "ItalicAngle" => metrics.italic_angle,
        "Ascent" => per_mille(metrics.ascender),
        "Descent" => per_mille(metrics.descender),
        "CapHeight" => per_mille(metrics.cap_height),
        "StemV" => if font.handle().is_bold { 120 } else { 80 },
        "FontFile2" => font_file_id,
    });

    let cid_font_id = pdf.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "CIDFontType2",
        "BaseFont" => base_font.clone(),
        "CIDSystemInfo" => dictionary! {
            "Registry" => Object::String(b"Adobe".to_vec(), StringFormat::Literal),
            "Ordering" => Object::String(b"Identity".to_vec(), StringFormat::Literal),
            "Supplement" => 0,
        },
        "FontDescriptor" => descriptor_id,
        "CIDToGIDMap" => "Identity",
        "W" => width_array(font, glyphs),
    });

    let to_unicode = compressed_stream(Dictionary::new(), to_unicode_cmap(glyphs).as_bytes())?;
    let to_unicode_id = pdf.add_object(to_unicode);

    Ok(pdf.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type0",
        "BaseFont" => base_font,
        "Encoding" => "Identity-H",
        "DescendantFonts" => vec![Object::from(cid_font_id)],
        "ToUnicode" => to_unicode_id,
    }))
}

/// `/W` entries of the form `gid [width]` for every used glyph.
fn width_array(font: &LoadedFont, glyphs: &GlyphUsage) -> Vec<Object> {
    let mut entries = Vec::with_capacity(glyphs.len() * 2);
    for &gid in glyphs.keys() {
        entries.push(Object::Integer(gid as i64));
        entries.push(Object::Array(vec![Object::Integer(
            font.advance_per_mille(gid).round() as i64,
        )]));
    }
    entries
}

/// A `ToUnicode` CMap mapping each used glyph back to its character.
fn to_unicode_cmap(glyphs: &GlyphUsage) -> String {
    let mut cmap = String::from(
        "/CIDInit /ProcSet findresource begin\n\
         12 dict begin\n\
         begincmap\n\
         /CIDSystemInfo << /Registry (Adobe) /Ordering (UCS) /Supplement 0 >> def\n\
         /CMapName /Adobe-Identity-UCS def\n\
         /CMapType 2 def\n\
         1 begincodespacerange\n\
         <0000> <FFFF>\n\
         endcodespacerange\n",
    );

    let entries: Vec<(&u16, &char)> = glyphs.iter().collect();
    // bfchar blocks are limited to 100 entries.
    for chunk in entries.chunks(100) {
        cmap.push_str(&format!("{} beginbfchar\n", chunk.len()));
        for (gid, c) in chunk {
            let mut units = [0u16; 2];
            let hex: String = c
                .encode_utf16(&mut units)
                .iter()
                .map(|u| format!("{:04X}", u))
                .collect();
            cmap.push_str(&format!("<{:04X}> <{}>\n", gid, hex));
        }
        cmap.push_str("endbfchar\n");
    }

    cmap.push_str(
        "endcmap\n\
         CMapName currentdict /CMap defineresource pop\n\
         end\n\
         end\n",
    );
    cmap
}

/// UTF-16BE with byte order mark, as PDF text strings require for non-ASCII.
fn utf16_text(text: &str) -> Vec<u8> {
    let mut bytes = vec![0xFE, 0xFF];
    for unit in text.encode_utf16() {
        bytes.extend_from_slice(&unit.to_be_bytes());
    }
    bytes
}

fn compressed_stream(mut dict: Dictionary, data: &[u8]) -> Result<Stream> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    let compressed = encoder.finish()?;
    dict.set("Filter", "FlateDecode");
    Ok(Stream::new(dict, compressed))
}

fn pdf_error(e: impl std::fmt::Display) -> Error {
    Error::PdfError(e.to_string())
}
