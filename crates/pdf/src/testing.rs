//! A synthetic TrueType font pair for exercising the PDF pipeline without
//! relying on fonts installed on the host.
//!
//! The fonts carry only `cmap`, `head`, `hhea`, `hmtx` and `maxp`: enough for
//! glyph lookup, advance widths and embedding. Printable ASCII and the basic
//! Cyrillic block are mapped; every mapped glyph has the same advance.

use crate::fonts::{FontResolver, FontSet, LoadedFont};
use mdpress_core::{FontHandle, Result};

/// Units per em of the synthetic fonts.
pub const UNITS_PER_EM: u16 = 1000;

/// Advance of every mapped glyph in the regular font, in font units.
pub const REGULAR_ADVANCE: u16 = 600;

/// Advance of every mapped glyph in the bold font, in font units.
pub const BOLD_ADVANCE: u16 = 650;

const NOTDEF_ADVANCE: u16 = 500;

/// Mapped ranges as (first char, last char, first glyph id).
const SEGMENTS: [(u16, u16, u16); 2] = [(0x20, 0x7E, 1), (0x400, 0x44F, 96)];

const GLYPH_COUNT: u16 = 176;

/// Resolves to the synthetic regular/bold pair.
#[derive(Debug, Clone, Copy, Default)]
pub struct SyntheticFontResolver;

impl FontResolver for SyntheticFontResolver {
    fn resolve(&self) -> Result<FontSet> {
        Ok(FontSet::new(
            LoadedFont::from_bytes(FontHandle::regular(), font_bytes(REGULAR_ADVANCE))?,
            LoadedFont::from_bytes(FontHandle::bold(), font_bytes(BOLD_ADVANCE))?,
        ))
    }
}

/// A complete TrueType file whose mapped glyphs all advance by `advance`.
pub fn font_bytes(advance: u16) -> Vec<u8> {
    let tables: [(&[u8; 4], Vec<u8>); 5] = [
        (b"cmap", cmap_table()),
        (b"head", head_table()),
        (b"hhea", hhea_table(advance)),
        (b"hmtx", hmtx_table(advance)),
        (b"maxp", maxp_table()),
    ];

    let mut out = Vec::new();
    push_u32(&mut out, 0x0001_0000);
    push_u16(&mut out, tables.len() as u16);
    push_u16(&mut out, 64); // searchRange
    push_u16(&mut out, 2); // entrySelector
    push_u16(&mut out, 16); // rangeShift

    let mut body = Vec::new();
    let mut offset = 12 + 16 * tables.len() as u32;
    for (tag, data) in &tables {
        out.extend_from_slice(*tag);
        push_u32(&mut out, 0); // checksum
        push_u32(&mut out, offset);
        push_u32(&mut out, data.len() as u32);

        body.extend_from_slice(data);
        while body.len() % 4 != 0 {
            body.push(0);
        }
        offset = 12 + 16 * tables.len() as u32 + body.len() as u32;
    }

    out.extend_from_slice(&body);
    out
}

fn head_table() -> Vec<u8> {
    let mut t = Vec::with_capacity(54);
    push_u32(&mut t, 0x0001_0000); // version
    push_u32(&mut t, 0x0001_0000); // fontRevision
    push_u32(&mut t, 0); // checkSumAdjustment
    push_u32(&mut t, 0x5F0F_3CF5); // magicNumber
    push_u16(&mut t, 0); // flags
    push_u16(&mut t, UNITS_PER_EM);
    t.extend_from_slice(&[0; 16]); // created, modified
    push_i16(&mut t, 0); // xMin
    push_i16(&mut t, -200); // yMin
    push_i16(&mut t, 1000); // xMax
    push_i16(&mut t, 800); // yMax
    push_u16(&mut t, 0); // macStyle
    push_u16(&mut t, 8); // lowestRecPPEM
    push_i16(&mut t, 2); // fontDirectionHint
    push_i16(&mut t, 0); // indexToLocFormat
    push_i16(&mut t, 0); // glyphDataFormat
    t
}

fn hhea_table(advance: u16) -> Vec<u8> {
    let mut t = Vec::with_capacity(36);
    push_u32(&mut t, 0x0001_0000);
    push_i16(&mut t, 800); // ascender
    push_i16(&mut t, -200); // descender
    push_i16(&mut t, 0); // lineGap
    push_u16(&mut t, advance.max(NOTDEF_ADVANCE)); // advanceWidthMax
    t.extend_from_slice(&[0; 22]); // bearings, extent, caret, reserved, format
    push_u16(&mut t, GLYPH_COUNT); // numberOfHMetrics
    t
}

fn hmtx_table(advance: u16) -> Vec<u8> {
    let mut t = Vec::with_capacity(GLYPH_COUNT as usize * 4);
    for gid in 0..GLYPH_COUNT {
        push_u16(&mut t, if gid == 0 { NOTDEF_ADVANCE } else { advance });
        push_i16(&mut t, 0);
    }
    t
}

fn maxp_table() -> Vec<u8> {
    let mut t = Vec::with_capacity(6);
    push_u32(&mut t, 0x0000_5000);
    push_u16(&mut t, GLYPH_COUNT);
    t
}

/// One Windows Unicode BMP subtable in format 4, mapping by id delta.
fn cmap_table() -> Vec<u8> {
    let seg_count = SEGMENTS.len() as u16 + 1;

    let mut t = Vec::new();
    push_u16(&mut t, 0); // version
    push_u16(&mut t, 1); // numTables
    push_u16(&mut t, 3); // platformID: Windows
    push_u16(&mut t, 1); // encodingID: Unicode BMP
    push_u32(&mut t, 12); // subtable offset

    push_u16(&mut t, 4); // format
    push_u16(&mut t, 16 + 8 * seg_count); // length
    push_u16(&mut t, 0); // language
    push_u16(&mut t, seg_count * 2);
    push_u16(&mut t, 4); // searchRange
    push_u16(&mut t, 1); // entrySelector
    push_u16(&mut t, seg_count * 2 - 4); // rangeShift

    for (_, end, _) in SEGMENTS {
        push_u16(&mut t, end);
    }
    push_u16(&mut t, 0xFFFF);
    push_u16(&mut t, 0); // reservedPad
    for (start, _, _) in SEGMENTS {
        push_u16(&mut t, start);
    }
    push_u16(&mut t, 0xFFFF);
    for (start, _, first_glyph) in SEGMENTS {
        push_u16(&mut t, first_glyph.wrapping_sub(start));
    }
    push_u16(&mut t, 1);
    for _ in 0..seg_count {
        push_u16(&mut t, 0); // idRangeOffset
    }
    t
}

fn push_u16(buf: &mut Vec<u8>, value: u16) {
    buf.extend_from_slice(&value.to_be_bytes());
}

fn push_i16(buf: &mut Vec<u8>, value: i16) {
    buf.extend_from_slice(&value.to_be_bytes());
}

fn push_u32(buf: &mut Vec<u8>, value: u32) {
    buf.extend_from_slice(&value.to_be_bytes());
}
