//! PPTX deck writer.

use crate::parts::*;
use mdpress_core::{Error, Result, SlideConfig, SlideSection};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::io::{Seek, Write};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Writes slide sections as a "Title and Content" deck.
#[derive(Debug, Clone)]
pub struct DeckWriter {
    config: SlideConfig,
    title: Option<String>,
}

impl DeckWriter {
    /// Create a writer with the given slide constants.
    pub fn new(config: SlideConfig) -> Self {
        Self {
            config,
            title: None,
        }
    }

    /// Set the deck title stored in the package metadata.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Write one slide per section to `writer`, returning it when done.
    ///
    /// Bullets beyond `max_bullets` per section are dropped.
    pub fn write<W: Write + Seek>(&self, sections: &[SlideSection], writer: W) -> Result<W> {
        let mut zip = ZipWriter::new(writer);
        let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

        let mut add = |path: &str, content: &[u8]| -> Result<()> {
            zip.start_file(path, options)
                .map_err(|e| Error::ZipError(format!("Failed to start '{}': {}", path, e)))?;
            zip.write_all(content)?;
            Ok(())
        };

        add("[Content_Types].xml", &content_types_xml(sections.len())?)?;
        add("_rels/.rels", &package_rels_xml()?)?;
        add("docProps/core.xml", &core_properties_xml(self.title.as_deref())?)?;
        add("ppt/presentation.xml", &presentation_xml(sections.len())?)?;
        add("ppt/_rels/presentation.xml.rels", &presentation_rels_xml(sections.len())?)?;
        add(SLIDE_MASTER_PATH, SLIDE_MASTER_XML.as_bytes())?;
        add(SLIDE_MASTER_RELS_PATH, SLIDE_MASTER_RELS_XML.as_bytes())?;
        add(SLIDE_LAYOUT_PATH, SLIDE_LAYOUT_XML.as_bytes())?;
        add(SLIDE_LAYOUT_RELS_PATH, SLIDE_LAYOUT_RELS_XML.as_bytes())?;
        add(THEME_PATH, THEME_XML.as_bytes())?;

        for (index, section) in sections.iter().enumerate() {
            let number = index + 1;
            if section.bullets.len() > self.config.max_bullets {
                log::debug!(
                    "Slide '{}' keeps {} of {} bullets",
                    section.title,
                    self.config.max_bullets,
                    section.bullets.len()
                );
            }
            add(
                &format!("ppt/slides/slide{}.xml", number),
                &slide_xml(section, &self.config)?,
            )?;
            add(
                &format!("ppt/slides/_rels/slide{}.xml.rels", number),
                &slide_rels_xml()?,
            )?;
        }

        let writer = zip
            .finish()
            .map_err(|e| Error::ZipError(format!("Failed to finish archive: {}", e)))?;
        log::debug!("Wrote deck with {} slides", sections.len());
        Ok(writer)
    }
}

impl Default for DeckWriter {
    fn default() -> Self {
        Self::new(SlideConfig::default())
    }
}

/// Thin wrapper over `quick_xml::Writer` with error mapping.
struct XmlBuilder {
    writer: Writer<Vec<u8>>,
}

impl XmlBuilder {
    fn new() -> Result<Self> {
        let mut builder = Self {
            writer: Writer::new(Vec::new()),
        };
        builder.event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))?;
        Ok(builder)
    }

    fn event(&mut self, event: Event<'_>) -> Result<()> {
        self.writer
            .write_event(event)
            .map_err(|e| Error::XmlError(e.to_string()))
    }

    fn start(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<()> {
        self.event(Event::Start(BytesStart::new(name).with_attributes(attrs.iter().copied())))
    }

    fn empty(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<()> {
        self.event(Event::Empty(BytesStart::new(name).with_attributes(attrs.iter().copied())))
    }

    fn text(&mut self, text: &str) -> Result<()> {
        self.event(Event::Text(BytesText::new(text)))
    }

    fn end(&mut self, name: &str) -> Result<()> {
        self.event(Event::End(BytesEnd::new(name)))
    }

    /// `<name>text</name>`
    fn element(&mut self, name: &str, text: &str) -> Result<()> {
        self.start(name, &[])?;
        self.text(text)?;
        self.end(name)
    }

    fn finish(self) -> Vec<u8> {
        self.writer.into_inner()
    }
}

fn content_types_xml(slide_count: usize) -> Result<Vec<u8>> {
    let mut xml = XmlBuilder::new()?;
    xml.start("Types", &[("xmlns", NS_CONTENT_TYPES)])?;
    xml.empty(
        "Default",
        &[("Extension", "rels"), ("ContentType", "application/vnd.openxmlformats-package.relationships+xml")],
    )?;
    xml.empty("Default", &[("Extension", "xml"), ("ContentType", "application/xml")])?;

    let fixed = [
        ("/ppt/presentation.xml", CT_PRESENTATION),
        ("/ppt/slideMasters/slideMaster1.xml", CT_SLIDE_MASTER),
        ("/ppt/slideLayouts/slideLayout1.xml", CT_SLIDE_LAYOUT),
        ("/ppt/theme/theme1.xml", CT_THEME),
        ("/docProps/core.xml", CT_CORE_PROPERTIES),
    ];
    for (part, content_type) in fixed {
        xml.empty("Override", &[("PartName", part), ("ContentType", content_type)])?;
    }
    for number in 1..=slide_count {
        let part = format!("/ppt/slides/slide{}.xml", number);
        xml.empty("Override", &[("PartName", part.as_str()), ("ContentType", CT_SLIDE)])?;
    }

    xml.end("Types")?;
    Ok(xml.finish())
}

fn package_rels_xml() -> Result<Vec<u8>> {
    relationships_xml(&[
        relationship("rId1", REL_OFFICE_DOCUMENT, "ppt/presentation.xml"),
        relationship("rId2", REL_CORE_PROPERTIES, "docProps/core.xml"),
    ])
}

fn slide_rels_xml() -> Result<Vec<u8>> {
    relationships_xml(&[relationship(
        "rId1",
        REL_SLIDE_LAYOUT,
        "../slideLayouts/slideLayout1.xml",
    )])
}

/// Relationship id of the `number`th slide (1-based) in the presentation part.
///
/// rId1 and rId2 are taken by the master and theme.
fn slide_rel_id(number: usize) -> String {
    format!("rId{}", number + 2)
}

fn presentation_rels_xml(slide_count: usize) -> Result<Vec<u8>> {
    let mut rels = vec![
        relationship("rId1", REL_SLIDE_MASTER, "slideMasters/slideMaster1.xml"),
        relationship("rId2", REL_THEME, "theme/theme1.xml"),
    ];
    for number in 1..=slide_count {
        rels.push(relationship(
            &slide_rel_id(number),
            REL_SLIDE,
            &format!("slides/slide{}.xml", number),
        ));
    }
    relationships_xml(&rels)
}

/// (Id, Type, Target)
type Relationship = (String, &'static str, String);

fn relationship(id: &str, kind: &'static str, target: &str) -> Relationship {
    (id.to_string(), kind, target.to_string())
}

fn relationships_xml(rels: &[Relationship]) -> Result<Vec<u8>> {
    let mut xml = XmlBuilder::new()?;
    xml.start("Relationships", &[("xmlns", NS_PKG_RELS)])?;
    for (id, kind, target) in rels {
        xml.empty(
            "Relationship",
            &[("Id", id.as_str()), ("Type", *kind), ("Target", target.as_str())],
        )?;
    }
    xml.end("Relationships")?;
    Ok(xml.finish())
}

fn core_properties_xml(title: Option<&str>) -> Result<Vec<u8>> {
    let mut xml = XmlBuilder::new()?;
    xml.start(
        "cp:coreProperties",
        &[
            ("xmlns:cp", "http://schemas.openxmlformats.org/package/2006/metadata/core-properties"),
            ("xmlns:dc", "http://purl.org/dc/elements/1.1/"),
            ("xmlns:dcterms", "http://purl.org/dc/terms/"),
            ("xmlns:xsi", "http://www.w3.org/2001/XMLSchema-instance"),
        ],
    )?;
    if let Some(title) = title {
        xml.element("dc:title", title)?;
    }
    xml.element("dc:creator", "mdpress")?;
    xml.end("cp:coreProperties")?;
    Ok(xml.finish())
}

fn presentation_xml(slide_count: usize) -> Result<Vec<u8>> {
    let mut xml = XmlBuilder::new()?;
    xml.start(
        "p:presentation",
        &[("xmlns:a", NS_A), ("xmlns:r", NS_R), ("xmlns:p", NS_P), ("saveSubsetFonts", "1")],
    )?;

    xml.start("p:sldMasterIdLst", &[])?;
    xml.empty("p:sldMasterId", &[("id", "2147483648"), ("r:id", "rId1")])?;
    xml.end("p:sldMasterIdLst")?;

    if slide_count > 0 {
        xml.start("p:sldIdLst", &[])?;
        for number in 1..=slide_count {
            let id = (255 + number).to_string();
            let rel = slide_rel_id(number);
            xml.empty("p:sldId", &[("id", id.as_str()), ("r:id", rel.as_str())])?;
        }
        xml.end("p:sldIdLst")?;
    }

    let cx = SLIDE_WIDTH_EMU.to_string();
    let cy = SLIDE_HEIGHT_EMU.to_string();
    xml.empty(
        "p:sldSz",
        &[("cx", cx.as_str()), ("cy", cy.as_str()), ("type", "screen4x3")],
    )?;
    xml.empty("p:notesSz", &[("cx", cy.as_str()), ("cy", cx.as_str())])?;
    xml.end("p:presentation")?;
    Ok(xml.finish())
}

/// Font size in the hundredths of a point DrawingML expects.
fn drawing_size(points: f32) -> String {
    ((points * 100.0).round() as i64).to_string()
}

fn slide_xml(section: &SlideSection, config: &SlideConfig) -> Result<Vec<u8>> {
    let mut xml = XmlBuilder::new()?;
    xml.start("p:sld", &[("xmlns:a", NS_A), ("xmlns:r", NS_R), ("xmlns:p", NS_P)])?;
    xml.start("p:cSld", &[])?;
    xml.start("p:spTree", &[])?;

    xml.start("p:nvGrpSpPr", &[])?;
    xml.empty("p:cNvPr", &[("id", "1"), ("name", "")])?;
    xml.empty("p:cNvGrpSpPr", &[])?;
    xml.empty("p:nvPr", &[])?;
    xml.end("p:nvGrpSpPr")?;
    xml.start("p:grpSpPr", &[])?;
    xml.start("a:xfrm", &[])?;
    xml.empty("a:off", &[("x", "0"), ("y", "0")])?;
    xml.empty("a:ext", &[("cx", "0"), ("cy", "0")])?;
    xml.empty("a:chOff", &[("x", "0"), ("y", "0")])?;
    xml.empty("a:chExt", &[("cx", "0"), ("cy", "0")])?;
    xml.end("a:xfrm")?;
    xml.end("p:grpSpPr")?;

    // Title placeholder
    placeholder_start(&mut xml, "2", "Title 1", &[("type", "title")], TITLE_FRAME)?;
    xml.start("p:txBody", &[])?;
    xml.empty("a:bodyPr", &[])?;
    xml.empty("a:lstStyle", &[])?;
    paragraph(&mut xml, &section.title, &drawing_size(config.title_size), None)?;
    xml.end("p:txBody")?;
    xml.end("p:sp")?;

    // Body placeholder
    placeholder_start(&mut xml, "3", "Content Placeholder 2", &[("idx", "1")], BODY_FRAME)?;
    xml.start("p:txBody", &[])?;
    xml.start("a:bodyPr", &[])?;
    xml.empty("a:normAutofit", &[])?;
    xml.end("a:bodyPr")?;
    xml.empty("a:lstStyle", &[])?;
    let bullets = section.visible_bullets(config.max_bullets);
    if bullets.is_empty() {
        xml.empty("a:p", &[])?;
    }
    let bullet_size = drawing_size(config.bullet_size);
    for bullet in bullets {
        paragraph(&mut xml, bullet, &bullet_size, Some(&config.bullet_font))?;
    }
    xml.end("p:txBody")?;
    xml.end("p:sp")?;

    xml.end("p:spTree")?;
    xml.end("p:cSld")?;
    xml.start("p:clrMapOvr", &[])?;
    xml.empty("a:masterClrMapping", &[])?;
    xml.end("p:clrMapOvr")?;
    xml.end("p:sld")?;
    Ok(xml.finish())
}

/// Opens `<p:sp>` and writes its non-visual properties and frame.
fn placeholder_start(
    xml: &mut XmlBuilder,
    id: &str,
    name: &str,
    ph_attrs: &[(&str, &str)],
    frame: (i64, i64, i64, i64),
) -> Result<()> {
    let (x, y, cx, cy) = (
        frame.0.to_string(),
        frame.1.to_string(),
        frame.2.to_string(),
        frame.3.to_string(),
    );
    xml.start("p:sp", &[])?;
    xml.start("p:nvSpPr", &[])?;
    xml.empty("p:cNvPr", &[("id", id), ("name", name)])?;
    xml.start("p:cNvSpPr", &[])?;
    xml.empty("a:spLocks", &[("noGrp", "1")])?;
    xml.end("p:cNvSpPr")?;
    xml.start("p:nvPr", &[])?;
    xml.empty("p:ph", ph_attrs)?;
    xml.end("p:nvPr")?;
    xml.end("p:nvSpPr")?;
    xml.start("p:spPr", &[])?;
    xml.start("a:xfrm", &[])?;
    xml.empty("a:off", &[("x", x.as_str()), ("y", y.as_str())])?;
    xml.empty("a:ext", &[("cx", cx.as_str()), ("cy", cy.as_str())])?;
    xml.end("a:xfrm")?;
    xml.end("p:spPr")?;
    Ok(())
}

/// One level-0 paragraph holding a single run.
fn paragraph(xml: &mut XmlBuilder, text: &str, size: &str, typeface: Option<&str>) -> Result<()> {
    xml.start("a:p", &[])?;
    xml.empty("a:pPr", &[("lvl", "0")])?;
    xml.start("a:r", &[])?;
    let run_attrs = [("lang", "en-US"), ("sz", size), ("dirty", "0")];
    match typeface {
        Some(face) => {
            xml.start("a:rPr", &run_attrs)?;
            xml.empty("a:latin", &[("typeface", face)])?;
            xml.end("a:rPr")?;
        }
        None => xml.empty("a:rPr", &run_attrs)?,
    }
    xml.element("a:t", text)?;
    xml.end("a:r")?;
    xml.end("a:p")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DeckReader;
    use std::io::{Cursor, Read};
    use zip::ZipArchive;

    fn write_deck(sections: &[SlideSection], config: SlideConfig) -> Vec<u8> {
        DeckWriter::new(config)
            .with_title("KT4-Presentation-Material")
            .write(sections, Cursor::new(Vec::new()))
            .unwrap()
            .into_inner()
    }

    fn read_part(bytes: &[u8], path: &str) -> String {
        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut file = archive.by_name(path).unwrap();
        let mut content = String::new();
        file.read_to_string(&mut content).unwrap();
        content
    }

    #[test]
    fn test_drawing_size() {
        assert_eq!(drawing_size(30.0), "3000");
        assert_eq!(drawing_size(20.0), "2000");
        assert_eq!(drawing_size(10.5), "1050");
    }

    #[test]
    fn test_slide_rel_ids_follow_master_and_theme() {
        assert_eq!(slide_rel_id(1), "rId3");
        assert_eq!(slide_rel_id(10), "rId12");
    }

    #[test]
    fn test_package_contains_required_parts() {
        let sections = vec![
            SlideSection::new("One", vec!["a".into()]),
            SlideSection::new("Two", vec!["b".into()]),
        ];
        let bytes = write_deck(&sections, SlideConfig::default());
        let archive = ZipArchive::new(Cursor::new(bytes.as_slice())).unwrap();
        let names: Vec<&str> = archive.file_names().collect();

        for part in [
            "[Content_Types].xml",
            "_rels/.rels",
            "docProps/core.xml",
            "ppt/presentation.xml",
            "ppt/_rels/presentation.xml.rels",
            SLIDE_MASTER_PATH,
            SLIDE_LAYOUT_PATH,
            THEME_PATH,
            "ppt/slides/slide1.xml",
            "ppt/slides/slide2.xml",
            "ppt/slides/_rels/slide2.xml.rels",
        ] {
            assert!(names.contains(&part), "missing {}", part);
        }

        let content_types = read_part(&bytes, "[Content_Types].xml");
        assert!(content_types.contains("/ppt/slides/slide2.xml"));
        assert!(!content_types.contains("/ppt/slides/slide3.xml"));
    }

    #[test]
    fn test_title_and_fonts_in_slide_xml() {
        let sections = vec![SlideSection::new("Plan & Goals", vec!["Ship <v1>".into()])];
        let bytes = write_deck(&sections, SlideConfig::default());
        let slide = read_part(&bytes, "ppt/slides/slide1.xml");

        assert!(slide.contains("<a:t>Plan &amp; Goals</a:t>"));
        assert!(slide.contains("<a:t>Ship &lt;v1&gt;</a:t>"));
        assert!(slide.contains(r#"sz="3000""#));
        assert!(slide.contains(r#"sz="2000""#));
        assert!(slide.contains(r#"<a:latin typeface="Calibri"/>"#));
        assert!(slide.contains(r#"<p:ph type="title"/>"#));

        let core = read_part(&bytes, "docProps/core.xml");
        assert!(core.contains("<dc:title>KT4-Presentation-Material</dc:title>"));
    }

    #[test]
    fn test_bullets_truncated_to_first_eight() {
        let bullets: Vec<String> = (1..=10).map(|i| format!("item {}", i)).collect();
        let sections = vec![SlideSection::new("Many", bullets.clone())];
        let bytes = write_deck(&sections, SlideConfig::default());

        let outline = DeckReader::new().read(Cursor::new(bytes)).unwrap();
        assert_eq!(outline.len(), 1);
        assert_eq!(outline[0].title, "Many");
        assert_eq!(outline[0].bullets, bullets[..8].to_vec());
    }

    #[test]
    fn test_custom_bullet_cap() {
        let sections = vec![SlideSection::new("S", vec!["a".into(), "b".into(), "c".into()])];
        let bytes = write_deck(&sections, SlideConfig::new().with_max_bullets(2));
        let outline = DeckReader::new().read(Cursor::new(bytes)).unwrap();
        assert_eq!(outline[0].bullets, vec!["a", "b"]);
    }

    #[test]
    fn test_empty_deck() {
        let bytes = write_deck(&[], SlideConfig::default());
        let presentation = read_part(&bytes, "ppt/presentation.xml");
        assert!(!presentation.contains("sldIdLst"));
        let outline = DeckReader::new().read(Cursor::new(bytes)).unwrap();
        assert!(outline.is_empty());
    }
}
