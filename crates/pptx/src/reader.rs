//! Reads slide titles and bullets back out of a PPTX deck.

use mdpress_core::{Error, Result, SlideSection};
use quick_xml::events::Event;
use quick_xml::Reader;
use std::io::{Read, Seek};
use zip::ZipArchive;

/// Extracts a [`SlideSection`] outline from each slide of a deck.
pub struct DeckReader;

impl DeckReader {
    /// Create a new deck reader.
    pub fn new() -> Self {
        Self
    }

    /// Read every slide in presentation order.
    pub fn read<R: Read + Seek>(&self, reader: R) -> Result<Vec<SlideSection>> {
        let mut archive = ZipArchive::new(reader)
            .map_err(|e| Error::ZipError(format!("Failed to open ZIP: {}", e)))?;

        let slide_order = self.get_slide_order(&mut archive)?;

        let mut sections = Vec::with_capacity(slide_order.len());
        for slide_path in &slide_order {
            let content = self.read_file_from_archive(&mut archive, slide_path)?;
            sections.push(self.parse_slide(&content)?);
        }

        log::debug!("Read {} slides", sections.len());
        Ok(sections)
    }

    /// Get the ordered list of slide paths from the presentation relationships.
    fn get_slide_order<R: Read + Seek>(&self, archive: &mut ZipArchive<R>) -> Result<Vec<String>> {
        let rels_content = self.read_file_from_archive(archive, "ppt/_rels/presentation.xml.rels")?;
        let mut slides: Vec<(String, Option<usize>)> = Vec::new();

        let mut reader = Reader::from_str(&rels_content);
        reader.trim_text(true);

        loop {
            match reader.read_event() {
                Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e))
                    if e.name().as_ref() == b"Relationship" =>
                {
                    let mut rel_type = String::new();
                    let mut target = String::new();
                    let mut id = String::new();

                    for attr in e.attributes().flatten() {
                        let value = String::from_utf8_lossy(&attr.value).to_string();
                        match attr.key.as_ref() {
                            b"Type" => rel_type = value,
                            b"Target" => target = value,
                            b"Id" => id = value,
                            _ => {}
                        }
                    }

                    if rel_type.ends_with("/slide") {
                        let order_num =
                            extract_slide_number(&target).or_else(|| extract_slide_number(&id));
                        let full_path = match target.strip_prefix('/') {
                            Some(absolute) => absolute.to_string(),
                            None => format!("ppt/{}", target),
                        };
                        slides.push((full_path, order_num));
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(Error::XmlError(format!(
                        "Error parsing relationships: {}",
                        e
                    )));
                }
                _ => {}
            }
        }

        slides.sort_by(|a, b| match (a.1, b.1) {
            (Some(na), Some(nb)) => na.cmp(&nb),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => a.0.cmp(&b.0),
        });

        Ok(slides.into_iter().map(|(path, _)| path).collect())
    }

    /// Split one slide's shapes into the title placeholder and body paragraphs.
    fn parse_slide(&self, xml_content: &str) -> Result<SlideSection> {
        let mut reader = Reader::from_str(xml_content);
        reader.trim_text(true);

        let mut title = String::new();
        let mut bullets = Vec::new();

        let mut in_shape = false;
        let mut is_title = false;
        let mut paragraphs: Vec<String> = Vec::new();
        let mut current = String::new();
        let mut in_paragraph = false;

        loop {
            match reader.read_event() {
                Ok(Event::Start(ref e)) => match local_name(e.name().as_ref()) {
                    b"sp" => {
                        in_shape = true;
                        is_title = false;
                        paragraphs.clear();
                    }
                    b"p" if in_shape => {
                        in_paragraph = true;
                        current.clear();
                    }
                    _ => {}
                },
                Ok(Event::Empty(ref e)) => {
                    if in_shape && local_name(e.name().as_ref()) == b"ph" {
                        is_title = e.attributes().flatten().any(|attr| {
                            attr.key.as_ref() == b"type"
                                && matches!(attr.value.as_ref(), b"title" | b"ctrTitle")
                        });
                    }
                }
                Ok(Event::Text(ref e)) => {
                    if in_paragraph {
                        let text = e
                            .unescape()
                            .map_err(|err| Error::XmlError(err.to_string()))?;
                        current.push_str(&text);
                    }
                }
                Ok(Event::End(ref e)) => match local_name(e.name().as_ref()) {
                    b"p" if in_paragraph => {
                        in_paragraph = false;
                        if !current.trim().is_empty() {
                            paragraphs.push(current.trim().to_string());
                        }
                    }
                    b"sp" => {
                        in_shape = false;
                        if is_title {
                            title = paragraphs.join(" ");
                        } else {
                            bullets.append(&mut paragraphs);
                        }
                        paragraphs.clear();
                    }
                    _ => {}
                },
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(Error::XmlError(format!("Error parsing slide: {}", e)));
                }
                _ => {}
            }
        }

        Ok(SlideSection::new(title, bullets))
    }

    /// Read a file from the ZIP archive.
    fn read_file_from_archive<R: Read + Seek>(
        &self,
        archive: &mut ZipArchive<R>,
        path: &str,
    ) -> Result<String> {
        let mut file = archive
            .by_name(path)
            .map_err(|e| Error::ZipError(format!("File not found in archive '{}': {}", path, e)))?;

        let mut content = String::new();
        file.read_to_string(&mut content)
            .map_err(|e| Error::ZipError(format!("Failed to read '{}': {}", path, e)))?;

        Ok(content)
    }
}

impl Default for DeckReader {
    fn default() -> Self {
        Self::new()
    }
}

/// Extract the local name from a potentially namespaced XML element name.
fn local_name(name: &[u8]) -> &[u8] {
    if let Some(pos) = name.iter().position(|&b| b == b':') {
        &name[pos + 1..]
    } else {
        name
    }
}

/// Extract a slide number from a string like "slide3.xml" or "rId2".
fn extract_slide_number(s: &str) -> Option<usize> {
    let s = s.trim_end_matches(".xml").trim_end_matches(".rels");

    let digits: String = s.chars().rev().take_while(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    let digits: String = digits.chars().rev().collect();
    digits.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_slide_number() {
        assert_eq!(extract_slide_number("rId1"), Some(1));
        assert_eq!(extract_slide_number("rId12"), Some(12));
        assert_eq!(extract_slide_number("slides/slide1.xml"), Some(1));
        assert_eq!(extract_slide_number("slide123.xml"), Some(123));
        assert_eq!(extract_slide_number("nodigits"), None);
    }

    #[test]
    fn test_local_name() {
        assert_eq!(local_name(b"p:sp"), b"sp");
        assert_eq!(local_name(b"a:t"), b"t");
        assert_eq!(local_name(b"sp"), b"sp");
    }

    #[test]
    fn test_parse_slide_splits_title_and_body() {
        let xml = r#"<p:sld xmlns:a="a" xmlns:p="p"><p:cSld><p:spTree>
            <p:sp><p:nvSpPr><p:nvPr><p:ph type="title"/></p:nvPr></p:nvSpPr>
              <p:txBody><a:p><a:r><a:t>Goals &amp; Scope</a:t></a:r></a:p></p:txBody></p:sp>
            <p:sp><p:nvSpPr><p:nvPr><p:ph idx="1"/></p:nvPr></p:nvSpPr>
              <p:txBody><a:p><a:r><a:t>First</a:t></a:r></a:p><a:p/>
              <a:p><a:r><a:t>Sec</a:t></a:r><a:r><a:t>ond</a:t></a:r></a:p></p:txBody></p:sp>
        </p:spTree></p:cSld></p:sld>"#;

        let section = DeckReader::new().parse_slide(xml).unwrap();
        assert_eq!(section.title, "Goals & Scope");
        assert_eq!(section.bullets, vec!["First", "Second"]);
    }

    #[test]
    fn test_not_a_zip() {
        let result = DeckReader::new().read(std::io::Cursor::new(b"plain text".to_vec()));
        assert!(matches!(result, Err(Error::ZipError(_))));
    }
}
