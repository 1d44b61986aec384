//! Domain types shared by the PDF and slide-deck pipelines.

use serde::{Deserialize, Serialize};

/// One physical markdown line after classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClassifiedLine {
    /// An empty or whitespace-only line; only contributes vertical space.
    Blank,
    /// A `#` heading with its marker stripped.
    Heading(String),
    /// Any other line, including flattened table rows.
    Body(String),
}

impl ClassifiedLine {
    /// The text to draw, or `None` for blank lines.
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Blank => None,
            Self::Heading(text) | Self::Body(text) => Some(text),
        }
    }
}

/// Reference into the renderer's registered font table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FontHandle {
    /// Logical name the font was registered under.
    pub name: String,

    /// Whether this is the bold face of the pair.
    pub is_bold: bool,
}

impl FontHandle {
    /// Logical name of the regular face.
    pub const REGULAR_NAME: &'static str = "DocRegular";

    /// Logical name of the bold face.
    pub const BOLD_NAME: &'static str = "DocBold";

    /// Handle for the regular face.
    pub fn regular() -> Self {
        Self {
            name: Self::REGULAR_NAME.to_string(),
            is_bold: false,
        }
    }

    /// Handle for the bold face.
    pub fn bold() -> Self {
        Self {
            name: Self::BOLD_NAME.to_string(),
            is_bold: true,
        }
    }
}

/// A single positioned string on a page.
///
/// `y` is the baseline in PDF user space (origin at the bottom-left corner).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawCall {
    pub x: f32,
    pub y: f32,
    pub text: String,
    pub font: FontHandle,
    pub size: f32,
}

/// Draw calls for one page, in drawing order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub draws: Vec<DrawCall>,
}

impl Page {
    /// Create an empty page.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether nothing was drawn on this page.
    pub fn is_empty(&self) -> bool {
        self.draws.is_empty()
    }
}

/// Output of the page layout engine. Always holds at least one page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaidOutDocument {
    /// Page width in points.
    pub page_width: f32,

    /// Page height in points.
    pub page_height: f32,

    /// Pages in order.
    pub pages: Vec<Page>,
}

impl LaidOutDocument {
    /// Number of pages.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// All draw calls across pages, flattened.
    pub fn all_draws(&self) -> impl Iterator<Item = &DrawCall> {
        self.pages.iter().flat_map(|p| p.draws.iter())
    }
}

/// A titled group of bullets destined for one slide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlideSection {
    /// Slide title.
    pub title: String,

    /// Bullet texts in document order.
    pub bullets: Vec<String>,
}

impl SlideSection {
    /// Create a new section.
    pub fn new(title: impl Into<String>, bullets: Vec<String>) -> Self {
        Self {
            title: title.into(),
            bullets,
        }
    }

    /// Bullets that survive the per-slide cap.
    pub fn visible_bullets(&self, max_bullets: usize) -> &[String] {
        &self.bullets[..self.bullets.len().min(max_bullets)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classified_line_text() {
        assert_eq!(ClassifiedLine::Blank.text(), None);
        assert_eq!(ClassifiedLine::Heading("A".into()).text(), Some("A"));
        assert_eq!(ClassifiedLine::Body("b".into()).text(), Some("b"));
    }

    #[test]
    fn test_font_handles() {
        assert_eq!(FontHandle::regular().name, "DocRegular");
        assert!(!FontHandle::regular().is_bold);
        assert_eq!(FontHandle::bold().name, "DocBold");
        assert!(FontHandle::bold().is_bold);
    }

    #[test]
    fn test_visible_bullets() {
        let bullets: Vec<String> = (1..=10).map(|i| format!("b{}", i)).collect();
        let section = SlideSection::new("S", bullets);
        let visible = section.visible_bullets(8);
        assert_eq!(visible.len(), 8);
        assert_eq!(visible[0], "b1");
        assert_eq!(visible[7], "b8");

        let short = SlideSection::new("S", vec!["x".to_string()]);
        assert_eq!(short.visible_bullets(8), &["x".to_string()]);
    }
}
