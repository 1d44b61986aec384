//! Page layout: typography per line kind, bullet hanging indent, pagination.

use crate::wrap::wrap;
use crate::{
    ClassifiedLine, DrawCall, FontHandle, LaidOutDocument, LayoutConfig, Page, TextMeasure,
};
use regex::Regex;
use std::sync::LazyLock;

/// Optional indent, a `-` or `*` marker, whitespace, then content.
static BULLET_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\s*[-*]\s+)(.+)$").unwrap());

/// Vertical cursor and page buffer for a single render.
///
/// Owned by one [`layout`] call and never shared.
#[derive(Debug)]
pub struct LayoutSession<'a> {
    config: &'a LayoutConfig,
    y: f32,
    current: Page,
    finished: Vec<Page>,
}

impl<'a> LayoutSession<'a> {
    /// Start a session with one empty page and the cursor at the top margin.
    pub fn new(config: &'a LayoutConfig) -> Self {
        Self {
            config,
            y: config.top_y(),
            current: Page::new(),
            finished: Vec::new(),
        }
    }

    /// Current cursor position (baseline of the next segment).
    pub fn y_position(&self) -> f32 {
        self.y
    }

    /// Pages finished so far plus the open one.
    pub fn page_count(&self) -> usize {
        self.finished.len() + 1
    }

    /// Move the cursor down without drawing or checking for a page break.
    pub fn advance_blank(&mut self) {
        self.y -= self.config.blank_line_height;
    }

    /// Draw one segment at the left margin, breaking the page first if the
    /// segment would cross the bottom margin.
    pub fn draw_segment(&mut self, text: String, font: &FontHandle, size: f32, line_height: f32) {
        if self.y - line_height < self.config.margin_bottom {
            self.break_page();
        }
        self.current.draws.push(DrawCall {
            x: self.config.margin_left,
            y: self.y,
            text,
            font: font.clone(),
            size,
        });
        self.y -= line_height;
    }

    fn break_page(&mut self) {
        let page = std::mem::take(&mut self.current);
        self.finished.push(page);
        self.y = self.config.top_y();
    }

    /// Close the open page and return the document.
    pub fn finish(mut self) -> LaidOutDocument {
        self.finished.push(self.current);
        LaidOutDocument {
            page_width: self.config.page_width,
            page_height: self.config.page_height,
            pages: self.finished,
        }
    }
}

/// Lay out classified lines onto pages.
pub fn layout(
    lines: &[ClassifiedLine],
    config: &LayoutConfig,
    measure: &dyn TextMeasure,
) -> LaidOutDocument {
    let mut session = LayoutSession::new(config);
    let regular = FontHandle::regular();
    let bold = FontHandle::bold();
    let max_width = config.max_width();

    for line in lines {
        let (font, size, line_height) = match line {
            ClassifiedLine::Heading(_) => (&bold, config.heading_size, config.heading_line_height),
            ClassifiedLine::Blank | ClassifiedLine::Body(_) => {
                (&regular, config.body_size, config.body_line_height)
            }
        };

        // Blank lines, and headings or table rows that reduced to nothing.
        let text = match line.text() {
            Some(text) if !text.is_empty() => text,
            _ => {
                session.advance_blank();
                continue;
            }
        };

        if let Some(caps) = BULLET_REGEX.captures(text) {
            let prefix = &caps[1];
            let body = &caps[2];
            let prefix_width = measure.text_width(font, prefix, size);
            let segments = wrap(body, measure, font, size, max_width - prefix_width);
            // Hanging indent approximated with one space per prefix character.
            let indent = " ".repeat(prefix.chars().count());
            for (index, segment) in segments.into_iter().enumerate() {
                let lead = if index == 0 { prefix } else { indent.as_str() };
                session.draw_segment(format!("{}{}", lead, segment), font, size, line_height);
            }
            continue;
        }

        for segment in wrap(text, measure, font, size, max_width) {
            session.draw_segment(segment, font, size, line_height);
        }
    }

    let document = session.finish();
    log::debug!(
        "Laid out {} lines onto {} pages",
        lines.len(),
        document.page_count()
    );
    document
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{classify, FixedAdvance};

    /// 100pt tall page with 10pt margins; 1pt per character at size 1.
    fn small_config() -> LayoutConfig {
        LayoutConfig::new()
            .with_page_size(100.0, 100.0)
            .with_margins(10.0, 10.0, 10.0, 10.0)
            .with_heading(1.0, 20.0)
            .with_body(1.0, 10.0)
    }

    fn unit() -> FixedAdvance {
        FixedAdvance::new(1.0)
    }

    fn body(text: &str) -> ClassifiedLine {
        ClassifiedLine::Body(text.to_string())
    }

    #[test]
    fn test_empty_document_has_one_page() {
        let doc = layout(&[], &small_config(), &unit());
        assert_eq!(doc.page_count(), 1);
        assert!(doc.pages[0].is_empty());
    }

    #[test]
    fn test_heading_and_body_typography() {
        let config = LayoutConfig::default();
        let lines = classify("# Title\nBody text");
        let doc = layout(&lines, &config, &FixedAdvance::default());
        let draws: Vec<_> = doc.all_draws().collect();

        assert_eq!(draws.len(), 2);
        assert_eq!(draws[0].text, "Title");
        assert_eq!(draws[0].font, FontHandle::bold());
        assert_eq!(draws[0].size, 13.0);
        assert_eq!(draws[0].x, 40.0);
        assert_eq!(draws[0].y, config.top_y());

        assert_eq!(draws[1].text, "Body text");
        assert_eq!(draws[1].font, FontHandle::regular());
        assert_eq!(draws[1].size, 11.0);
        assert_eq!(draws[1].y, config.top_y() - 18.0);
    }

    #[test]
    fn test_blank_line_advances_cursor_only() {
        let config = small_config();
        let lines = vec![body("a"), ClassifiedLine::Blank, body("b")];
        let doc = layout(&lines, &config, &unit());
        let draws: Vec<_> = doc.all_draws().collect();

        assert_eq!(draws.len(), 2);
        assert_eq!(draws[0].y, 90.0);
        assert_eq!(draws[1].y, 90.0 - 10.0 - 8.0);
    }

    #[test]
    fn test_empty_heading_spaces_like_blank() {
        let config = small_config();
        let lines = vec![ClassifiedLine::Heading(String::new()), body("a")];
        let doc = layout(&lines, &config, &unit());
        let draws: Vec<_> = doc.all_draws().collect();
        assert_eq!(draws.len(), 1);
        assert_eq!(draws[0].y, 82.0);
    }

    #[test]
    fn test_blank_lines_never_break_pages() {
        let config = small_config();
        let lines = vec![ClassifiedLine::Blank; 50];
        let doc = layout(&lines, &config, &unit());
        assert_eq!(doc.page_count(), 1);
    }

    #[test]
    fn test_pagination_resets_cursor() {
        let config = small_config();
        // Cursor: 90, 80, ..., 20 fits 8 lines (20 - 10 = 10 is not below 10).
        let lines: Vec<_> = (0..9).map(|i| body(&format!("l{}", i))).collect();
        let doc = layout(&lines, &config, &unit());

        assert_eq!(doc.page_count(), 2);
        assert_eq!(doc.pages[0].draws.len(), 8);
        assert_eq!(doc.pages[0].draws[7].y, 20.0);
        assert_eq!(doc.pages[1].draws.len(), 1);
        assert_eq!(doc.pages[1].draws[0].text, "l8");
        assert_eq!(doc.pages[1].draws[0].y, 90.0);
    }

    #[test]
    fn test_long_line_spans_page_boundary() {
        let config = small_config();
        // Max width 80 holds two 30-char words per segment.
        let mut lines: Vec<_> = (0..7).map(|_| body("x")).collect();
        let word = "w".repeat(30);
        lines.push(body(&[word.as_str(); 4].join(" ")));
        let doc = layout(&lines, &config, &unit());

        assert_eq!(doc.page_count(), 2);
        // 7 short lines plus the first wrapped segment fill page one.
        assert_eq!(doc.pages[0].draws.len(), 8);
        assert_eq!(doc.pages[1].draws.len(), 1);
    }

    #[test]
    fn test_bullet_hanging_indent() {
        let config = LayoutConfig::new()
            .with_page_size(30.0, 200.0)
            .with_margins(0.0, 0.0, 10.0, 10.0)
            .with_body(1.0, 10.0);
        // Max width 30; prefix "- " is 2 wide, so content wraps at 28.
        let lines = vec![body(&format!("- {} {} {}", "a".repeat(12), "b".repeat(12), "c".repeat(5)))];
        let doc = layout(&lines, &config, &unit());
        let texts: Vec<_> = doc.all_draws().map(|d| d.text.as_str()).collect();

        assert_eq!(
            texts,
            vec![
                format!("- {} {}", "a".repeat(12), "b".repeat(12)),
                format!("  {}", "c".repeat(5)),
            ]
        );
    }

    #[test]
    fn test_indented_star_bullet_prefix_preserved() {
        let config = LayoutConfig::new()
            .with_page_size(20.0, 200.0)
            .with_margins(0.0, 0.0, 10.0, 10.0)
            .with_body(1.0, 10.0);
        let lines = vec![body("  *   alpha beta gamma")];
        let doc = layout(&lines, &config, &unit());
        let texts: Vec<_> = doc.all_draws().map(|d| d.text.as_str()).collect();

        // Prefix "  *   " is 6 wide, leaving 14 for content.
        assert_eq!(texts, vec!["  *   alpha beta", "      gamma"]);
    }

    #[test]
    fn test_heading_bullet_uses_bold() {
        let lines = classify("# - Key point");
        let doc = layout(&lines, &small_config(), &unit());
        let draw = doc.all_draws().next().unwrap();
        assert_eq!(draw.text, "- Key point");
        assert!(draw.font.is_bold);
    }

    #[test]
    fn test_dash_without_space_is_not_bullet() {
        let config = LayoutConfig::new()
            .with_page_size(12.0, 200.0)
            .with_margins(0.0, 0.0, 10.0, 10.0)
            .with_body(1.0, 10.0);
        let doc = layout(&[body("-dash word more")], &config, &unit());
        let texts: Vec<_> = doc.all_draws().map(|d| d.text.as_str()).collect();
        assert_eq!(texts, vec!["-dash word", "more"]);
    }

    #[test]
    fn test_page_count_monotonic() {
        let config = small_config();
        let measure = unit();
        let source: Vec<ClassifiedLine> = (0..60)
            .map(|i| match i % 5 {
                0 => ClassifiedLine::Heading(format!("Section {}", i)),
                1 => ClassifiedLine::Blank,
                2 => body("- a bullet with quite a few words that must wrap"),
                _ => body("plain words that wrap over the narrow column width"),
            })
            .collect();

        let mut previous = 0;
        for n in 0..=source.len() {
            let pages = layout(&source[..n], &config, &measure).page_count();
            assert!(pages >= previous, "page count dropped at {} lines", n);
            previous = pages;
        }
    }

    #[test]
    fn test_cursor_steps_by_line_height() {
        let config = small_config();
        let lines = vec![
            ClassifiedLine::Heading("h".into()),
            body("a"),
            body("b"),
            ClassifiedLine::Heading("h2".into()),
            body("c"),
            body("d"),
            body("e"),
        ];
        let doc = layout(&lines, &config, &unit());

        for page in &doc.pages {
            assert_eq!(page.draws[0].y, config.top_y());
            for pair in page.draws.windows(2) {
                let step = if pair[0].font.is_bold { 20.0 } else { 10.0 };
                assert_eq!(pair[0].y - pair[1].y, step);
            }
        }
        assert_eq!(doc.page_count(), 2);
    }

    #[test]
    fn test_session_cursor() {
        let config = small_config();
        let mut session = LayoutSession::new(&config);
        assert_eq!(session.y_position(), 90.0);
        session.draw_segment("x".into(), &FontHandle::regular(), 1.0, 10.0);
        assert_eq!(session.y_position(), 80.0);
        session.advance_blank();
        assert_eq!(session.y_position(), 72.0);
        assert_eq!(session.page_count(), 1);
    }
}
