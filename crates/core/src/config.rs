//! Page geometry, typography, and slide constants.

/// A4 width in points.
pub const A4_WIDTH: f32 = 595.2756;

/// A4 height in points.
pub const A4_HEIGHT: f32 = 841.8898;

/// Page geometry and per-kind typography for the PDF layout engine.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutConfig {
    pub page_width: f32,
    pub page_height: f32,
    pub margin_left: f32,
    pub margin_right: f32,
    pub margin_top: f32,
    pub margin_bottom: f32,
    pub heading_size: f32,
    pub heading_line_height: f32,
    pub body_size: f32,
    pub body_line_height: f32,
    /// Vertical advance for blank lines.
    pub blank_line_height: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            page_width: A4_WIDTH,
            page_height: A4_HEIGHT,
            margin_left: 40.0,
            margin_right: 40.0,
            margin_top: 50.0,
            margin_bottom: 45.0,
            heading_size: 13.0,
            heading_line_height: 18.0,
            body_size: 11.0,
            body_line_height: 15.0,
            blank_line_height: 8.0,
        }
    }
}

impl LayoutConfig {
    /// Create a config with the default A4 geometry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the page size in points.
    pub fn with_page_size(mut self, width: f32, height: f32) -> Self {
        self.page_width = width;
        self.page_height = height;
        self
    }

    /// Set all four margins (left, right, top, bottom).
    pub fn with_margins(mut self, left: f32, right: f32, top: f32, bottom: f32) -> Self {
        self.margin_left = left;
        self.margin_right = right;
        self.margin_top = top;
        self.margin_bottom = bottom;
        self
    }

    /// Set heading font size and line height.
    pub fn with_heading(mut self, size: f32, line_height: f32) -> Self {
        self.heading_size = size;
        self.heading_line_height = line_height;
        self
    }

    /// Set body font size and line height.
    pub fn with_body(mut self, size: f32, line_height: f32) -> Self {
        self.body_size = size;
        self.body_line_height = line_height;
        self
    }

    /// Width available for text between the side margins.
    pub fn max_width(&self) -> f32 {
        self.page_width - self.margin_left - self.margin_right
    }

    /// Cursor position at the top of a fresh page.
    pub fn top_y(&self) -> f32 {
        self.page_height - self.margin_top
    }
}

/// Constants used when turning slide sections into a deck.
#[derive(Debug, Clone, PartialEq)]
pub struct SlideConfig {
    /// Bullets kept per slide; the rest are dropped.
    pub max_bullets: usize,
    pub title_size: f32,
    pub bullet_size: f32,
    pub bullet_font: String,
    /// Title for bullets that appear before any `## ` heading.
    pub default_title: String,
}

impl Default for SlideConfig {
    fn default() -> Self {
        Self {
            max_bullets: 8,
            title_size: 30.0,
            bullet_size: 20.0,
            bullet_font: "Calibri".to_string(),
            default_title: "Overview".to_string(),
        }
    }
}

impl SlideConfig {
    /// Create a config with the default deck constants.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the per-slide bullet cap.
    pub fn with_max_bullets(mut self, max: usize) -> Self {
        self.max_bullets = max;
        self
    }

    /// Set the title used before the first section heading.
    pub fn with_default_title(mut self, title: impl Into<String>) -> Self {
        self.default_title = title.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_layout_geometry() {
        let config = LayoutConfig::default();
        assert!((config.max_width() - (A4_WIDTH - 80.0)).abs() < 1e-3);
        assert!((config.top_y() - (A4_HEIGHT - 50.0)).abs() < 1e-3);
        assert_eq!(config.blank_line_height, 8.0);
    }

    #[test]
    fn test_layout_builders() {
        let config = LayoutConfig::new()
            .with_page_size(200.0, 100.0)
            .with_margins(10.0, 20.0, 5.0, 5.0)
            .with_body(10.0, 12.0);
        assert_eq!(config.max_width(), 170.0);
        assert_eq!(config.top_y(), 95.0);
        assert_eq!(config.body_line_height, 12.0);
    }

    #[test]
    fn test_slide_defaults() {
        let config = SlideConfig::default();
        assert_eq!(config.max_bullets, 8);
        assert_eq!(config.default_title, "Overview");
        assert_eq!(SlideConfig::new().with_max_bullets(3).max_bullets, 3);
    }
}
