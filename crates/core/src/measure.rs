//! Text measurement seam between the layout engine and font backends.

use crate::FontHandle;

/// Measures rendered string widths in points.
pub trait TextMeasure {
    /// Width of `text` drawn with `font` at `size` points.
    fn text_width(&self, font: &FontHandle, text: &str, size: f32) -> f32;
}

/// Every character advances by a fixed fraction of the em.
///
/// Bold faces can be given a wider advance. Useful wherever real font files
/// are unavailable, such as tests and dry-run previews.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedAdvance {
    regular_em: f32,
    bold_em: f32,
}

impl FixedAdvance {
    /// Same advance for both faces.
    pub fn new(em_fraction: f32) -> Self {
        Self {
            regular_em: em_fraction,
            bold_em: em_fraction,
        }
    }

    /// Use a different advance for the bold face.
    pub fn with_bold(mut self, em_fraction: f32) -> Self {
        self.bold_em = em_fraction;
        self
    }
}

impl Default for FixedAdvance {
    fn default() -> Self {
        Self::new(0.5)
    }
}

impl TextMeasure for FixedAdvance {
    fn text_width(&self, font: &FontHandle, text: &str, size: f32) -> f32 {
        let em = if font.is_bold {
            self.bold_em
        } else {
            self.regular_em
        };
        text.chars().count() as f32 * em * size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_advance_width() {
        let measure = FixedAdvance::new(0.5).with_bold(0.6);
        assert_eq!(measure.text_width(&FontHandle::regular(), "abcd", 10.0), 20.0);
        assert_eq!(measure.text_width(&FontHandle::bold(), "abcd", 10.0), 24.0);
        assert_eq!(measure.text_width(&FontHandle::regular(), "", 10.0), 0.0);
    }

    #[test]
    fn test_fixed_advance_counts_chars_not_bytes() {
        let measure = FixedAdvance::new(1.0);
        assert_eq!(measure.text_width(&FontHandle::regular(), "план", 1.0), 4.0);
    }
}
