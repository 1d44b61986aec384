//! Greedy word wrapping against measured widths.

use crate::{FontHandle, TextMeasure};

/// Pack the words of `text` into as few lines as fit within `max_width`.
///
/// Always returns at least one segment; empty input yields `[""]` so blank
/// spacing survives. Words are never broken: a word wider than `max_width`
/// occupies a segment of its own and overflows.
pub fn wrap(
    text: &str,
    measure: &dyn TextMeasure,
    font: &FontHandle,
    size: f32,
    max_width: f32,
) -> Vec<String> {
    let mut words = text.split_whitespace();
    let Some(first) = words.next() else {
        return vec![String::new()];
    };

    let mut lines = Vec::new();
    let mut current = first.to_string();

    for word in words {
        let candidate = format!("{} {}", current, word);
        if measure.text_width(font, &candidate, size) <= max_width {
            current = candidate;
        } else {
            lines.push(std::mem::replace(&mut current, word.to_string()));
        }
    }
    lines.push(current);

    for line in &lines {
        if !line.contains(' ') && measure.text_width(font, line, size) > max_width {
            log::debug!("Word overflows column ({} pt): {}", max_width, line);
        }
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FixedAdvance;

    /// 1 pt per character at size 1.
    fn unit() -> FixedAdvance {
        FixedAdvance::new(1.0)
    }

    fn wrap_unit(text: &str, max_width: f32) -> Vec<String> {
        wrap(text, &unit(), &FontHandle::regular(), 1.0, max_width)
    }

    #[test]
    fn test_empty_input_yields_single_empty_segment() {
        assert_eq!(wrap_unit("", 10.0), vec![""]);
        assert_eq!(wrap_unit("   ", 10.0), vec![""]);
    }

    #[test]
    fn test_fits_on_one_line() {
        assert_eq!(wrap_unit("one two three", 20.0), vec!["one two three"]);
    }

    #[test]
    fn test_exact_fit_is_kept() {
        // "aaa bbb" is exactly 7 wide
        assert_eq!(wrap_unit("aaa bbb", 7.0), vec!["aaa bbb"]);
        assert_eq!(wrap_unit("aaa bbb", 6.9), vec!["aaa", "bbb"]);
    }

    #[test]
    fn test_greedy_packing() {
        assert_eq!(
            wrap_unit("the quick brown fox jumps", 10.0),
            vec!["the quick", "brown fox", "jumps"]
        );
    }

    #[test]
    fn test_oversized_word_gets_own_segment() {
        assert_eq!(
            wrap_unit("a extraordinarily b", 5.0),
            vec!["a", "extraordinarily", "b"]
        );
    }

    #[test]
    fn test_internal_whitespace_normalized() {
        assert_eq!(wrap_unit("a   b\tc", 20.0), vec!["a b c"]);
    }

    #[test]
    fn test_segments_fit_and_preserve_words() {
        let text = "Lorem ipsum dolor sit amet consectetur adipiscing elit sed do \
                    eiusmod tempor incididunt ut labore et dolore magna aliqua";
        let widest = text.split_whitespace().map(|w| w.len()).max().unwrap() as f32;
        let measure = unit();
        let font = FontHandle::regular();

        for max_width in [widest, widest + 3.0, 20.0, 37.5, 80.0, 500.0] {
            let segments = wrap(text, &measure, &font, 1.0, max_width);
            for segment in &segments {
                assert!(measure.text_width(&font, segment, 1.0) <= max_width);
            }
            let rejoined = segments.join(" ");
            let original: Vec<&str> = text.split_whitespace().collect();
            assert_eq!(rejoined.split(' ').collect::<Vec<_>>(), original);
        }
    }

    #[test]
    fn test_only_single_words_exceed_width() {
        let text = "ab abcdefghij cd ef abcdefghijkl g";
        let measure = unit();
        let font = FontHandle::regular();
        for max_width in [1.0, 3.0, 5.0, 8.0] {
            for segment in wrap(text, &measure, &font, 1.0, max_width) {
                if measure.text_width(&font, &segment, 1.0) > max_width {
                    assert!(!segment.contains(' '), "multi-word overflow: {}", segment);
                }
            }
        }
    }

    #[test]
    fn test_font_and_size_affect_wrapping() {
        let measure = FixedAdvance::new(0.5).with_bold(1.0);
        let text = "abcd efgh";
        // regular at size 2: 9 chars * 1.0 = 9
        assert_eq!(
            wrap(text, &measure, &FontHandle::regular(), 2.0, 9.0),
            vec!["abcd efgh"]
        );
        // bold at size 2: 9 chars * 2.0 = 18
        assert_eq!(
            wrap(text, &measure, &FontHandle::bold(), 2.0, 9.0),
            vec!["abcd", "efgh"]
        );
    }
}
