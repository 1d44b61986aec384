//! Grouping of markdown lines into titled slide sections.

use crate::{split_lines, SlideConfig, SlideSection};
use regex::Regex;
use std::sync::LazyLock;

/// `1. item`, `12. item`, ...
static NUMBERED_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+\.\s+(.*)$").unwrap());

/// Split a document into slide sections at `## ` headings.
///
/// `# ` lines are treated as the document title and skipped. Bullets are
/// collected uncapped; the deck writer applies the per-slide limit.
pub fn classify_slides(text: &str, config: &SlideConfig) -> Vec<SlideSection> {
    let mut sections = Vec::new();
    let mut title = config.default_title.clone();
    let mut bullets: Vec<String> = Vec::new();

    for raw in split_lines(text) {
        let line = raw.trim();
        if line.is_empty() || line.starts_with("# ") {
            continue;
        }

        if let Some(heading) = line.strip_prefix("## ") {
            let next_title = heading.trim().to_string();
            let previous = std::mem::replace(&mut title, next_title);
            if !bullets.is_empty() {
                sections.push(SlideSection::new(previous, std::mem::take(&mut bullets)));
            }
            continue;
        }

        if let Some(item) = line.strip_prefix("- ") {
            bullets.push(item.trim().to_string());
        } else if let Some(caps) = NUMBERED_REGEX.captures(line) {
            bullets.push(caps[1].trim().to_string());
        } else {
            bullets.push(line.to_string());
        }
    }

    if !bullets.is_empty() {
        sections.push(SlideSection::new(title, bullets));
    }

    log::debug!("Grouped document into {} slide sections", sections.len());
    sections
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slides(text: &str) -> Vec<SlideSection> {
        classify_slides(text, &SlideConfig::default())
    }

    #[test]
    fn test_sections_split_on_second_level_headings() {
        let result = slides("# Doc\n## S1\n- x\n- y\n## S2\n- z");
        assert_eq!(
            result,
            vec![
                SlideSection::new("S1", vec!["x".into(), "y".into()]),
                SlideSection::new("S2", vec!["z".into()]),
            ]
        );
    }

    #[test]
    fn test_default_title_before_first_heading() {
        let result = slides("- intro\n## Next\n- more");
        assert_eq!(result[0], SlideSection::new("Overview", vec!["intro".into()]));
        assert_eq!(result[1].title, "Next");
    }

    #[test]
    fn test_custom_default_title() {
        let config = SlideConfig::new().with_default_title("Agenda");
        let result = classify_slides("- a", &config);
        assert_eq!(result[0].title, "Agenda");
    }

    #[test]
    fn test_heading_without_bullets_produces_no_slide() {
        let result = slides("## Empty\n## Full\n- a\n## Trailing");
        assert_eq!(result, vec![SlideSection::new("Full", vec!["a".into()])]);
    }

    #[test]
    fn test_numbered_items_and_paragraphs() {
        let result = slides("## Steps\n1. First step\n10.   Tenth\nPlain paragraph text\n2.NoSpace");
        assert_eq!(
            result[0].bullets,
            vec!["First step", "Tenth", "Plain paragraph text", "2.NoSpace"]
        );
    }

    #[test]
    fn test_blank_lines_skipped_and_lines_trimmed() {
        let result = slides("\n  ## Spaced  \n\n   -   padded item  \n\n");
        assert_eq!(result, vec![SlideSection::new("Spaced", vec!["padded item".into()])]);
    }

    #[test]
    fn test_other_markers_fold_into_bullets() {
        let result = slides("## S\n* star\n### Third level\n#NoSpace");
        assert_eq!(result[0].bullets, vec!["* star", "### Third level", "#NoSpace"]);
    }

    #[test]
    fn test_bullets_not_capped_at_collection() {
        let text: String = std::iter::once("## Many".to_string())
            .chain((1..=10).map(|i| format!("- item {}", i)))
            .collect::<Vec<_>>()
            .join("\n");
        let result = slides(&text);
        assert_eq!(result[0].bullets.len(), 10);
    }

    #[test]
    fn test_carriage_return_line_endings() {
        let result = slides("## S1\r- x\r- y\r## S2\r\n- z");
        assert_eq!(
            result,
            vec![
                SlideSection::new("S1", vec!["x".into(), "y".into()]),
                SlideSection::new("S2", vec!["z".into()]),
            ]
        );
    }

    #[test]
    fn test_empty_document() {
        assert!(slides("").is_empty());
        assert!(slides("# Only a title\n\n").is_empty());
    }
}
