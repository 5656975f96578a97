#![forbid(unsafe_code)]

//! Text measurement and word wrapping for tooltip bodies.

use hovertip_core::geometry::Size;
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Display width of a single grapheme cluster.
pub fn grapheme_width(grapheme: &str) -> usize {
    if grapheme.is_ascii() {
        return grapheme
            .bytes()
            .filter(|b| (0x20..=0x7E).contains(b))
            .count();
    }
    grapheme.width()
}

/// Display width of `text` in terminal columns.
pub fn display_width(text: &str) -> usize {
    if text.is_ascii() {
        return grapheme_width(text);
    }
    text.graphemes(true).map(grapheme_width).sum()
}

/// Word-wrap `text` to lines at most `max_width` columns wide.
///
/// Paragraphs (split on `\n`) wrap independently and blank paragraphs are
/// kept as empty lines. Runs of whitespace collapse to one space. A single
/// word wider than `max_width` stays whole on its own line.
pub fn wrap_words(text: &str, max_width: usize) -> Vec<String> {
    if max_width == 0 {
        return Vec::new();
    }

    let mut lines = Vec::new();
    for paragraph in text.lines() {
        if paragraph.is_empty() {
            lines.push(String::new());
            continue;
        }

        let mut current = String::new();
        let mut current_width = 0usize;
        for word in paragraph.split_whitespace() {
            let word_width = display_width(word);
            if current_width == 0 {
                current = word.to_string();
                current_width = word_width;
            } else if current_width + 1 + word_width <= max_width {
                current.push(' ');
                current.push_str(word);
                current_width += 1 + word_width;
            } else {
                lines.push(std::mem::take(&mut current));
                current = word.to_string();
                current_width = word_width;
            }
        }
        if !current.is_empty() {
            lines.push(current);
        }
    }
    lines
}

/// Bounding size of already-wrapped lines.
pub fn block_size(lines: &[String]) -> Size {
    let width = lines
        .iter()
        .map(|line| display_width(line))
        .max()
        .unwrap_or(0);
    Size::new(
        width.min(u16::MAX as usize) as u16,
        lines.len().min(u16::MAX as usize) as u16,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_width_ascii() {
        assert_eq!(display_width(""), 0);
        assert_eq!(display_width("hello"), 5);
        assert_eq!(display_width("abc xyz"), 7);
    }

    #[test]
    fn display_width_skips_control_bytes() {
        assert_eq!(display_width("a\x01b"), 2);
        assert_eq!(display_width("\x7F"), 0);
    }

    #[test]
    fn display_width_cjk_is_double() {
        assert_eq!(display_width("你好"), 4);
    }

    #[test]
    fn display_width_combining_mark() {
        assert_eq!(display_width("e\u{0301}"), 1);
    }

    #[test]
    fn wrap_respects_max_width() {
        let lines = wrap_words("This is a long line that should wrap properly", 18);
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(display_width(line) <= 18, "line too wide: {line:?}");
        }
    }

    #[test]
    fn wrap_exact_fit() {
        assert_eq!(wrap_words("abcde fghij", 11), vec!["abcde fghij"]);
        assert_eq!(wrap_words("abcde fghij", 10), vec!["abcde", "fghij"]);
    }

    #[test]
    fn wrap_keeps_long_word_whole() {
        assert_eq!(
            wrap_words("Supercalifragilistic", 5),
            vec!["Supercalifragilistic"]
        );
    }

    #[test]
    fn wrap_paragraphs_and_blank_lines() {
        let lines = wrap_words("First paragraph\n\nSecond paragraph", 40);
        assert_eq!(lines, vec!["First paragraph", "", "Second paragraph"]);
    }

    #[test]
    fn wrap_collapses_whitespace() {
        assert_eq!(wrap_words("hello    world", 40), vec!["hello world"]);
        assert!(wrap_words("   ", 40).is_empty());
    }

    #[test]
    fn wrap_zero_width_is_empty() {
        assert!(wrap_words("anything", 0).is_empty());
    }

    #[test]
    fn block_size_measures_widest_line() {
        let lines = vec!["ab".to_string(), "abcd".to_string(), String::new()];
        assert_eq!(block_size(&lines), Size::new(4, 3));
        assert_eq!(block_size(&[]), Size::ZERO);
    }
}
