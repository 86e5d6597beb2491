//! Headless text flow oracle
//!
//! Approximates what a browser's multi-column layout does with the reader
//! markup: a title block, one block per paragraph with bottom spacing and
//! `break-inside: avoid`, and a trailing end-of-book block, filled column by
//! column (`column-fill: auto`). Line breaking is greedy over whitespace with
//! wide glyphs (Hangul, CJK, fullwidth forms) at a full em and everything else
//! at a fraction of it.

use super::flow::{FlowRequest, LayoutOracle};

/// Spacing below each paragraph
const PARAGRAPH_SPACING: f64 = 24.0;

/// First-line indent of a paragraph
const PARAGRAPH_INDENT: f64 = 4.0;

/// Title line box: 24px text at 32px line height
const TITLE_LINE_BOX: f64 = 32.0;
const TITLE_FONT_SIZE: f64 = 24.0;

/// Title margin, rule, and rule margin
const TITLE_DECORATION: f64 = 16.0 + 4.0;
const TITLE_SPACING: f64 = 48.0;

/// End-of-book block height relative to the column height
const END_BLOCK_FRACTION: f64 = 0.3;

/// Glyph advances as fractions of the font size
#[derive(Debug, Clone, Copy)]
struct GlyphMetrics {
    narrow: f64,
    wide: f64,
    space: f64,
}

impl Default for GlyphMetrics {
    fn default() -> Self {
        Self {
            narrow: 0.55,
            wide: 1.0,
            space: 0.3,
        }
    }
}

impl GlyphMetrics {
    fn advance(&self, ch: char, font_size: f64) -> f64 {
        if is_wide(ch) {
            self.wide * font_size
        } else {
            self.narrow * font_size
        }
    }
}

fn is_wide(ch: char) -> bool {
    matches!(ch as u32,
        0x1100..=0x11FF
        | 0x2E80..=0x303F
        | 0x3040..=0x30FF
        | 0x3130..=0x318F
        | 0x3400..=0x4DBF
        | 0x4E00..=0x9FFF
        | 0xAC00..=0xD7A3
        | 0xF900..=0xFAFF
        | 0xFF00..=0xFF60
        | 0xFFE0..=0xFFE6)
}

/// Greedy line breaker state
struct LineBreaker {
    max_width: f64,
    line_width: f64,
    lines: u32,
}

impl LineBreaker {
    fn new(max_width: f64, first_line_offset: f64) -> Self {
        Self {
            max_width,
            line_width: first_line_offset,
            lines: 1,
        }
    }

    fn push_word(&mut self, glyphs: &[f64], space: f64) {
        let word_width: f64 = glyphs.iter().sum();
        let needs_space = self.line_width > 0.0;
        let lead = if needs_space { space } else { 0.0 };

        if self.line_width + lead + word_width <= self.max_width {
            self.line_width += lead + word_width;
            return;
        }

        if needs_space && word_width <= self.max_width {
            self.lines += 1;
            self.line_width = word_width;
            return;
        }

        // Word longer than a line: break between glyphs
        if needs_space {
            self.line_width += lead;
        }
        for &glyph in glyphs {
            if self.line_width + glyph > self.max_width && self.line_width > 0.0 {
                self.lines += 1;
                self.line_width = 0.0;
            }
            self.line_width += glyph;
        }
    }
}

/// Lays out reader content without a rendering engine
#[derive(Debug, Clone, Default)]
pub struct TextFlowOracle {
    metrics: GlyphMetrics,
}

impl TextFlowOracle {
    /// Number of lines `text` takes at `max_width`
    pub fn line_count(&self, text: &str, font_size: f64, max_width: f64, indent: f64) -> u32 {
        let mut breaker = LineBreaker::new(max_width, indent);
        let space = self.metrics.space * font_size;
        let mut glyphs = Vec::new();

        for word in text.split_whitespace() {
            glyphs.clear();
            glyphs.extend(word.chars().map(|ch| self.metrics.advance(ch, font_size)));
            breaker.push_word(&glyphs, space);
        }
        breaker.lines
    }

    /// Count the columns the request's content fills
    pub fn column_count(&self, request: &FlowRequest<'_>) -> u32 {
        let width = f64::from(request.column_width);
        let height = f64::from(request.column_height);
        let font_size = f64::from(request.typography.font_size());
        let line_box = request.typography.line_box();

        let mut columns = ColumnFill::new(height);

        let title_lines = self.line_count(request.title, TITLE_FONT_SIZE, width, 0.0);
        columns.place(
            f64::from(title_lines) * TITLE_LINE_BOX + TITLE_DECORATION,
            TITLE_SPACING,
        );

        for paragraph in request.paragraphs {
            let lines = self.line_count(paragraph, font_size, width, PARAGRAPH_INDENT);
            columns.place(f64::from(lines) * line_box, PARAGRAPH_SPACING);
        }

        columns.place(height * END_BLOCK_FRACTION, 0.0);
        columns.count
    }
}

/// Sequential column filling with unbreakable blocks
struct ColumnFill {
    height: f64,
    used: f64,
    count: u32,
}

impl ColumnFill {
    fn new(height: f64) -> Self {
        Self {
            height,
            used: 0.0,
            count: 1,
        }
    }

    fn place(&mut self, block: f64, spacing: f64) {
        if self.used > 0.0 && self.used + block > self.height {
            self.count += 1;
            self.used = 0.0;
        }

        // Blocks taller than a column are fragmented anyway
        self.used += block;
        while self.used > self.height {
            self.count += 1;
            self.used -= self.height;
        }

        // Margins are truncated at column breaks
        self.used = (self.used + spacing).min(self.height);
    }
}

impl LayoutOracle for TextFlowOracle {
    fn rendered_extent(&mut self, request: &FlowRequest<'_>) -> Option<f64> {
        if request.column_width == 0 || request.column_height == 0 {
            return None;
        }

        let columns = self.column_count(request);
        let gap = f64::from(request.gap);

        // Under a forced container the renderer fits as many columns as it can
        // and stretches them to fill the width; overflow continues at that width.
        let used_width = match request.container_width {
            Some(container) => {
                let container = f64::from(container);
                let pitch = f64::from(request.column_width) + gap;
                let fitted = ((container + gap) / pitch).floor().max(1.0);
                (container - (fitted - 1.0) * gap) / fitted
            }
            None => f64::from(request.column_width),
        };

        let columns = f64::from(columns);
        Some(columns * used_width + (columns - 1.0) * gap)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::flow::{estimate_column_count, pinned_width};
    use crate::reader::typography::Typography;

    fn request<'a>(paragraphs: &'a [String], width: u32, height: u32) -> FlowRequest<'a> {
        FlowRequest {
            title: "Title",
            paragraphs,
            typography: Typography::default(),
            column_width: width,
            column_height: height,
            gap: 40,
            container_width: None,
        }
    }

    #[test]
    fn test_line_count_wraps_words() {
        let oracle = TextFlowOracle::default();
        // 20px font: narrow glyph 11px, space 6px
        assert_eq!(oracle.line_count("abc", 20.0, 100.0, 0.0), 1);
        // "abcd efgh" = 44 + 6 + 44 = 94 fits in 100
        assert_eq!(oracle.line_count("abcd efgh", 20.0, 100.0, 0.0), 1);
        assert_eq!(oracle.line_count("abcd efgh ijkl", 20.0, 100.0, 0.0), 2);
    }

    #[test]
    fn test_line_count_wide_glyphs() {
        let oracle = TextFlowOracle::default();
        // Five Hangul syllables at 20px each exactly fill 100px
        assert_eq!(oracle.line_count("가나다라마", 20.0, 100.0, 0.0), 1);
        assert_eq!(oracle.line_count("가나다라마바", 20.0, 100.0, 0.0), 2);
    }

    #[test]
    fn test_long_word_breaks_between_glyphs() {
        let oracle = TextFlowOracle::default();
        let word = "가".repeat(25);
        assert_eq!(oracle.line_count(&word, 20.0, 100.0, 0.0), 5);
    }

    #[test]
    fn test_empty_paragraph_takes_one_line() {
        let oracle = TextFlowOracle::default();
        assert_eq!(oracle.line_count("", 20.0, 100.0, 0.0), 1);
    }

    #[test]
    fn test_more_text_more_columns() {
        let mut oracle = TextFlowOracle::default();
        let short: Vec<String> = vec!["짧은 문단입니다.".to_string()];
        let long: Vec<String> = (0..200)
            .map(|i| format!("{}번째 문단은 조금 더 긴 문장으로 이루어져 있습니다.", i))
            .collect();

        let short_extent = oracle.rendered_extent(&request(&short, 400, 600)).unwrap();
        let long_extent = oracle.rendered_extent(&request(&long, 400, 600)).unwrap();

        assert_eq!(short_extent, 400.0);
        assert!(long_extent > short_extent);
        let columns = estimate_column_count(long_extent, 400, 40);
        assert_eq!(long_extent, f64::from(pinned_width(columns, 400, 40).unwrap()));
    }

    #[test]
    fn test_pinned_container_preserves_column_width() {
        let mut oracle = TextFlowOracle::default();
        let paragraphs: Vec<String> = (0..50).map(|i| format!("paragraph {}", i)).collect();

        let free = oracle.rendered_extent(&request(&paragraphs, 480, 500)).unwrap();
        let columns = estimate_column_count(free, 480, 40);

        let mut pinned = request(&paragraphs, 480, 500);
        pinned.container_width = pinned_width(columns, 480, 40);
        let forced = oracle.rendered_extent(&pinned).unwrap();
        assert_eq!(free, forced);
    }

    #[test]
    fn test_degenerate_request_is_not_settled() {
        let mut oracle = TextFlowOracle::default();
        let paragraphs = vec!["text".to_string()];
        assert!(oracle.rendered_extent(&request(&paragraphs, 0, 500)).is_none());
        assert!(oracle.rendered_extent(&request(&paragraphs, 400, 0)).is_none());
    }
}
