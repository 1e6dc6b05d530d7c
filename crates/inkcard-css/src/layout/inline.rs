//! Text measurement and greedy line breaking.
//!
//! [§ 9.4.2 Inline formatting contexts](https://www.w3.org/TR/CSS2/visuren.html#inline-formatting)

/// Font metrics interface for text measurement during layout.
///
/// [§ 10.8 Line height calculations](https://www.w3.org/TR/CSS2/visudet.html#line-height)
///
/// Implementors provide the advance width the layout engine uses for line
/// breaking and line box sizing. Painting positions glyphs independently,
/// so a measured line and its painted pixels may differ slightly.
pub trait FontMetrics {
    /// Measure the total advance width of `text` at `font_size` pixels.
    fn text_width(&self, text: &str, font_size: f64) -> f64;
}

/// Approximate font metrics using fixed per-character ratios.
///
/// Each ASCII character counts 1.7 units and any other character 3 units;
/// three units make one em at 72 DPI. The ratios suit a Latin sans-serif
/// mixed with full-width CJK glyphs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ApproximateFontMetrics {
    /// Output resolution; widths scale by `dpi / 72`.
    pub dpi: f64,
}

impl ApproximateFontMetrics {
    /// Units per ASCII character.
    pub const ASCII_UNITS: f64 = 1.7;
    /// Units per non-ASCII character.
    pub const WIDE_UNITS: f64 = 3.0;
    /// Units per em.
    pub const UNITS_PER_EM: f64 = 3.0;

    /// Metrics for the given output resolution.
    #[must_use]
    pub const fn new(dpi: f64) -> Self {
        Self { dpi }
    }

    fn char_units(ch: char) -> f64 {
        if ch.is_ascii() {
            Self::ASCII_UNITS
        } else {
            Self::WIDE_UNITS
        }
    }

    fn scale(&self, font_size: f64) -> f64 {
        font_size * (self.dpi / 72.0) / Self::UNITS_PER_EM
    }
}

impl Default for ApproximateFontMetrics {
    fn default() -> Self {
        Self::new(72.0)
    }
}

impl FontMetrics for ApproximateFontMetrics {
    fn text_width(&self, text: &str, font_size: f64) -> f64 {
        let units: f64 = text.chars().map(Self::char_units).sum();
        units * self.scale(font_size)
    }
}

/// [§ 5.1 Line Breaking](https://www.w3.org/TR/css-text-3/#line-breaking)
///
/// Split `text` into lines greedily, one character at a time.
///
/// A character is appended to the current line before the line is
/// measured, and the line is closed once its width exceeds the budget, so
/// every line ends with the character that overflowed it. The first line
/// is measured against `first_budget`, every later line against `budget`.
/// Lines are not broken at word boundaries and whitespace is kept as is;
/// concatenating the result yields `text` again.
pub fn wrap_text(
    text: &str,
    font_size: f64,
    metrics: &dyn FontMetrics,
    first_budget: f64,
    budget: f64,
) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();
    let mut width = 0.0;

    for ch in text.chars() {
        line.push(ch);
        let mut buf = [0u8; 4];
        width += metrics.text_width(ch.encode_utf8(&mut buf), font_size);

        let limit = if lines.is_empty() { first_budget } else { budget };
        if width > limit {
            lines.push(std::mem::take(&mut line));
            width = 0.0;
        }
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_approximate_width() {
        let m = ApproximateFontMetrics::default();
        // 3 units per em: an ASCII char at 30px is 17px wide.
        assert!((m.text_width("a", 30.0) - 17.0).abs() < 1e-9);
        assert!((m.text_width("中", 30.0) - 30.0).abs() < 1e-9);
        let hi_dpi = ApproximateFontMetrics::new(144.0);
        assert!((hi_dpi.text_width("a", 30.0) - 34.0).abs() < 1e-9);
    }

    #[test]
    fn test_wrap_includes_overflowing_char() {
        let m = ApproximateFontMetrics::default();
        // Each char is 1.7 * 10 / 3 = 5.666px wide.
        let lines = wrap_text("abcdef", 10.0, &m, 12.0, 12.0);
        assert_eq!(lines, vec!["abc", "def"]);
    }

    #[test]
    fn test_wrap_first_line_budget() {
        let m = ApproximateFontMetrics::default();
        let lines = wrap_text("abcdefg", 10.0, &m, 5.0, 100.0);
        assert_eq!(lines, vec!["a", "bcdefg"]);
    }

    #[test]
    fn test_wrap_empty() {
        let m = ApproximateFontMetrics::default();
        assert!(wrap_text("", 16.0, &m, 10.0, 10.0).is_empty());
    }
}
