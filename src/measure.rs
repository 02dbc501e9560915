use unicode_width::UnicodeWidthStr;

/// Text measurement approximation: every UTF-16 code unit of a label counts
/// as one `font_size` of horizontal space, and wide characters count as two.
/// No glyph metrics are consulted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextMetrics {
    pub font_size: f64,
    pub min_width: f64,
}

impl TextMetrics {
    pub fn new(font_size: f64, min_width: f64) -> Self {
        Self {
            font_size,
            min_width,
        }
    }

    /// UTF-16 length of `text`, or its display columns when wider.
    pub fn text_len(text: &str) -> usize {
        text.encode_utf16().count().max(UnicodeWidthStr::width(text))
    }

    pub fn text_width(&self, text: &str) -> f64 {
        Self::text_len(text) as f64 * self.font_size
    }

    /// Width a widget needs for `label`, never below the configured minimum.
    pub fn natural_width(&self, label: &str) -> f64 {
        self.text_width(label).max(self.min_width)
    }
}
