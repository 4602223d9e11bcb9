use crate::canvas::TextStyle;
use crate::error::GenerationError;
use crate::font::width_of_text;
use crate::units::{Mm, Pt};

/// Tabs are expanded to this many spaces before wrapping
const TABSIZE: usize = 4;

/// Measures and wraps text. The layout engine never looks at glyphs itself:
/// every height it computes comes from a measurer.
pub trait TextMeasurer {
    /// Split text into the lines it occupies when set no wider than `max_width`.
    /// Always returns at least one line, even for empty text.
    fn wrap(
        &self,
        text: &str,
        max_width: Mm,
        style: &TextStyle,
    ) -> Result<Vec<String>, GenerationError>;

    /// The distance between the tops of two consecutive lines
    fn line_height(&self, style: &TextStyle) -> Mm;

    /// The height of a whole paragraph once wrapped to `max_width`
    fn measure_paragraph_height(
        &self,
        text: &str,
        max_width: Mm,
        style: &TextStyle,
    ) -> Result<Mm, GenerationError> {
        let lines = self.wrap(text, max_width, style)?;
        Ok(self.line_height(style) * lines.len() as f64)
    }
}

impl<M: TextMeasurer + ?Sized> TextMeasurer for &M {
    fn wrap(
        &self,
        text: &str,
        max_width: Mm,
        style: &TextStyle,
    ) -> Result<Vec<String>, GenerationError> {
        (**self).wrap(text, max_width, style)
    }

    fn line_height(&self, style: &TextStyle) -> Mm {
        (**self).line_height(style)
    }

    fn measure_paragraph_height(
        &self,
        text: &str,
        max_width: Mm,
        style: &TextStyle,
    ) -> Result<Mm, GenerationError> {
        (**self).measure_paragraph_height(text, max_width, style)
    }
}

/// Wraps text at word boundaries using the given per-character advance.
///
/// Explicit newlines always start a new line, and runs of whitespace collapse
/// to a single space. A word wider than the line is broken between characters
/// so text never overflows; every line holds at least one character, which
/// guarantees progress even when `max_width` is zero.
pub fn wrap_with<F>(text: &str, max_width: Mm, advance: F) -> Vec<String>
where
    F: Fn(char) -> Mm,
{
    let text = text
        .replace('\t', &" ".repeat(TABSIZE))
        .replace("\r\n", "\n")
        .replace('\r', "\n");

    let measure = |s: &str| -> Mm { s.chars().map(&advance).sum() };
    let space = advance(' ');

    let mut lines: Vec<String> = Vec::new();
    for paragraph in text.split('\n') {
        let mut line = String::new();
        let mut line_width = Mm::ZERO;

        for word in paragraph.split_whitespace() {
            let word_width = measure(word);

            if !line.is_empty() {
                if line_width + space + word_width <= max_width {
                    line.push(' ');
                    line.push_str(word);
                    line_width += space + word_width;
                    continue;
                }
                lines.push(std::mem::take(&mut line));
                line_width = Mm::ZERO;
            }

            if word_width <= max_width {
                line.push_str(word);
                line_width = word_width;
                continue;
            }

            // no break point inside the word: force character breaks
            for ch in word.chars() {
                let w = advance(ch);
                if !line.is_empty() && line_width + w > max_width {
                    lines.push(std::mem::take(&mut line));
                    line_width = Mm::ZERO;
                }
                line.push(ch);
                line_width += w;
            }
        }

        lines.push(line);
    }

    lines
}

fn check_width(max_width: Mm) -> Result<Mm, GenerationError> {
    if max_width.0.is_nan() {
        return Err(GenerationError::Measurement(
            "cannot wrap text to an undefined width".into(),
        ));
    }
    Ok(max_width.max(Mm::ZERO))
}

fn check_size(style: &TextStyle) -> Result<Pt, GenerationError> {
    if !(style.size.0.is_finite() && style.size.0 > 0.0) {
        return Err(GenerationError::Measurement(format!(
            "font size {} cannot be measured",
            style.size
        )));
    }
    Ok(style.size)
}

/// Measures text with the metrics of the PDF standard Helvetica fonts, matching
/// what [PdfDocument](crate::PdfDocument) draws
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct StandardFontMeasurer {
    /// Line height as a multiple of the font size
    pub line_height_factor: f32,
}

impl Default for StandardFontMeasurer {
    fn default() -> Self {
        StandardFontMeasurer {
            line_height_factor: 1.15,
        }
    }
}

impl StandardFontMeasurer {
    pub fn new() -> StandardFontMeasurer {
        StandardFontMeasurer::default()
    }

    /// The rendered width of a single line of text
    pub fn width_of(&self, text: &str, style: &TextStyle) -> Mm {
        width_of_text(text, style.font(), style.size).into()
    }
}

impl TextMeasurer for StandardFontMeasurer {
    fn wrap(
        &self,
        text: &str,
        max_width: Mm,
        style: &TextStyle,
    ) -> Result<Vec<String>, GenerationError> {
        let max_width = check_width(max_width)?;
        let size = check_size(style)?;
        let font = style.font();
        Ok(wrap_with(text, max_width, |ch| {
            Pt(size.0 * font.advance(ch) as f32 / 1000.0).into()
        }))
    }

    fn line_height(&self, style: &TextStyle) -> Mm {
        (style.size * self.line_height_factor).into()
    }
}

/// Measures every character with the same advance and every line with the
/// same height, regardless of style. Layout results become easy to predict,
/// which makes it the measurer of choice for tests and previews.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct MonospaceMeasurer {
    pub advance: Mm,
    pub line_height: Mm,
}

impl MonospaceMeasurer {
    pub fn new(advance: Mm, line_height: Mm) -> MonospaceMeasurer {
        MonospaceMeasurer {
            advance,
            line_height,
        }
    }
}

impl TextMeasurer for MonospaceMeasurer {
    fn wrap(
        &self,
        text: &str,
        max_width: Mm,
        _style: &TextStyle,
    ) -> Result<Vec<String>, GenerationError> {
        let max_width = check_width(max_width)?;
        Ok(wrap_with(text, max_width, |_| self.advance))
    }

    fn line_height(&self, _style: &TextStyle) -> Mm {
        self.line_height
    }
}
