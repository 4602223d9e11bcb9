//! The drawing capability the layout engine renders through.
//!
//! A [Canvas] is deliberately small: rectangles, lines, text, images and page
//! creation. Coordinates are millimetres measured from the top-left corner
//! of the page, y growing downward. All layout decisions are made before the
//! canvas is called, so any backend that can draw these primitives can host
//! a document. [PdfDocument](crate::PdfDocument) writes a PDF;
//! [RecordingCanvas] keeps the commands for inspection.

use crate::colour::{colours, Colour};
use crate::error::GenerationError;
use crate::font::StandardFont;
use crate::units::{Mm, Pt};
use std::sync::Arc;

/// Horizontal text alignment relative to the x coordinate given to
/// [Canvas::draw_text]: `Left` starts at x, `Center` centres on x and `Right` ends at x
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub enum FontWeight {
    #[default]
    Regular,
    Bold,
}

/// How a run of text is set
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TextStyle {
    pub size: Pt,
    pub weight: FontWeight,
    pub align: TextAlign,
    pub colour: Colour,
}

impl TextStyle {
    pub fn new(size: Pt) -> TextStyle {
        TextStyle {
            size,
            weight: FontWeight::Regular,
            align: TextAlign::Left,
            colour: colours::BLACK,
        }
    }

    pub fn bold(mut self) -> TextStyle {
        self.weight = FontWeight::Bold;
        self
    }

    pub fn aligned(mut self, align: TextAlign) -> TextStyle {
        self.align = align;
        self
    }

    pub fn coloured(mut self, colour: Colour) -> TextStyle {
        self.colour = colour;
        self
    }

    /// The standard font this style is drawn with
    pub fn font(&self) -> StandardFont {
        match self.weight {
            FontWeight::Regular => StandardFont::Helvetica,
            FontWeight::Bold => StandardFont::HelveticaBold,
        }
    }
}

/// A rectangle on the page, anchored at its top-left corner
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct Frame {
    pub x: Mm,
    pub y: Mm,
    pub width: Mm,
    pub height: Mm,
}

impl Frame {
    pub fn new(x: Mm, y: Mm, width: Mm, height: Mm) -> Frame {
        Frame {
            x,
            y,
            width,
            height,
        }
    }

    pub fn bottom(&self) -> Mm {
        self.y + self.height
    }

    pub fn right(&self) -> Mm {
        self.x + self.width
    }
}

/// How a rectangle is painted
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum RectStyle {
    Fill(Colour),
    Stroke(Colour),
    FillStroke { fill: Colour, stroke: Colour },
}

/// An image handed to the canvas. The key identifies the image so a backend
/// can embed it once and reuse it on every page.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageRef {
    pub key: String,
    pub bytes: Arc<[u8]>,
}

impl ImageRef {
    pub fn new<S: ToString>(key: S, bytes: Vec<u8>) -> ImageRef {
        ImageRef {
            key: key.to_string(),
            bytes: bytes.into(),
        }
    }

    /// Load an image file, keyed by its path
    pub fn from_path<P: AsRef<std::path::Path>>(path: P) -> Result<ImageRef, GenerationError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;
        Ok(ImageRef::new(path.display(), bytes))
    }
}

/// The drawing primitives the layout engine needs. A new canvas starts with
/// one empty page.
pub trait Canvas {
    /// Start a new page; subsequent drawing lands on it
    fn new_page(&mut self) -> Result<(), GenerationError>;

    /// The 1-based number of the page currently being drawn on
    fn current_page_number(&self) -> usize;

    fn draw_rect(&mut self, frame: Frame, style: RectStyle) -> Result<(), GenerationError>;

    fn draw_line(
        &mut self,
        from: (Mm, Mm),
        to: (Mm, Mm),
        colour: Colour,
        width: Mm,
    ) -> Result<(), GenerationError>;

    /// Draw a single line of text. `y` is the top of the line box; the
    /// backend positions the baseline within it.
    fn draw_text(
        &mut self,
        text: &str,
        x: Mm,
        y: Mm,
        style: &TextStyle,
    ) -> Result<(), GenerationError>;

    fn draw_image(&mut self, image: &ImageRef, frame: Frame) -> Result<(), GenerationError>;
}

/// A drawing command captured by [RecordingCanvas]
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Rect {
        frame: Frame,
        style: RectStyle,
    },
    Line {
        from: (Mm, Mm),
        to: (Mm, Mm),
    },
    Text {
        text: String,
        x: Mm,
        y: Mm,
        style: TextStyle,
    },
    Image {
        key: String,
        frame: Frame,
    },
}

impl DrawOp {
    pub fn text(&self) -> Option<&str> {
        match self {
            DrawOp::Text { text, .. } => Some(text.as_str()),
            _ => None,
        }
    }
}

/// A canvas that records drawing commands page by page instead of rendering
/// them. Useful to inspect a layout without producing a PDF.
#[derive(Debug, Clone)]
pub struct RecordingCanvas {
    pub pages: Vec<Vec<DrawOp>>,
}

impl Default for RecordingCanvas {
    fn default() -> Self {
        RecordingCanvas {
            pages: vec![Vec::new()],
        }
    }
}

impl RecordingCanvas {
    pub fn new() -> RecordingCanvas {
        RecordingCanvas::default()
    }

    /// All text drawn on a page (0-based index), in drawing order
    pub fn texts_on_page(&self, page_index: usize) -> Vec<&str> {
        self.pages
            .get(page_index)
            .map(|ops| ops.iter().filter_map(DrawOp::text).collect())
            .unwrap_or_default()
    }

    fn push(&mut self, op: DrawOp) {
        if let Some(page) = self.pages.last_mut() {
            page.push(op);
        }
    }
}

impl Canvas for RecordingCanvas {
    fn new_page(&mut self) -> Result<(), GenerationError> {
        self.pages.push(Vec::new());
        Ok(())
    }

    fn current_page_number(&self) -> usize {
        self.pages.len()
    }

    fn draw_rect(&mut self, frame: Frame, style: RectStyle) -> Result<(), GenerationError> {
        self.push(DrawOp::Rect { frame, style });
        Ok(())
    }

    fn draw_line(
        &mut self,
        from: (Mm, Mm),
        to: (Mm, Mm),
        _colour: Colour,
        _width: Mm,
    ) -> Result<(), GenerationError> {
        self.push(DrawOp::Line { from, to });
        Ok(())
    }

    fn draw_text(
        &mut self,
        text: &str,
        x: Mm,
        y: Mm,
        style: &TextStyle,
    ) -> Result<(), GenerationError> {
        self.push(DrawOp::Text {
            text: text.to_string(),
            x,
            y,
            style: *style,
        });
        Ok(())
    }

    fn draw_image(&mut self, image: &ImageRef, frame: Frame) -> Result<(), GenerationError> {
        self.push(DrawOp::Image {
            key: image.key.clone(),
            frame,
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_per_page() {
        let mut canvas = RecordingCanvas::new();
        assert_eq!(canvas.current_page_number(), 1);

        let style = TextStyle::new(Pt(9.0));
        canvas.draw_text("first", Mm(10.0), Mm(10.0), &style).unwrap();
        canvas.new_page().unwrap();
        canvas.draw_text("second", Mm(10.0), Mm(10.0), &style).unwrap();

        assert_eq!(canvas.current_page_number(), 2);
        assert_eq!(canvas.texts_on_page(0), vec!["first"]);
        assert_eq!(canvas.texts_on_page(1), vec!["second"]);
        assert!(canvas.texts_on_page(2).is_empty());
    }

    #[test]
    fn style_builder_picks_font() {
        let style = TextStyle::new(Pt(9.0)).bold().aligned(TextAlign::Right);
        assert_eq!(style.font(), StandardFont::HelveticaBold);
        assert_eq!(style.align, TextAlign::Right);
    }
}
