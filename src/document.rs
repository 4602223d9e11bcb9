use crate::canvas::{Canvas, Frame, ImageRef, RectStyle, TextAlign, TextStyle};
use crate::colour::Colour;
use crate::error::GenerationError;
use crate::font::{width_of_text, StandardFont};
use crate::image::Image;
use crate::info::Info;
use crate::page::{ImageLayout, Page, PageContents, SpanLayout};
use crate::pagesize::PageSize;
use crate::rect::Rect;
use crate::refs::{ObjectReferences, RefType};
use crate::units::{Mm, Pt};
use id_arena::{Arena, Id};
use pdf_writer::{Finish, Name, Pdf, Ref};
use std::collections::HashMap;
use std::io::Write;

/// A [Canvas] that builds a PDF document in memory, then renders it out with
/// a call to [PdfDocument::write].
///
/// Every page has the same size. Text is set in the standard Helvetica fonts
/// with WinAnsi encoding; images are embedded once no matter how many times
/// they are drawn.
pub struct PdfDocument {
    pub info: Option<Info>,
    page_size: PageSize,
    /// Line height as a multiple of the font size, used to place the baseline
    /// within a line box
    line_height_factor: f32,
    pages: Arena<Page>,
    page_order: Vec<Id<Page>>,
    images: Arena<Image>,
    image_keys: HashMap<String, Id<Image>>,
}

impl PdfDocument {
    /// A document with one empty page of the given size
    pub fn new(page_size: PageSize) -> PdfDocument {
        let mut document = PdfDocument {
            info: None,
            page_size,
            line_height_factor: 1.15,
            pages: Arena::new(),
            page_order: Vec::new(),
            images: Arena::new(),
            image_keys: HashMap::new(),
        };
        document.add_page();
        document
    }

    /// Match the baseline placement to a measurer's line spacing
    pub fn with_line_height_factor(mut self, factor: f32) -> Self {
        self.line_height_factor = factor;
        self
    }

    /// Sets information about the document. If not provided, no information block will be
    /// written to the PDF
    pub fn set_info(&mut self, info: Info) {
        self.info = Some(info);
    }

    pub fn page_count(&self) -> usize {
        self.page_order.len()
    }

    fn add_page(&mut self) -> Id<Page> {
        let id = self.pages.alloc(Page::new(Rect::page(self.page_size)));
        self.page_order.push(id);
        id
    }

    fn current_page(&mut self) -> Result<&mut Page, GenerationError> {
        let id = *self
            .page_order
            .last()
            .ok_or_else(|| GenerationError::Configuration("document has no pages".into()))?;
        self.pages
            .get_mut(id)
            .ok_or_else(|| GenerationError::Configuration("page missing from document".into()))
    }

    fn point(&self, x: Mm, y: Mm) -> (Pt, Pt) {
        (x.into(), (self.page_size.1 - y).into())
    }

    /// Embed an image the first time its key is seen
    fn image_id(&mut self, image: &ImageRef) -> Result<Id<Image>, GenerationError> {
        if let Some(id) = self.image_keys.get(&image.key) {
            return Ok(*id);
        }
        let id = self.images.alloc(Image::from_bytes(&image.bytes)?);
        log::debug!("embedded image '{}'", image.key);
        self.image_keys.insert(image.key.clone(), id);
        Ok(id)
    }

    /// Write the entire document to the writer. The document is rendered in
    /// memory first, then written out in one go.
    pub fn write<W: Write>(self, mut w: W) -> Result<(), GenerationError> {
        let bytes = self.to_bytes()?;
        w.write_all(bytes.as_slice()).map_err(Into::into)
    }

    /// Render the document to PDF bytes
    pub fn to_bytes(self) -> Result<Vec<u8>, GenerationError> {
        let PdfDocument {
            info,
            pages,
            page_order,
            images,
            ..
        } = self;

        let mut refs = ObjectReferences::new();
        let catalog_id = refs.gen(RefType::Catalog);
        let page_tree_id = refs.gen(RefType::PageTree);

        let mut writer = Pdf::new();
        if let Some(info) = info {
            info.write(&mut refs, &mut writer);
        }

        let page_refs: Vec<Ref> = (0..page_order.len())
            .map(|i| refs.gen(RefType::Page(i)))
            .collect();
        writer
            .pages(page_tree_id)
            .count(page_refs.len() as i32)
            .kids(page_refs);

        for (i, font) in StandardFont::ALL.iter().enumerate() {
            writer
                .type1_font(refs.gen(RefType::Font(i)))
                .base_font(Name(font.base_font().as_bytes()))
                .encoding_predefined(Name(b"WinAnsiEncoding"));
        }

        for (id, image) in images.iter() {
            image.write(&mut refs, id.index(), &mut writer);
        }

        for (page_index, id) in page_order.iter().enumerate() {
            let page = pages.get(*id).ok_or_else(|| {
                GenerationError::Configuration(format!("page {} missing", page_index + 1))
            })?;
            page.write(&mut refs, page_index, &mut writer)?;
        }

        let mut catalog = writer.catalog(catalog_id);
        catalog.pages(page_tree_id);
        catalog.finish();

        Ok(writer.finish())
    }
}

impl Canvas for PdfDocument {
    fn new_page(&mut self) -> Result<(), GenerationError> {
        self.add_page();
        Ok(())
    }

    fn current_page_number(&self) -> usize {
        self.page_order.len()
    }

    fn draw_rect(&mut self, frame: Frame, style: RectStyle) -> Result<(), GenerationError> {
        let rect = Rect::from_frame(frame, self.page_size.1);
        let (fill, stroke) = match style {
            RectStyle::Fill(fill) => (Some(fill), None),
            RectStyle::Stroke(stroke) => (None, Some(stroke)),
            RectStyle::FillStroke { fill, stroke } => (Some(fill), Some(stroke)),
        };
        self.current_page()?
            .push(PageContents::Rect { rect, fill, stroke });
        Ok(())
    }

    fn draw_line(
        &mut self,
        from: (Mm, Mm),
        to: (Mm, Mm),
        colour: Colour,
        width: Mm,
    ) -> Result<(), GenerationError> {
        let from = self.point(from.0, from.1);
        let to = self.point(to.0, to.1);
        self.current_page()?.push(PageContents::Line {
            from,
            to,
            colour,
            width: width.into(),
        });
        Ok(())
    }

    fn draw_text(
        &mut self,
        text: &str,
        x: Mm,
        y: Mm,
        style: &TextStyle,
    ) -> Result<(), GenerationError> {
        if text.is_empty() {
            return Ok(());
        }
        let font = style.font();
        let width: Mm = width_of_text(text, font, style.size).into();
        let x = match style.align {
            TextAlign::Left => x,
            TextAlign::Center => x - width / 2.0,
            TextAlign::Right => x - width,
        };

        // centre the glyph box within the line box
        let glyphs = font.ascent(style.size) - font.descent(style.size);
        let leading = style.size * self.line_height_factor - glyphs;
        let baseline: Mm = (leading / 2.0 + font.ascent(style.size)).into();
        let coords = self.point(x, y + baseline);

        self.current_page()?.push(PageContents::Text(SpanLayout {
            text: text.to_string(),
            font,
            size: style.size,
            colour: style.colour,
            coords,
        }));
        Ok(())
    }

    fn draw_image(&mut self, image: &ImageRef, frame: Frame) -> Result<(), GenerationError> {
        let id = self.image_id(image)?;
        let position = Rect::from_frame(frame, self.page_size.1);
        self.current_page()?.push(PageContents::Image(ImageLayout {
            image_index: id.index(),
            position,
        }));
        Ok(())
    }
}
