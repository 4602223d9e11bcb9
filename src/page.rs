use crate::colour::Colour;
use crate::content::{compress, render_contents};
use crate::error::GenerationError;
use crate::font::StandardFont;
use crate::rect::Rect;
use crate::refs::{ObjectReferences, RefType};
use crate::units::Pt;
use pdf_writer::{Filter, Finish, Name, Pdf};

/// A single line of text, positioned by its baseline origin
#[derive(Clone, PartialEq, Debug)]
pub struct SpanLayout {
    pub text: String,
    pub font: StandardFont,
    pub size: Pt,
    pub colour: Colour,
    pub coords: (Pt, Pt),
}

#[derive(Clone, PartialEq, Debug)]
pub struct ImageLayout {
    /// Index of the image within the document
    pub image_index: usize,
    pub position: Rect,
}

/// Everything that can be painted on a page, in PDF space
#[derive(Clone, PartialEq, Debug)]
pub enum PageContents {
    Text(SpanLayout),
    Rect {
        rect: Rect,
        fill: Option<Colour>,
        stroke: Option<Colour>,
    },
    Line {
        from: (Pt, Pt),
        to: (Pt, Pt),
        colour: Colour,
        width: Pt,
    },
    Image(ImageLayout),
}

#[derive(Clone, Debug)]
pub struct Page {
    /// The size of the page
    pub media_box: Rect,
    /// Painted in order
    pub contents: Vec<PageContents>,
}

impl Page {
    pub fn new(media_box: Rect) -> Page {
        Page {
            media_box,
            contents: Vec::default(),
        }
    }

    pub fn push(&mut self, content: PageContents) {
        self.contents.push(content);
    }

    /// Indices of the images this page paints
    fn image_indices(&self) -> Vec<usize> {
        let mut indices: Vec<usize> = self
            .contents
            .iter()
            .filter_map(|c| match c {
                PageContents::Image(image) => Some(image.image_index),
                _ => None,
            })
            .collect();
        indices.sort_unstable();
        indices.dedup();
        indices
    }

    pub(crate) fn write(
        &self,
        refs: &mut ObjectReferences,
        page_index: usize,
        writer: &mut Pdf,
    ) -> Result<(), GenerationError> {
        let id = refs.gen(RefType::Page(page_index));
        let parent = refs.gen(RefType::PageTree);
        let content_id = refs.gen(RefType::ContentForPage(page_index));
        let images: Vec<_> = self
            .image_indices()
            .into_iter()
            .map(|i| (i, refs.gen(RefType::Image(i))))
            .collect();

        let mut page = writer.page(id);
        page.media_box(self.media_box.into());
        page.parent(parent);

        let mut resources = page.resources();
        let mut resource_fonts = resources.fonts();
        for (i, font) in StandardFont::ALL.iter().enumerate() {
            resource_fonts.pair(
                Name(font.resource_name().as_bytes()),
                refs.gen(RefType::Font(i)),
            );
        }
        resource_fonts.finish();
        let mut resource_xobjects = resources.x_objects();
        for (i, image_ref) in images {
            resource_xobjects.pair(Name(format!("I{i}").as_bytes()), image_ref);
        }
        resource_xobjects.finish();
        resources.finish();

        page.contents(content_id);
        page.finish();

        let rendered = compress(&render_contents(&self.contents)?);
        writer
            .stream(content_id, rendered.as_slice())
            .filter(Filter::FlateDecode);
        Ok(())
    }
}
