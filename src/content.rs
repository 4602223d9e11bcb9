//! Page content stream rendering.

use crate::colour::Colour;
use crate::font::encode_win_ansi;
use crate::page::{PageContents, SpanLayout};
use crate::rect::Rect;
use miniz_oxide::deflate::{compress_to_vec_zlib, CompressionLevel};
use std::io::Write;

/// Renders page contents to a PDF content stream.
#[allow(clippy::write_with_newline)]
pub(crate) fn render_contents(contents: &[PageContents]) -> Result<Vec<u8>, std::io::Error> {
    let mut content: Vec<u8> = Vec::default();

    for page_content in contents.iter() {
        match page_content {
            PageContents::Text(span) => render_text_span(&mut content, span)?,
            PageContents::Rect { rect, fill, stroke } => {
                write!(&mut content, "q\n")?;
                if let Some(fill) = fill {
                    write_colour(&mut content, *fill, false)?;
                }
                if let Some(stroke) = stroke {
                    write_colour(&mut content, *stroke, true)?;
                    write!(&mut content, "0.5 w\n")?;
                }
                write_rect(&mut content, rect)?;
                let op = match (fill.is_some(), stroke.is_some()) {
                    (true, true) => "B",
                    (true, false) => "f",
                    (false, true) => "S",
                    (false, false) => "n",
                };
                write!(&mut content, "{op}\nQ\n")?;
            }
            PageContents::Line {
                from,
                to,
                colour,
                width,
            } => {
                write!(&mut content, "q\n")?;
                write_colour(&mut content, *colour, true)?;
                write!(&mut content, "{} w\n", width.0)?;
                write!(&mut content, "{} {} m\n", from.0 .0, from.1 .0)?;
                write!(&mut content, "{} {} l\n", to.0 .0, to.1 .0)?;
                write!(&mut content, "S\nQ\n")?;
            }
            PageContents::Image(image) => {
                write!(&mut content, "q\n")?;
                write!(
                    &mut content,
                    "{} 0 0 {} {} {} cm\n",
                    image.position.width().0,
                    image.position.height().0,
                    image.position.x1.0,
                    image.position.y1.0
                )?;
                write!(&mut content, "/I{} Do\n", image.image_index)?;
                write!(&mut content, "Q\n")?;
            }
        }
    }

    Ok(content)
}

#[allow(clippy::write_with_newline)]
fn render_text_span(content: &mut Vec<u8>, span: &SpanLayout) -> Result<(), std::io::Error> {
    write!(content, "q\n")?;
    write_colour(content, span.colour, false)?;
    write!(content, "BT\n")?;
    write!(content, "/{} {} Tf\n", span.font.resource_name(), span.size.0)?;
    write!(content, "{} {} Td\n", span.coords.0 .0, span.coords.1 .0)?;
    write!(content, "<")?;
    for byte in encode_win_ansi(&span.text) {
        write!(content, "{byte:02x}")?;
    }
    write!(content, "> Tj\n")?;
    write!(content, "ET\n")?;
    write!(content, "Q\n")?;
    Ok(())
}

#[allow(clippy::write_with_newline)]
fn write_rect(content: &mut Vec<u8>, rect: &Rect) -> Result<(), std::io::Error> {
    write!(
        content,
        "{} {} {} {} re\n",
        rect.x1.0,
        rect.y1.0,
        rect.width().0,
        rect.height().0
    )
}

#[allow(clippy::write_with_newline)]
fn write_colour(content: &mut Vec<u8>, colour: Colour, stroke: bool) -> Result<(), std::io::Error> {
    match (colour, stroke) {
        (Colour::RGB { r, g, b }, false) => write!(content, "{r} {g} {b} rg\n"),
        (Colour::RGB { r, g, b }, true) => write!(content, "{r} {g} {b} RG\n"),
        (Colour::Grey { g }, false) => write!(content, "{g} g\n"),
        (Colour::Grey { g }, true) => write!(content, "{g} G\n"),
    }
}

/// Deflate a content stream for embedding with the FlateDecode filter
pub(crate) fn compress(content: &[u8]) -> Vec<u8> {
    compress_to_vec_zlib(content, CompressionLevel::DefaultLevel as u8)
}
