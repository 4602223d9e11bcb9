//! Page flow: tracking the vertical cursor and breaking pages.
//!
//! Before any atomic block is drawn, its height is handed to
//! [PageFlow::ensure_space]. The decision itself is [decide], a pure function
//! of the cursor, the page geometry and the block height. When a break is
//! needed the flow stamps the footer of the finished page, asks the canvas
//! for a new page and, for table rows only, redraws the table header.

use super::margins::Margins;
use crate::canvas::Canvas;
use crate::error::GenerationError;
use crate::pagesize::PageSize;
use crate::units::Mm;
use chrono::{DateTime, Local};

/// The fixed geometry of every page of a document
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PageGeometry {
    pub page_size: PageSize,
    pub margins: Margins,
    /// Height of the band above the bottom margin reserved for the footer
    pub footer_height: Mm,
}

impl PageGeometry {
    pub fn new(page_size: PageSize, margins: Margins, footer_height: Mm) -> PageGeometry {
        PageGeometry {
            page_size,
            margins,
            footer_height,
        }
    }

    pub fn width(&self) -> Mm {
        self.page_size.0
    }

    pub fn height(&self) -> Mm {
        self.page_size.1
    }

    /// Page width minus the left and right margins, to hundredths of a millimetre
    pub fn content_width(&self) -> Mm {
        (self.width() - self.margins.horizontal()).round2()
    }

    /// Where content starts on every page
    pub fn content_top(&self) -> Mm {
        self.margins.top
    }

    /// The lowest y content may reach before the footer band
    pub fn content_bottom(&self) -> Mm {
        self.height() - self.margins.bottom - self.footer_height
    }

    /// Top edge of the footer band
    pub fn footer_top(&self) -> Mm {
        self.content_bottom()
    }

    pub fn usable_height(&self) -> Mm {
        self.content_bottom() - self.content_top()
    }

    pub fn validate(&self) -> Result<(), GenerationError> {
        if self.content_width() <= Mm::ZERO {
            return Err(GenerationError::Configuration(format!(
                "margins of {}mm leave no room on a {}mm wide page",
                self.margins.horizontal(),
                self.width()
            )));
        }
        if self.usable_height() <= Mm::ZERO {
            return Err(GenerationError::Configuration(format!(
                "margins and a {}mm footer leave no room on a {}mm tall page",
                self.footer_height,
                self.height()
            )));
        }
        Ok(())
    }
}

/// Where the next block goes
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LayoutCursor {
    /// 1-based number of the current page
    pub page_number: usize,
    pub y: Mm,
    /// Nothing but page furniture has been placed on this page yet
    pub fresh: bool,
}

impl LayoutCursor {
    pub fn first_page(geometry: &PageGeometry) -> LayoutCursor {
        LayoutCursor {
            page_number: 1,
            y: geometry.content_top(),
            fresh: true,
        }
    }
}

/// What a block is, as far as page breaking cares
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BlockKind {
    /// One row of the item table; continuation pages repeat the table header
    TableRow,
    /// Any other atomic block
    Section,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BreakDecision {
    /// The block fits below the cursor
    Place,
    /// The block must start on a new page
    NewPage,
}

/// Decide whether a block of the given height fits on the current page.
///
/// A block that is the first thing on a fresh page is always placed: if it
/// does not fit there it fits nowhere, and breaking would only add empty pages.
pub fn decide(cursor: &LayoutCursor, geometry: &PageGeometry, block_height: Mm) -> BreakDecision {
    if cursor.y + block_height <= geometry.content_bottom() || cursor.fresh {
        BreakDecision::Place
    } else {
        BreakDecision::NewPage
    }
}

/// The parts of a page drawn by the flow rather than by the content itself
pub trait PageChrome<C: Canvas + ?Sized> {
    /// Draw the footer of a finished page
    fn draw_footer(
        &self,
        canvas: &mut C,
        page_number: usize,
        generated_at: &DateTime<Local>,
    ) -> Result<(), GenerationError>;

    /// Draw the table header with its top edge at `y`, returning its height
    fn draw_table_header(&self, canvas: &mut C, y: Mm) -> Result<Mm, GenerationError>;
}

/// Owns the layout cursor for one generation call
#[derive(Debug)]
pub struct PageFlow {
    geometry: PageGeometry,
    cursor: LayoutCursor,
    generated_at: DateTime<Local>,
    footers: usize,
}

impl PageFlow {
    pub fn new(geometry: PageGeometry, generated_at: DateTime<Local>) -> PageFlow {
        PageFlow {
            cursor: LayoutCursor::first_page(&geometry),
            geometry,
            generated_at,
            footers: 0,
        }
    }

    pub fn cursor(&self) -> LayoutCursor {
        self.cursor
    }

    pub fn geometry(&self) -> &PageGeometry {
        &self.geometry
    }

    /// Space left on the current page below the cursor
    pub fn remaining(&self) -> Mm {
        self.geometry.content_bottom() - self.cursor.y
    }

    /// Make sure a block of `height` fits below the cursor, breaking the page
    /// first if it does not. Returns the y the block should be drawn at.
    pub fn ensure_space<C, P>(
        &mut self,
        canvas: &mut C,
        chrome: &P,
        block: BlockKind,
        height: Mm,
    ) -> Result<Mm, GenerationError>
    where
        C: Canvas + ?Sized,
        P: PageChrome<C> + ?Sized,
    {
        match decide(&self.cursor, &self.geometry, height) {
            BreakDecision::Place => {
                if self.cursor.fresh && self.cursor.y + height > self.geometry.content_bottom() {
                    log::warn!(
                        "block of {}mm is taller than the {}mm left on page {}; it will overflow",
                        height,
                        self.remaining(),
                        self.cursor.page_number
                    );
                }
            }
            BreakDecision::NewPage => {
                self.break_page(canvas, chrome)?;
                if block == BlockKind::TableRow {
                    let header = chrome.draw_table_header(canvas, self.cursor.y)?;
                    self.cursor.y += header;
                }
            }
        }
        Ok(self.cursor.y)
    }

    fn break_page<C, P>(&mut self, canvas: &mut C, chrome: &P) -> Result<(), GenerationError>
    where
        C: Canvas + ?Sized,
        P: PageChrome<C> + ?Sized,
    {
        chrome.draw_footer(canvas, self.cursor.page_number, &self.generated_at)?;
        self.footers += 1;
        canvas.new_page()?;

        self.cursor = LayoutCursor {
            page_number: self.cursor.page_number + 1,
            y: self.geometry.content_top(),
            fresh: true,
        };
        log::debug!("started page {}", self.cursor.page_number);
        Ok(())
    }

    /// Move the cursor down past a block that has just been drawn
    pub fn advance(&mut self, height: Mm) {
        self.cursor.y += height;
        self.cursor.fresh = false;
    }

    /// Move the cursor down without counting as content, e.g. for spacing
    pub fn skip(&mut self, height: Mm) {
        self.cursor.y += height;
    }

    /// Stamp the footer of the last page and return the number of pages
    pub fn finish<C, P>(mut self, canvas: &mut C, chrome: &P) -> Result<usize, GenerationError>
    where
        C: Canvas + ?Sized,
        P: PageChrome<C> + ?Sized,
    {
        chrome.draw_footer(canvas, self.cursor.page_number, &self.generated_at)?;
        self.footers += 1;
        debug_assert_eq!(self.footers, self.cursor.page_number);
        Ok(self.cursor.page_number)
    }
}
