//! Pre-defined page sizes for the paper formats business documents are printed on.
//!
//! All sizes are provided in portrait orientation (width, height) where width ≤ height.
//! Use the [`PageOrientation`](crate::pagesize::PageOrientation) trait to convert between
//! portrait and landscape.
//!
//! # Example
//!
//! ```
//! use quote_pdf::pagesize::{A4, LETTER, PageOrientation};
//!
//! let landscape = A4.landscape();
//! assert_eq!(landscape.0, A4.1);
//! assert!(LETTER.0 < LETTER.1);
//! ```

use crate::units::*;

/// Page dimensions as (width, height) in millimetres.
pub type PageSize = (Mm, Mm);

// iso a-series
pub const A3: PageSize = (Mm(297.0), Mm(420.0));
pub const A4: PageSize = (Mm(210.0), Mm(297.0));
pub const A5: PageSize = (Mm(148.0), Mm(210.0));

// north american sizes (converted from inches)
pub const LETTER: PageSize = (Mm(8.5 * 25.4), Mm(11.0 * 25.4));
pub const LEGAL: PageSize = (Mm(8.5 * 25.4), Mm(14.0 * 25.4));

/// Look a page size up by its common name, ignoring case
pub fn by_name(name: &str) -> Option<PageSize> {
    match name.to_ascii_lowercase().as_str() {
        "a3" => Some(A3),
        "a4" => Some(A4),
        "a5" => Some(A5),
        "letter" => Some(LETTER),
        "legal" => Some(LEGAL),
        _ => None,
    }
}

/// Convert page sizes between portrait and landscape orientations.
pub trait PageOrientation {
    /// Returns the size in portrait orientation (width ≤ height).
    fn portrait(self) -> Self;
    /// Returns the size in landscape orientation (width ≥ height).
    fn landscape(self) -> Self;
}

impl PageOrientation for PageSize {
    fn portrait(self) -> Self {
        if self.0 <= self.1 {
            self
        } else {
            (self.1, self.0)
        }
    }

    fn landscape(self) -> PageSize {
        if self.0 >= self.1 {
            self
        } else {
            (self.1, self.0)
        }
    }
}
