use crate::units::Mm;

/// Page margins. Content, including the footer band, is laid out inside them.
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct Margins {
    pub top: Mm,
    pub right: Mm,
    pub bottom: Mm,
    pub left: Mm,
}

impl Margins {
    /// Create margins by specifying individual components in a clockwise fashion
    /// starting at the top (in the same order as CSS margins)
    pub fn trbl(top: Mm, right: Mm, bottom: Mm, left: Mm) -> Margins {
        Margins {
            top,
            right,
            bottom,
            left,
        }
    }

    /// Create margins where all values are equal
    pub fn all<D: Into<Mm>>(value: D) -> Margins {
        let value: Mm = value.into();
        Margins {
            top: value,
            right: value,
            bottom: value,
            left: value,
        }
    }

    /// Create margins by specifying different values for vertical (top and bottom)
    /// and horizontal (left and right) margins
    pub fn symmetric(vertical: Mm, horizontal: Mm) -> Margins {
        Margins {
            top: vertical,
            right: horizontal,
            bottom: vertical,
            left: horizontal,
        }
    }

    /// Combined left and right margin
    pub fn horizontal(&self) -> Mm {
        self.left + self.right
    }

    /// Combined top and bottom margin
    pub fn vertical(&self) -> Mm {
        self.top + self.bottom
    }
}
