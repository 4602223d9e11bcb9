use crate::canvas::Frame;
use crate::units::*;

/// A rectangle in PDF user space, specified by two opposite corners.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Rect {
    /// The x-coordinate of the lower-left corner.
    pub x1: Pt,
    /// The y-coordinate of the lower-left corner.
    pub y1: Pt,
    /// The x-coordinate of the upper-right corner.
    pub x2: Pt,
    /// The y-coordinate of the upper-right corner.
    pub y2: Pt,
}

impl Rect {
    /// A rectangle covering a whole page of the given size
    pub fn page(size: (Mm, Mm)) -> Rect {
        Rect {
            x1: Pt(0.0),
            y1: Pt(0.0),
            x2: size.0.into(),
            y2: size.1.into(),
        }
    }

    /// Convert a top-left origin frame into PDF space, where y grows upwards
    /// from the bottom of a page `page_height` tall
    pub fn from_frame(frame: Frame, page_height: Mm) -> Rect {
        Rect {
            x1: frame.x.into(),
            y1: (page_height - frame.bottom()).into(),
            x2: frame.right().into(),
            y2: (page_height - frame.y).into(),
        }
    }

    pub fn width(&self) -> Pt {
        self.x2 - self.x1
    }

    pub fn height(&self) -> Pt {
        self.y2 - self.y1
    }
}

impl From<Rect> for pdf_writer::Rect {
    fn from(r: Rect) -> Self {
        pdf_writer::Rect {
            x1: r.x1.into(),
            y1: r.y1.into(),
            x2: r.x2.into(),
            y2: r.y2.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frames_flip_to_bottom_left_origin() {
        let rect = Rect::from_frame(Frame::new(Mm(10.0), Mm(20.0), Mm(50.0), Mm(30.0)), Mm(297.0));
        let expected_top: Pt = Mm(277.0).into();
        let expected_bottom: Pt = Mm(247.0).into();
        assert!((rect.y2.0 - expected_top.0).abs() < 1e-3);
        assert!((rect.y1.0 - expected_bottom.0).abs() < 1e-3);
        assert!(rect.height() > Pt(0.0));
    }
}
