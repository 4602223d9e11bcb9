use derive_more::{Add, AddAssign, Display, From, Into, Sub, SubAssign, Sum};
use std::ops::{Div, Mul, Neg};

/// Millimetres per PDF point
const MM_PER_PT: f64 = 25.4 / 72.0;

/// A length in PDF points (1/72 of an inch). Font sizes and everything handed
/// to [pdf_writer] are expressed in points.
#[derive(
    Debug,
    Default,
    Copy,
    Clone,
    PartialEq,
    PartialOrd,
    Add,
    AddAssign,
    Sub,
    SubAssign,
    Sum,
    From,
    Into,
    Display,
)]
pub struct Pt(pub f32);

/// A length in millimetres. All layout geometry (page size, margins, column
/// widths, cursor positions) is expressed in millimetres.
#[derive(
    Debug,
    Default,
    Copy,
    Clone,
    PartialEq,
    PartialOrd,
    Add,
    AddAssign,
    Sub,
    SubAssign,
    Sum,
    From,
    Into,
    Display,
)]
pub struct Mm(pub f64);


impl Mm {
    pub const ZERO: Mm = Mm(0.0);

    pub fn max(self, other: Mm) -> Mm {
        Mm(self.0.max(other.0))
    }

    pub fn min(self, other: Mm) -> Mm {
        Mm(self.0.min(other.0))
    }

    /// Round to two decimal places, the precision used for column geometry
    pub fn round2(self) -> Mm {
        Mm(round2(self.0))
    }
}

impl Pt {
    pub fn max(self, other: Pt) -> Pt {
        Pt(self.0.max(other.0))
    }
}

/// Round a value to two decimal places
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

impl From<Mm> for Pt {
    fn from(mm: Mm) -> Self {
        Pt((mm.0 / MM_PER_PT) as f32)
    }
}

impl From<Pt> for Mm {
    fn from(pt: Pt) -> Self {
        Mm(pt.0 as f64 * MM_PER_PT)
    }
}

impl Mul<f64> for Mm {
    type Output = Mm;

    fn mul(self, rhs: f64) -> Mm {
        Mm(self.0 * rhs)
    }
}

impl Div<f64> for Mm {
    type Output = Mm;

    fn div(self, rhs: f64) -> Mm {
        Mm(self.0 / rhs)
    }
}

impl Div<Mm> for Mm {
    type Output = f64;

    fn div(self, rhs: Mm) -> f64 {
        self.0 / rhs.0
    }
}

impl Neg for Mm {
    type Output = Mm;

    fn neg(self) -> Mm {
        Mm(-self.0)
    }
}

impl Mul<f32> for Pt {
    type Output = Pt;

    fn mul(self, rhs: f32) -> Pt {
        Pt(self.0 * rhs)
    }
}

impl Div<f32> for Pt {
    type Output = Pt;

    fn div(self, rhs: f32) -> Pt {
        Pt(self.0 / rhs)
    }
}

impl From<Pt> for f64 {
    fn from(pt: Pt) -> Self {
        pt.0 as f64
    }
}
