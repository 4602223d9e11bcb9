/// A colour used for text, strokes and fills, expressed in the RGB or grey colour spaces
#[derive(Copy, Clone, PartialEq, Debug)]
pub enum Colour {
    /// DeviceRGB colour; r, g, b, range from 0.0 to 1.0
    RGB { r: f32, g: f32, b: f32 },
    /// DeviceGray colour; g ranges from 0.0 to 1.0
    Grey { g: f32 },
}

impl Colour {
    /// Create a new colour in the RGB space. r, g, and b range from 0.0 to 1.0
    pub fn new_rgb(r: f32, g: f32, b: f32) -> Colour {
        Colour::RGB { r, g, b }
    }

    /// Create a new colour in the RGB space. r, g, and b range from 0 to 255
    pub const fn new_rgb_bytes(r: u8, g: u8, b: u8) -> Colour {
        Colour::RGB {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
        }
    }

    /// Create a new colour in the grey space, g ranges from 0.0 to 1.0
    pub fn new_grey(g: f32) -> Colour {
        Colour::Grey { g }
    }
}

impl Default for Colour {
    fn default() -> Self {
        colours::BLACK
    }
}

impl<T: Into<f32>> From<(T, T, T)> for Colour {
    fn from(c: (T, T, T)) -> Self {
        Colour::RGB {
            r: c.0.into(),
            g: c.1.into(),
            b: c.2.into(),
        }
    }
}

/// Colours used by the stock document styling
pub mod colours {
    use super::*;

    pub const BLACK: Colour = Colour::Grey { g: 0.0 };
    pub const WHITE: Colour = Colour::Grey { g: 1.0 };
    pub const MID_GREY: Colour = Colour::Grey { g: 0.45 };
    pub const RULE_GREY: Colour = Colour::Grey { g: 0.75 };
    pub const ZEBRA: Colour = Colour::Grey { g: 0.96 };
    /// Banner and table-header fill
    pub const BRAND: Colour = Colour::new_rgb_bytes(31, 56, 100);
    /// Grand total highlight
    pub const HIGHLIGHT: Colour = Colour::new_rgb_bytes(226, 232, 243);
}
