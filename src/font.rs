use crate::units::Pt;

/// Advance widths (1/1000 em) of Helvetica for the printable ASCII range `' '..='~'`
#[rustfmt::skip]
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

/// Advance widths (1/1000 em) of Helvetica-Bold for the printable ASCII range `' '..='~'`
#[rustfmt::skip]
const HELVETICA_BOLD_WIDTHS: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

/// Width used for characters outside the ASCII tables
const FALLBACK_WIDTH: u16 = 556;

/// One of the PDF standard fonts. These never need embedding: every PDF viewer
/// ships them, and their metrics are fixed, so text can be measured without
/// loading any font file.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StandardFont {
    Helvetica,
    HelveticaBold,
}

impl StandardFont {
    pub const ALL: [StandardFont; 2] = [StandardFont::Helvetica, StandardFont::HelveticaBold];

    /// The PostScript name written into the font dictionary
    pub fn base_font(&self) -> &'static str {
        match self {
            StandardFont::Helvetica => "Helvetica",
            StandardFont::HelveticaBold => "Helvetica-Bold",
        }
    }

    /// The resource name pages use to refer to this font
    pub fn resource_name(&self) -> &'static str {
        match self {
            StandardFont::Helvetica => "F0",
            StandardFont::HelveticaBold => "F1",
        }
    }

    /// The horizontal advance of a character in 1/1000 em
    pub fn advance(&self, ch: char) -> u16 {
        let widths = match self {
            StandardFont::Helvetica => &HELVETICA_WIDTHS,
            StandardFont::HelveticaBold => &HELVETICA_BOLD_WIDTHS,
        };
        match ch {
            ' '..='~' => widths[ch as usize - ' ' as usize],
            '\u{a0}' => widths[0],
            _ => FALLBACK_WIDTH,
        }
    }

    /// Calculate the ascent (distance from the baseline to the top of the font) for the given font size
    pub fn ascent(&self, size: Pt) -> Pt {
        size * 0.718
    }

    /// Calculate the descent (distance from the baseline to the bottom of the font) for the given font size.
    /// Note: this is negative
    pub fn descent(&self, size: Pt) -> Pt {
        size * -0.207
    }
}

/// Calculate the width of a given string of text given the font and font size
pub fn width_of_text(text: &str, font: StandardFont, size: Pt) -> Pt {
    let units: u32 = text.chars().map(|ch| font.advance(ch) as u32).sum();
    size * (units as f32 / 1000.0)
}

/// Encode text as WinAnsi (Windows-1252) bytes, the encoding the standard fonts
/// are declared with. Characters without a WinAnsi code become `?`.
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|ch| match ch {
            ' '..='~' => ch as u8,
            '\u{a0}'..='\u{ff}' => ch as u32 as u8,
            '€' => 0x80,
            '‚' => 0x82,
            '„' => 0x84,
            '…' => 0x85,
            '‘' => 0x91,
            '’' => 0x92,
            '“' => 0x93,
            '”' => 0x94,
            '•' => 0x95,
            '–' => 0x96,
            '—' => 0x97,
            '™' => 0x99,
            _ => b'?',
        })
        .collect()
}
