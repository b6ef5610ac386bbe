//! Four-pixel run to moon glyph mapping.
//!
//! A run is read left to right; each pixel contributes one bit, set iff its
//! intensity is non-zero. The leftmost pixel is the most significant bit, so
//! the pattern `[false, true, true, true]` is `0b0111`.

use std::fmt;

/// Glyph for every 4-bit pattern, indexed by the pattern value.
const TABLE: [&str; 16] = [
    "🌑", // 0000
    "🌒", // 0001
    "🌒", // 0010
    "🌓", // 0011
    "🌘", // 0100
    "🌓", // 0101
    "🌕", // 0110
    "🌔", // 0111
    "🌘", // 1000
    "🌑", // 1001
    "🌗", // 1010
    "🌓", // 1011
    "🌗", // 1100
    "🌗", // 1101
    "🌖", // 1110
    "🌕", // 1111
];

/// One encoded 4-pixel run.
///
/// Stores the source pattern rather than the string so frames stay compact and
/// comparable; [`Glyph::as_str`] resolves the table entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Glyph(u8);

impl Glyph {
    /// Number of pixels covered by a single glyph.
    pub const RUN: usize = 4;

    /// Glyph for a 4-bit pattern. Bits above the low nibble are ignored.
    pub fn from_bits(bits: u8) -> Self {
        Self(bits & 0x0f)
    }

    /// The pattern this glyph was encoded from.
    pub fn bits(self) -> u8 {
        self.0
    }

    /// Rendered glyph text.
    pub fn as_str(self) -> &'static str {
        TABLE[usize::from(self.0)]
    }
}

impl fmt::Display for Glyph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Encode one run of four pixels, leftmost first.
pub fn encode_pixel_quad(bits: [bool; 4]) -> Glyph {
    let pattern = bits.iter().fold(0u8, |acc, &lit| (acc << 1) | u8::from(lit));
    Glyph::from_bits(pattern)
}
