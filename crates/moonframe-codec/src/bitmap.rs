//! Decoded bitmaps as handed over by the frame loader.

use crate::errors::EncodingError;

/// Single-channel bitmap, row-major, one intensity byte per pixel.
///
/// Only the zero / non-zero distinction matters to the codec, so any decoder
/// that can produce 8-bit luma feeds this type directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawBitmap {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl RawBitmap {
    /// Wrap a pixel buffer.
    ///
    /// # Errors
    ///
    /// Returns [`EncodingError::BufferSize`] if `pixels` does not hold exactly
    /// `width * height` bytes.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, EncodingError> {
        let expected = width as usize * height as usize;
        if pixels.len() != expected {
            return Err(EncodingError::BufferSize {
                width,
                height,
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self { width, height, pixels })
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Pixel intensities of row `y`, or `None` past the last row.
    pub fn row(&self, y: u32) -> Option<&[u8]> {
        if y >= self.height {
            return None;
        }
        let start = y as usize * self.width as usize;
        self.pixels.get(start..start + self.width as usize)
    }

    /// Iterate rows top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[u8]> {
        (0..self.height).filter_map(|y| self.row(y))
    }
}
